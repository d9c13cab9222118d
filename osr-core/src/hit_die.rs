//! Effective hit die for single- and multi-class characters.

use crate::character::Character;
use crate::dice::DiceExpression;
use crate::registry::{Registry, Resolved};

/// Hit die for classes the registry does not know.
pub const DEFAULT_CUSTOM_HIT_DIE: &str = "1d6";

/// The character's hit die, or `None` while no class is chosen.
pub fn resolve_hit_die(character: &Character, registry: &Registry) -> Option<String> {
    resolve_hit_die_with(character, registry, DEFAULT_CUSTOM_HIT_DIE)
}

/// Like [`resolve_hit_die`] with an explicit die for custom classes.
///
/// With two or more classes a race's `multiclass_hit_die` always replaces
/// the class dice. Otherwise the smallest class die wins.
pub fn resolve_hit_die_with(
    character: &Character,
    registry: &Registry,
    custom_hit_die: &str,
) -> Option<String> {
    let class_die = |id: &str| match registry.resolve_class(id) {
        Resolved::Known(class) => class.hit_die.clone(),
        Resolved::Custom(_) => custom_hit_die.to_string(),
    };

    match character.class.as_slice() {
        [] => None,
        [single] => Some(class_die(single)),
        several => {
            let race_override = registry
                .resolve_race(&character.race)
                .known()
                .and_then(|race| race.multiclass_hit_die.clone());
            if race_override.is_some() {
                return race_override;
            }
            several
                .iter()
                .map(|id| class_die(id))
                .min_by_key(|die| (die_size(die), die.clone()))
        }
    }
}

/// Largest face a die formula can produce. Unparseable formulas sort last.
fn die_size(die: &str) -> i64 {
    DiceExpression::parse(die).map_or(i64::MAX, |expr| expr.max_total())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_class_is_undecided() {
        let character = Character::new("Nobody", "human");
        assert_eq!(resolve_hit_die(&character, Registry::standard()), None);
    }

    #[test]
    fn test_single_class() {
        let registry = Registry::standard();
        let fighter = Character::new("Brom", "human").with_classes(["fighter"]);
        assert_eq!(resolve_hit_die(&fighter, registry).as_deref(), Some("1d8"));

        let mage = Character::new("Ilsa", "human").with_classes(["magic-user"]);
        assert_eq!(resolve_hit_die(&mage, registry).as_deref(), Some("1d4"));
    }

    #[test]
    fn test_combination_class_uses_its_own_die() {
        let registry = Registry::standard();
        let fighter_mage = Character::new("Tam", "half-elf").with_classes(["fighter-magic-user"]);
        assert_eq!(resolve_hit_die(&fighter_mage, registry).as_deref(), Some("1d6"));

        let mage_thief = Character::new("Tam", "half-elf").with_classes(["magic-user-thief"]);
        assert_eq!(resolve_hit_die(&mage_thief, registry).as_deref(), Some("1d4"));

        // One combination id is a single class, so the elven multi-class die does not apply.
        let elf = Character::new("Aelar", "elf").with_classes(["magic-user-thief"]);
        assert_eq!(resolve_hit_die(&elf, registry).as_deref(), Some("1d4"));
        assert!(!elf.is_multi_class());
    }

    #[test]
    fn test_custom_class_uses_default() {
        let registry = Registry::standard();
        let character = Character::new("Vex", "human").with_classes(["witch-hunter"]);
        assert_eq!(resolve_hit_die(&character, registry).as_deref(), Some("1d6"));
        assert_eq!(
            resolve_hit_die_with(&character, registry, "1d10").as_deref(),
            Some("1d10")
        );
    }

    #[test]
    fn test_elf_override_ignores_class_order() {
        let registry = Registry::standard();
        let a = Character::new("Aelar", "elf").with_classes(["fighter", "magic-user"]);
        let b = Character::new("Aelar", "elf").with_classes(["magic-user", "fighter"]);
        assert_eq!(resolve_hit_die(&a, registry).as_deref(), Some("1d6"));
        assert_eq!(resolve_hit_die(&b, registry).as_deref(), Some("1d6"));
    }

    #[test]
    fn test_elf_override_replaces_larger_dice() {
        let registry = Registry::standard();
        let character = Character::new("Aelar", "elf").with_classes(["fighter", "ranger"]);
        assert_eq!(resolve_hit_die(&character, registry).as_deref(), Some("1d6"));
    }

    #[test]
    fn test_smallest_die_without_override() {
        let registry = Registry::standard();
        let character = Character::new("Tam", "half-elf").with_classes(["fighter", "magic-user"]);
        assert_eq!(resolve_hit_die(&character, registry).as_deref(), Some("1d4"));

        let custom = Character::new("Tam", "half-elf").with_classes(["fighter", "witch-hunter"]);
        assert_eq!(resolve_hit_die(&custom, registry).as_deref(), Some("1d6"));
    }

    #[test]
    fn test_custom_race_multi_class() {
        let registry = Registry::standard();
        let character = Character::new("Zyx", "tiefling").with_classes(["fighter", "cleric"]);
        assert_eq!(resolve_hit_die(&character, registry).as_deref(), Some("1d6"));
    }
}
