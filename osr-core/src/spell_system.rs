//! Spellcasting family of a character.

use crate::character::Character;
use crate::registry::{ClassRef, ClassType, Registry, Resolved};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which spell rules apply to a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpellSystem {
    /// Arcane casting (magic-user family).
    MagicUser,
    /// Divine casting (cleric family).
    Cleric,
    None,
    /// Unregistered classes. Never casts on its own.
    Custom,
}

impl SpellSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpellSystem::MagicUser => "magic-user",
            SpellSystem::Cleric => "cleric",
            SpellSystem::None => "none",
            SpellSystem::Custom => "custom",
        }
    }

    pub fn can_cast(&self) -> bool {
        matches!(self, SpellSystem::MagicUser | SpellSystem::Cleric)
    }
}

impl fmt::Display for SpellSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify already-resolved classes. Arcane wins over divine.
pub fn classify_classes(classes: &[ClassRef<'_>]) -> SpellSystem {
    let has_type = |wanted: ClassType| {
        classes
            .iter()
            .any(|class| matches!(class, Resolved::Known(def) if def.class_type == wanted))
    };

    if has_type(ClassType::MagicUserFamily) {
        SpellSystem::MagicUser
    } else if has_type(ClassType::ClericFamily) {
        SpellSystem::Cleric
    } else if classes.iter().any(Resolved::is_custom) {
        SpellSystem::Custom
    } else {
        SpellSystem::None
    }
}

/// Spell system for the character's current classes.
pub fn classify_spell_system(character: &Character, registry: &Registry) -> SpellSystem {
    classify_classes(&registry.resolve_classes(&character.class))
}

/// True for arcane and divine casters.
pub fn can_cast_spells(character: &Character, registry: &Registry) -> bool {
    classify_spell_system(character, registry).can_cast()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(classes: &[&str]) -> SpellSystem {
        let character = Character::new("Test", "human").with_classes(classes.iter().copied());
        classify_spell_system(&character, Registry::standard())
    }

    #[test]
    fn test_families() {
        assert_eq!(classify(&["magic-user"]), SpellSystem::MagicUser);
        assert_eq!(classify(&["necromancer"]), SpellSystem::MagicUser);
        assert_eq!(classify(&["cleric"]), SpellSystem::Cleric);
        assert_eq!(classify(&["druid"]), SpellSystem::Cleric);
        assert_eq!(classify(&["fighter"]), SpellSystem::None);
        assert_eq!(classify(&[]), SpellSystem::None);
    }

    #[test]
    fn test_arcane_takes_precedence() {
        assert_eq!(classify(&["cleric", "magic-user"]), SpellSystem::MagicUser);
        assert_eq!(classify(&["fighter", "magic-user"]), SpellSystem::MagicUser);
        assert_eq!(classify(&["fighter-magic-user"]), SpellSystem::MagicUser);
    }

    #[test]
    fn test_custom_classes() {
        assert_eq!(classify(&["witch-hunter"]), SpellSystem::Custom);
        assert_eq!(classify(&["fighter", "witch-hunter"]), SpellSystem::Custom);
        // A registered caster still decides the family.
        assert_eq!(classify(&["witch-hunter", "cleric"]), SpellSystem::Cleric);
    }

    #[test]
    fn test_can_cast() {
        let registry = Registry::standard();
        let can = |classes: &[&str]| {
            let character = Character::new("Test", "elf").with_classes(classes.iter().copied());
            can_cast_spells(&character, registry)
        };
        assert!(can(&["cleric"]));
        assert!(can(&["magic-user"]));
        assert!(can(&["fighter", "magic-user"]));
        assert!(!can(&["fighter"]));
        assert!(!can(&["witch-hunter"]));
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(SpellSystem::MagicUser.to_string(), "magic-user");
        assert_eq!(
            serde_json::to_value(SpellSystem::MagicUser).unwrap(),
            serde_json::json!("magic-user")
        );
        assert_eq!(
            serde_json::from_str::<SpellSystem>("\"custom\"").unwrap(),
            SpellSystem::Custom
        );
    }
}
