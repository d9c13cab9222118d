//! Random character generation: ability scores, starting gold and hit points.
//!
//! Every function takes the random source as a parameter so a seeded RNG or
//! [`ScriptedRolls`](crate::testing::ScriptedRolls) reproduces a character.

use crate::abilities::{Ability, AbilityScore, AbilityScores};
use crate::character::Character;
use crate::dice::{
    DiceExpression, DiceFormulaError, RandomSource, RollResult, Sign, Term, MAX_DICE_COUNT,
};
use crate::hit_die::resolve_hit_die_with;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};

fn three_d6(multiplier: Option<u32>) -> DiceExpression {
    DiceExpression {
        formula: match multiplier {
            Some(m) => format!("3d6*{m}"),
            None => "3d6".to_string(),
        },
        terms: vec![Term::dice(Sign::Plus, 3, 6)],
        multiplier,
    }
}

/// Roll 3d6 for each ability, in order.
pub fn roll_ability_scores<R: RandomSource + ?Sized>(random: &mut R) -> AbilityScores {
    let expr = three_d6(None);
    let mut scores = AbilityScores::default();
    for ability in Ability::all() {
        let value = i32::try_from(expr.evaluate(random).total).unwrap_or(i32::MAX);
        scores.set(ability, AbilityScore::new(value));
    }
    scores
}

/// Starting gold: 3d6 × 10 gold pieces.
pub fn roll_starting_gold<R: RandomSource + ?Sized>(random: &mut R) -> RollResult {
    three_d6(Some(10)).evaluate(random)
}

/// A first-level hit point roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPointRoll {
    pub hit_die: String,
    pub roll: RollResult,
    pub constitution_modifier: i32,
    /// Die result plus CON modifier, never below 1.
    pub hit_points: i32,
}

/// Roll the character's hit die and add the CON modifier.
///
/// `Ok(None)` when no class is chosen yet.
pub fn roll_hit_points<R: RandomSource + ?Sized>(
    character: &Character,
    registry: &Registry,
    custom_hit_die: &str,
    random: &mut R,
) -> Result<Option<HitPointRoll>, DiceFormulaError> {
    roll_hit_points_with_limit(character, registry, custom_hit_die, MAX_DICE_COUNT, random)
}

/// Like [`roll_hit_points`], rejecting hit dice that roll more than `max_dice` dice.
pub fn roll_hit_points_with_limit<R: RandomSource + ?Sized>(
    character: &Character,
    registry: &Registry,
    custom_hit_die: &str,
    max_dice: u32,
    random: &mut R,
) -> Result<Option<HitPointRoll>, DiceFormulaError> {
    let Some(hit_die) = resolve_hit_die_with(character, registry, custom_hit_die) else {
        return Ok(None);
    };
    let roll = DiceExpression::parse_with_limit(&hit_die, max_dice)?.evaluate(random);
    let constitution_modifier = character.abilities.modifier(Ability::Constitution);
    let rolled = i32::try_from(roll.total).unwrap_or(i32::MAX);
    let hit_points = rolled.saturating_add(constitution_modifier).max(1);

    Ok(Some(HitPointRoll {
        hit_die,
        roll,
        constitution_modifier,
        hit_points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::has_valid_ability_scores;
    use crate::hit_die::DEFAULT_CUSTOM_HIT_DIE;
    use crate::testing::ScriptedRolls;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scores_rolled_in_order() {
        let mut random = ScriptedRolls::new(vec![
            6, 6, 6, // STR 18
            1, 1, 1, // DEX 3
            3, 4, 5, // CON 12
            2, 2, 2, // INT 6
            5, 5, 5, // WIS 15
            4, 4, 5, // CHA 13
        ]);
        let scores = roll_ability_scores(&mut random);

        assert_eq!(scores.strength, AbilityScore::new(18));
        assert_eq!(scores.strength.modifier, 3);
        assert_eq!(scores.value(Ability::Dexterity), 3);
        assert_eq!(scores.value(Ability::Constitution), 12);
        assert_eq!(scores.value(Ability::Intelligence), 6);
        assert_eq!(scores.value(Ability::Wisdom), 15);
        assert_eq!(scores.value(Ability::Charisma), 13);
        assert_eq!(random.consumed(), 18);
    }

    #[test]
    fn test_rolled_scores_are_always_valid() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let character =
                Character::new("Roll", "human").with_abilities(roll_ability_scores(&mut rng));
            assert!(has_valid_ability_scores(&character));
        }
    }

    #[test]
    fn test_starting_gold() {
        let gold = roll_starting_gold(&mut ScriptedRolls::new(vec![2, 3, 4]));
        assert_eq!(gold.total, 90);
        assert_eq!(gold.formula, "3d6*10");
        assert_eq!(gold.rolls, vec![2, 3, 4]);
    }

    #[test]
    fn test_hit_points_add_constitution() {
        let registry = Registry::standard();
        let mut fighter = Character::new("Brom", "human").with_classes(["fighter"]);
        fighter.abilities.set_value(Ability::Constitution, 16);

        let hp = roll_hit_points(
            &fighter,
            registry,
            DEFAULT_CUSTOM_HIT_DIE,
            &mut ScriptedRolls::new(vec![5]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(hp.hit_die, "1d8");
        assert_eq!(hp.constitution_modifier, 2);
        assert_eq!(hp.hit_points, 7);
    }

    #[test]
    fn test_hit_points_minimum_one() {
        let registry = Registry::standard();
        let mut mage = Character::new("Ilsa", "human").with_classes(["magic-user"]);
        mage.abilities.set_value(Ability::Constitution, 3);

        let hp = roll_hit_points(
            &mage,
            registry,
            DEFAULT_CUSTOM_HIT_DIE,
            &mut ScriptedRolls::new(vec![1]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(hp.hit_points, 1);
    }

    #[test]
    fn test_hit_points_need_a_class() {
        let registry = Registry::standard();
        let character = Character::new("Nobody", "human");
        let hp = roll_hit_points(
            &character,
            registry,
            DEFAULT_CUSTOM_HIT_DIE,
            &mut ScriptedRolls::new(vec![4]),
        );
        assert_eq!(hp, Ok(None));
    }

    #[test]
    fn test_hit_die_over_limit_is_an_error() {
        let registry = Registry::standard();
        let character = Character::new("Vex", "human").with_classes(["witch-hunter"]);
        let mut random = ScriptedRolls::new(vec![4]);
        let hp = roll_hit_points_with_limit(&character, registry, "2d4", 1, &mut random);
        assert_eq!(hp, Err(DiceFormulaError::DiceCountOutOfRange { count: 2, max: 1 }));
        assert_eq!(random.consumed(), 0);
    }

    #[test]
    fn test_bad_custom_die_is_an_error() {
        let registry = Registry::standard();
        let character = Character::new("Vex", "human").with_classes(["witch-hunter"]);
        let hp = roll_hit_points(&character, registry, "1d0", &mut ScriptedRolls::new(vec![4]));
        assert!(hp.is_err());
    }
}
