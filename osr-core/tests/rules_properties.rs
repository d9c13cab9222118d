//! Behavioral tests for the public rules API.
//!
//! These tests exercise the engine the way a character sheet does:
//! - Dice formulas with seeded and scripted randomness
//! - Ability modifiers and validity
//! - Hit dice, spell systems and cascade validation

use osr_core::testing::{
    assert_hit_die, create_sample_cleric, create_sample_custom, create_sample_elf_fighter_mage,
    create_sample_fighter, ScriptedRolls,
};
use osr_core::{
    ability_modifier, can_cast_spells, cascade_validate, classify_spell_system, evaluate_dice,
    has_valid_ability_scores, parse_dice, roll_with, Ability, AbilityScore, Character,
    DiceFormulaError, Registry, SpellSystem,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// =============================================================================
// DICE
// =============================================================================

#[test]
fn test_ndm_totals_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(99);
    for count in [1u32, 2, 5, 17, 100] {
        for sides in [1u32, 2, 4, 6, 8, 10, 12, 20, 100] {
            let expr = parse_dice(&format!("{count}d{sides}")).unwrap();
            let result = evaluate_dice(&expr, &mut rng);
            assert_eq!(result.rolls.len(), count as usize);
            assert!(result.total >= i64::from(count));
            assert!(result.total <= i64::from(count) * i64::from(sides));
            assert!(result.rolls.iter().all(|r| (1..=sides).contains(r)));
        }
    }
}

#[test]
fn test_seeded_roll_is_reproducible() {
    let first = roll_with("3d6", &mut StdRng::seed_from_u64(5)).unwrap();
    let second = roll_with("3d6", &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(first, second);

    let scripted = roll_with("3d6", &mut ScriptedRolls::new(vec![1, 2, 3])).unwrap();
    assert_eq!(scripted.total, 6);
    assert_eq!(scripted.rolls, vec![1, 2, 3]);
}

#[test]
fn test_out_of_range_formulas_fail() {
    assert_eq!(
        parse_dice("101d6"),
        Err(DiceFormulaError::DiceCountOutOfRange { count: 101, max: 100 })
    );
    assert_eq!(
        parse_dice("1d0"),
        Err(DiceFormulaError::DieSidesOutOfRange { sides: 0, min: 1 })
    );
}

#[test]
fn test_invalid_formula_consumes_no_randomness() {
    let mut random = ScriptedRolls::new(vec![4]);
    assert!(roll_with("2d6+101d6", &mut random).is_err());
    assert_eq!(random.consumed(), 0);
}

#[test]
fn test_case_insensitive_notation() {
    let result = roll_with("D20+2", &mut ScriptedRolls::new(vec![11])).unwrap();
    assert_eq!(result.total, 13);
}

// =============================================================================
// ABILITIES
// =============================================================================

#[test]
fn test_modifier_reference_points() {
    assert_eq!(ability_modifier(3), -3);
    assert_eq!(ability_modifier(8), -1);
    assert_eq!(ability_modifier(10), 0);
    assert_eq!(ability_modifier(15), 1);
    assert_eq!(ability_modifier(18), 3);
}

#[test]
fn test_validity_flags_mismatch_and_range() {
    let mut character = create_sample_fighter();
    assert!(has_valid_ability_scores(&character));

    character.abilities.set(
        Ability::Dexterity,
        AbilityScore {
            value: 12,
            modifier: -1,
        },
    );
    assert!(!has_valid_ability_scores(&character));

    let mut character = create_sample_fighter();
    character.abilities.set_value(Ability::Wisdom, 2);
    assert!(!has_valid_ability_scores(&character));
}

// =============================================================================
// HIT DICE AND SPELLS
// =============================================================================

#[test]
fn test_elf_multi_class_hit_die_any_order() {
    let registry = Registry::standard();
    let forward = create_sample_elf_fighter_mage();
    let mut reversed = forward.clone();
    reversed.class.reverse();

    assert_hit_die(&forward, registry, Some("1d6"));
    assert_hit_die(&reversed, registry, Some("1d6"));
}

#[test]
fn test_spell_casting_matrix() {
    let registry = Registry::standard();
    let with =
        |classes: &[&str]| Character::new("Test", "elf").with_classes(classes.iter().copied());

    assert!(can_cast_spells(&with(&["cleric"]), registry));
    assert!(can_cast_spells(&with(&["magic-user"]), registry));
    assert!(can_cast_spells(&with(&["fighter", "magic-user"]), registry));
    assert!(!can_cast_spells(&with(&["fighter"]), registry));
    assert!(!can_cast_spells(&create_sample_custom(), registry));

    assert_eq!(classify_spell_system(&create_sample_custom(), registry), SpellSystem::Custom);
    assert_eq!(classify_spell_system(&with(&["fighter"]), registry), SpellSystem::None);
    assert_eq!(classify_spell_system(&create_sample_cleric(), registry), SpellSystem::Cleric);
}

// =============================================================================
// CASCADE VALIDATION
// =============================================================================

#[test]
fn test_elf_to_human_clears_classes_and_spells() {
    let registry = Registry::standard();
    let elf = create_sample_elf_fighter_mage();
    assert!(!elf.spells.is_empty());

    let human = cascade_validate(&elf, "human", registry);
    assert!(human.class.is_empty());
    assert!(human.spells.is_empty());
    assert!(human.cantrips.is_empty());
    assert_eq!(human.name, elf.name);
    assert_eq!(human.id, elf.id);
}

#[test]
fn test_cascade_is_idempotent_for_every_race() {
    let registry = Registry::standard();
    let samples = [
        create_sample_fighter(),
        create_sample_cleric(),
        create_sample_elf_fighter_mage(),
        create_sample_custom(),
    ];
    let races: Vec<String> = registry
        .races()
        .map(|r| r.id.clone())
        .chain(["tiefling".to_string()])
        .collect();

    for character in &samples {
        for race in &races {
            let once = cascade_validate(character, race, registry);
            let twice = cascade_validate(&once, race, registry);
            assert_eq!(once, twice, "{} -> {race}", character.name);
        }
    }
}

#[test]
fn test_cascade_leaves_single_class_alone() {
    let registry = Registry::standard();
    let cleric = create_sample_cleric();
    let human = cascade_validate(&cleric, "human", registry);
    assert_eq!(human.class, cleric.class);
    assert_eq!(human.spells, cleric.spells);
}
