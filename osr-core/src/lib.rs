//! Rules engine for old-school fantasy character sheets.
//!
//! This crate provides:
//! - Dice notation parsing and seedable evaluation (`3d6`, `1d8+1`, `3d6*10`)
//! - Ability score modifiers and validity checks
//! - Race and class eligibility, including multi-classing
//! - Hit die resolution with racial multi-class overrides
//! - Spellcasting family classification
//! - Cascade validation when a character's race or classes change
//!
//! Everything is a pure, synchronous computation. Reference data lives in a
//! read-only [`Registry`] passed to each call, and dice take an explicit
//! random source.
//!
//! # Quick Start
//!
//! ```
//! use osr_core::{cascade_validate, resolve_hit_die, Character, Registry};
//!
//! let registry = Registry::standard();
//! let elf = Character::new("Aelar", "elf").with_classes(["fighter", "magic-user"]);
//! assert_eq!(resolve_hit_die(&elf, registry).as_deref(), Some("1d6"));
//!
//! let human = cascade_validate(&elf, "human", registry);
//! assert!(human.class.is_empty());
//! ```

pub mod abilities;
pub mod cascade;
pub mod character;
pub mod character_builder;
pub mod class_data;
pub mod dice;
pub mod eligibility;
pub mod experience;
pub mod generation;
pub mod hit_die;
pub mod registry;
pub mod rules;
pub mod spell_system;
pub mod testing;

// Primary public API
pub use abilities::{
    ability_issues, ability_modifier, has_valid_ability_scores, Ability, AbilityBounds,
    AbilityIssue, AbilityScore, AbilityScores,
};
pub use cascade::{cascade_validate, cascade_validate_with_report, CascadeReport, ValidationWarning};
pub use character::{Cantrip, Character, CharacterId, Currency, EquipmentItem, Spell};
pub use character_builder::{AbilityMethod, BuilderError, CharacterBuilder};
pub use dice::{
    evaluate_dice, parse_dice, roll, roll_with, DiceExpression, DiceFormulaError, RandomSource,
    RollResult, UnitInterval,
};
pub use eligibility::{
    allowed_classes, can_multi_class, is_class_allowed, is_class_selection_allowed,
    is_race_eligible,
};
pub use experience::{experience_required, level_for_xp};
pub use generation::{
    roll_ability_scores, roll_hit_points, roll_hit_points_with_limit, roll_starting_gold,
    HitPointRoll,
};
pub use hit_die::resolve_hit_die;
pub use registry::{
    ClassDef, ClassRef, ClassType, RaceDef, RaceRef, Registry, RegistryError, Resolved,
};
pub use rules::{ConfigError, RulesConfig, RulesEngine, SelectionChange};
pub use spell_system::{can_cast_spells, classify_spell_system, SpellSystem};
