//! Rules engine facade.
//!
//! `RulesEngine` bundles a [`Registry`] with a [`RulesConfig`] so callers
//! hold one value instead of threading both through every call. Selection
//! changes go through [`RulesEngine::apply`]:
//! 1. The UI reports a [`SelectionChange`] (new race or new class list)
//! 2. The engine applies it to a copy of the character
//! 3. Cascade validation clears selections the change invalidated
//! 4. The caller receives a [`CascadeReport`] with the corrected character
//!
//! Every method is a pure computation over its arguments; only dice rolls
//! consume the random source handed in.

use crate::abilities::{AbilityBounds, AbilityIssue, MAX_ABILITY_SCORE, MIN_ABILITY_SCORE};
use crate::cascade::{cascade_validate_with_report, CascadeReport};
use crate::character::Character;
use crate::character_builder::{BuilderError, CharacterBuilder};
use crate::dice::{DiceExpression, DiceFormulaError, RandomSource, RollResult, MAX_DICE_COUNT};
use crate::eligibility;
use crate::experience;
use crate::generation::{self, HitPointRoll};
use crate::hit_die::{resolve_hit_die_with, DEFAULT_CUSTOM_HIT_DIE};
use crate::registry::Registry;
use crate::spell_system::{classify_spell_system, SpellSystem};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from an inconsistent [`RulesConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Ability bounds {min}..={max} are empty")]
    InvalidBounds { min: i32, max: i32 },

    #[error("Custom class hit die is invalid: {0}")]
    InvalidCustomHitDie(#[source] DiceFormulaError),

    #[error("Dice count limit must be at least 1")]
    ZeroDiceLimit,

    #[error("Dice count limit {limit} exceeds the maximum of {max}")]
    DiceLimitTooHigh { limit: u32, max: u32 },
}

/// Tunable rule settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    /// Legal ability score range.
    pub ability_bounds: AbilityBounds,

    /// Hit die for classes the registry does not know.
    pub custom_class_hit_die: String,

    /// Most dice a single term may roll.
    pub max_dice_count: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesConfig {
    /// Standard settings: scores 3 to 18, custom classes on 1d6, 100 dice.
    pub fn new() -> Self {
        Self {
            ability_bounds: AbilityBounds::new(MIN_ABILITY_SCORE, MAX_ABILITY_SCORE),
            custom_class_hit_die: DEFAULT_CUSTOM_HIT_DIE.to_string(),
            max_dice_count: MAX_DICE_COUNT,
        }
    }

    /// Set the legal ability score range.
    pub fn with_ability_bounds(mut self, min: i32, max: i32) -> Self {
        self.ability_bounds = AbilityBounds::new(min, max);
        self
    }

    /// Set the hit die used for custom classes.
    pub fn with_custom_class_hit_die(mut self, die: impl Into<String>) -> Self {
        self.custom_class_hit_die = die.into();
        self
    }

    /// Set the per-term dice limit. Must stay within 1 and the standard limit.
    pub fn with_max_dice_count(mut self, max: u32) -> Self {
        self.max_dice_count = max;
        self
    }

    /// Check that the settings are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let AbilityBounds { min, max } = self.ability_bounds;
        if min > max {
            return Err(ConfigError::InvalidBounds { min, max });
        }
        if self.max_dice_count == 0 {
            return Err(ConfigError::ZeroDiceLimit);
        }
        if self.max_dice_count > MAX_DICE_COUNT {
            return Err(ConfigError::DiceLimitTooHigh {
                limit: self.max_dice_count,
                max: MAX_DICE_COUNT,
            });
        }
        DiceExpression::parse_with_limit(&self.custom_class_hit_die, self.max_dice_count)
            .map_err(ConfigError::InvalidCustomHitDie)?;
        Ok(())
    }
}

/// A change to a character's race or class selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum SelectionChange {
    Race(String),
    Classes(Vec<String>),
}

/// Registry plus configuration, exposing every rules operation.
#[derive(Debug, Clone)]
pub struct RulesEngine {
    registry: Registry,
    config: RulesConfig,
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl RulesEngine {
    /// Create an engine, rejecting an inconsistent config.
    pub fn new(registry: Registry, config: RulesConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Built-in tables with standard settings.
    pub fn standard() -> Self {
        Self {
            registry: Registry::standard().clone(),
            config: RulesConfig::new(),
        }
    }

    /// The registry rules are resolved against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The active settings.
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    // Dice

    /// Parse a formula under the configured dice limit.
    pub fn parse_dice(&self, formula: &str) -> Result<DiceExpression, DiceFormulaError> {
        DiceExpression::parse_with_limit(formula, self.config.max_dice_count)
    }

    /// Parse and roll a formula under the configured dice limit.
    pub fn roll<R: RandomSource + ?Sized>(
        &self,
        formula: &str,
        random: &mut R,
    ) -> Result<RollResult, DiceFormulaError> {
        Ok(self.parse_dice(formula)?.evaluate(random))
    }

    // Abilities

    /// Validity check using the configured bounds.
    pub fn has_valid_ability_scores(&self, character: &Character) -> bool {
        crate::abilities::has_valid_ability_scores_within(character, self.config.ability_bounds)
    }

    /// Every ability problem under the configured bounds.
    pub fn ability_issues(&self, character: &Character) -> Vec<AbilityIssue> {
        crate::abilities::ability_issues(character, self.config.ability_bounds)
    }

    // Eligibility

    /// True when the character meets the race's ability requirements.
    pub fn is_race_eligible(&self, character: &Character, race: &str) -> bool {
        eligibility::is_race_eligible(character, self.registry.resolve_race(race))
    }

    /// True when the race allows a combination class.
    pub fn can_multi_class(&self, race: &str) -> bool {
        eligibility::can_multi_class(self.registry.resolve_race(race), &self.registry)
    }

    /// True when the race may take the class.
    pub fn is_class_allowed(&self, race: &str, class: &str) -> bool {
        eligibility::is_class_allowed(self.registry.resolve_race(race), class, &self.registry)
    }

    /// True when the race may hold the whole class list.
    pub fn is_class_selection_allowed(&self, race: &str, classes: &[String]) -> bool {
        eligibility::is_class_selection_allowed(
            self.registry.resolve_race(race),
            classes,
            &self.registry,
        )
    }

    // Derived values

    /// Effective hit die, using the configured custom class die.
    pub fn resolve_hit_die(&self, character: &Character) -> Option<String> {
        resolve_hit_die_with(character, &self.registry, &self.config.custom_class_hit_die)
    }

    /// Spell system for the character's classes.
    pub fn classify_spell_system(&self, character: &Character) -> SpellSystem {
        classify_spell_system(character, &self.registry)
    }

    /// True for arcane and divine casters.
    pub fn can_cast_spells(&self, character: &Character) -> bool {
        self.classify_spell_system(character).can_cast()
    }

    /// XP needed for `level` across the given classes.
    pub fn experience_required(&self, classes: &[String], level: u32) -> Option<u32> {
        experience::experience_required(&self.registry.resolve_classes(classes), level)
    }

    /// Level the character's XP has reached.
    pub fn level_for_xp(&self, character: &Character) -> Option<u32> {
        experience::level_for_xp(character, &self.registry)
    }

    /// Roll first-level hit points under the configured settings.
    pub fn roll_hit_points<R: RandomSource + ?Sized>(
        &self,
        character: &Character,
        random: &mut R,
    ) -> Result<Option<HitPointRoll>, DiceFormulaError> {
        generation::roll_hit_points_with_limit(
            character,
            &self.registry,
            &self.config.custom_class_hit_die,
            self.config.max_dice_count,
            random,
        )
    }

    /// Build a character under the configured bounds, dice limit and custom die.
    pub fn build_character(&self, builder: CharacterBuilder) -> Result<Character, BuilderError> {
        builder.with_rules(&self.config).build(&self.registry)
    }

    // Cascade

    /// Change race and return the corrected character.
    pub fn cascade_validate(&self, character: &Character, new_race: &str) -> Character {
        self.cascade_with_report(character, new_race).character
    }

    /// Change race and return the corrected character with its warnings.
    pub fn cascade_with_report(&self, character: &Character, new_race: &str) -> CascadeReport {
        cascade_validate_with_report(
            character,
            new_race,
            &self.registry,
            self.config.ability_bounds,
        )
    }

    /// Apply a race or class change and re-validate.
    pub fn apply(&self, character: &Character, change: SelectionChange) -> CascadeReport {
        match change {
            SelectionChange::Race(race) => self.cascade_with_report(character, &race),
            SelectionChange::Classes(classes) => {
                let mut updated = character.clone();
                updated.class = classes;
                self.cascade_with_report(&updated, &character.race)
            }
        }
    }
}
