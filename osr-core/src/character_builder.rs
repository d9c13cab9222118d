//! Character builder for new first-level characters.
//!
//! The builder checks race requirements and class permissions against a
//! [`Registry`] when the character is built, so an invalid combination never
//! reaches the caller as a `Character`.

use crate::abilities::{Ability, AbilityBounds, AbilityIssue, AbilityScores};
use crate::character::{Character, Currency};
use crate::dice::{DiceExpression, DiceFormulaError, RandomSource, MAX_DICE_COUNT};
use crate::eligibility::{can_multi_class, is_class_allowed, unmet_requirements};
use crate::generation::{roll_ability_scores, roll_starting_gold};
use crate::hit_die::{resolve_hit_die_with, DEFAULT_CUSTOM_HIT_DIE};
use crate::registry::Registry;
use crate::rules::RulesConfig;
use tracing::debug;

/// How the ability scores were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbilityMethod {
    /// 3d6 for each ability, in order.
    #[default]
    RolledInOrder,
    /// Scores typed in by the player or referee.
    Assigned,
}

impl AbilityMethod {
    pub fn name(&self) -> &'static str {
        match self {
            AbilityMethod::RolledInOrder => "3d6 In Order",
            AbilityMethod::Assigned => "Assigned",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AbilityMethod::RolledInOrder => {
                "Roll 3d6 for Strength, then Dexterity, and so on down the list"
            }
            AbilityMethod::Assigned => "Enter each score directly",
        }
    }

    pub fn all() -> &'static [AbilityMethod] {
        &[AbilityMethod::RolledInOrder, AbilityMethod::Assigned]
    }
}

/// Builder for first-level characters.
#[derive(Debug, Clone)]
pub struct CharacterBuilder {
    name: Option<String>,
    race: Option<String>,
    classes: Vec<String>,
    ability_scores: Option<AbilityScores>,
    ability_method: AbilityMethod,
    starting_gold: Option<u32>,
    custom_hit_die: Option<String>,
    ability_bounds: AbilityBounds,
    max_dice_count: u32,
}

impl Default for CharacterBuilder {
    fn default() -> Self {
        Self {
            name: None,
            race: None,
            classes: Vec::new(),
            ability_scores: None,
            ability_method: AbilityMethod::default(),
            starting_gold: None,
            custom_hit_die: None,
            ability_bounds: AbilityBounds::default(),
            max_dice_count: MAX_DICE_COUNT,
        }
    }
}

/// Error from character building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    MissingName,
    MissingRace,
    MissingAbilityScores,
    InvalidAbilityScore(AbilityIssue),
    RequirementUnmet {
        race: String,
        ability: Ability,
        value: i32,
    },
    ClassNotAllowed {
        race: String,
        class: String,
    },
    MultiClassNotAllowed(String),
    InvalidHitDie(DiceFormulaError),
}

impl std::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuilderError::MissingName => write!(f, "Character name is required"),
            BuilderError::MissingRace => write!(f, "Race selection is required"),
            BuilderError::MissingAbilityScores => write!(f, "Ability scores are required"),
            BuilderError::InvalidAbilityScore(issue) => write!(f, "Invalid ability score: {issue}"),
            BuilderError::RequirementUnmet {
                race,
                ability,
                value,
            } => write!(f, "{} {value} does not meet the {race} requirement", ability.name()),
            BuilderError::ClassNotAllowed { race, class } => {
                write!(f, "Class {class} is not available to {race} characters")
            }
            BuilderError::MultiClassNotAllowed(race) => {
                write!(f, "{race} characters cannot multi-class")
            }
            BuilderError::InvalidHitDie(err) => write!(f, "Invalid hit die: {err}"),
        }
    }
}

impl std::error::Error for BuilderError {}

impl CharacterBuilder {
    /// Create a new character builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the race id. Unregistered ids are custom races.
    pub fn race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    /// Add a class id. Call again to multi-class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the ability scores directly.
    pub fn ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self.ability_method = AbilityMethod::Assigned;
        self
    }

    /// Assign raw values in STR, DEX, CON, INT, WIS, CHA order.
    pub fn assign(self, values: [i32; 6]) -> Self {
        let [str, dex, con, int, wis, cha] = values;
        self.ability_scores(AbilityScores::new(str, dex, con, int, wis, cha))
    }

    /// Roll 3d6 in order for every ability.
    pub fn roll_abilities<R: RandomSource + ?Sized>(mut self, random: &mut R) -> Self {
        self.ability_scores = Some(roll_ability_scores(random));
        self.ability_method = AbilityMethod::RolledInOrder;
        self
    }

    pub fn starting_gold(mut self, gold: u32) -> Self {
        self.starting_gold = Some(gold);
        self
    }

    /// Roll 3d6 × 10 starting gold.
    pub fn roll_gold<R: RandomSource + ?Sized>(mut self, random: &mut R) -> Self {
        let total = roll_starting_gold(random).total;
        self.starting_gold = Some(u32::try_from(total).unwrap_or(0));
        self
    }

    /// Hit die for custom classes. Defaults to `1d6`.
    pub fn custom_hit_die(mut self, die: impl Into<String>) -> Self {
        self.custom_hit_die = Some(die.into());
        self
    }

    /// Legal ability score range. Defaults to 3 to 18.
    pub fn ability_bounds(mut self, bounds: AbilityBounds) -> Self {
        self.ability_bounds = bounds;
        self
    }

    /// Take bounds, dice limit and custom class die from a config.
    ///
    /// Replaces any custom hit die set earlier.
    pub fn with_rules(mut self, config: &RulesConfig) -> Self {
        self.ability_bounds = config.ability_bounds;
        self.max_dice_count = config.max_dice_count;
        self.custom_hit_die = Some(config.custom_class_hit_die.clone());
        self
    }

    pub fn method(&self) -> AbilityMethod {
        self.ability_method
    }

    /// Build the character, validating it against the registry.
    ///
    /// First-level hit points are the hit die's highest face plus the
    /// Constitution modifier, never below 1.
    pub fn build(self, registry: &Registry) -> Result<Character, BuilderError> {
        self.try_build(registry).map_err(|err| {
            debug!(error = %err, "Character build rejected");
            err
        })
    }

    fn try_build(self, registry: &Registry) -> Result<Character, BuilderError> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or(BuilderError::MissingName)?;
        let race_id = self.race.ok_or(BuilderError::MissingRace)?;
        let scores = self
            .ability_scores
            .ok_or(BuilderError::MissingAbilityScores)?;

        if let Some(issue) = scores.issues(self.ability_bounds).into_iter().next() {
            return Err(BuilderError::InvalidAbilityScore(issue));
        }

        let mut character = Character::new(name, race_id.as_str())
            .with_classes(self.classes)
            .with_abilities(scores);

        let race = registry.resolve_race(&race_id);
        if let Some(req) = unmet_requirements(&character, race).first() {
            return Err(BuilderError::RequirementUnmet {
                race: race_id.clone(),
                ability: req.ability,
                value: scores.value(req.ability),
            });
        }

        if character.is_multi_class() && !can_multi_class(race, registry) {
            return Err(BuilderError::MultiClassNotAllowed(race_id.clone()));
        }
        if let Some(class) = character
            .class
            .iter()
            .find(|class| !is_class_allowed(race, class, registry))
        {
            return Err(BuilderError::ClassNotAllowed {
                race: race_id.clone(),
                class: class.clone(),
            });
        }

        let custom_die = self
            .custom_hit_die
            .as_deref()
            .unwrap_or(DEFAULT_CUSTOM_HIT_DIE);
        if let Some(die) = resolve_hit_die_with(&character, registry, custom_die) {
            let max_face = DiceExpression::parse_with_limit(&die, self.max_dice_count)
                .map_err(BuilderError::InvalidHitDie)?
                .max_total();
            let con = i64::from(scores.modifier(Ability::Constitution));
            character.hp = i32::try_from((max_face + con).max(1)).unwrap_or(i32::MAX);
        }

        if let Some(gold) = self.starting_gold {
            character.currency = Currency::gold(gold);
        }

        Ok(character)
    }
}
