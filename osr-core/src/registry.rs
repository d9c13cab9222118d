//! Race and class reference data.
//!
//! A [`Registry`] is built once (from JSON or the built-in tables) and is
//! read-only afterwards. Ids that are not registered are custom content;
//! [`Registry::resolve_race`] and [`Registry::resolve_class`] turn an id into
//! an explicit [`Resolved::Known`] or [`Resolved::Custom`] so the resolvers
//! never repeat the lookup.

use crate::abilities::Ability;
use crate::dice::{DiceExpression, DiceFormulaError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// Errors from building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Race '{0}' is defined more than once")]
    DuplicateRace(String),

    #[error("Class '{0}' is defined more than once")]
    DuplicateClass(String),

    #[error("Class '{class}' has an invalid hit die: {source}")]
    InvalidHitDie {
        class: String,
        source: DiceFormulaError,
    },

    #[error("Race '{race}' has an invalid multiclass hit die: {source}")]
    InvalidMulticlassHitDie {
        race: String,
        source: DiceFormulaError,
    },

    #[error("Combination class '{0}' is not a registered class")]
    UnknownCombinationClass(String),
}

/// Spellcasting family a class belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClassType {
    #[serde(rename = "magic-user-family")]
    MagicUserFamily,
    #[serde(rename = "cleric-family")]
    ClericFamily,
    #[default]
    #[serde(rename = "none")]
    None,
}

/// Minimum and/or maximum score a race demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRequirement {
    pub ability: Ability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

impl AbilityRequirement {
    pub fn min(ability: Ability, min: i32) -> Self {
        Self {
            ability,
            min: Some(min),
            max: None,
        }
    }

    pub fn max(ability: Ability, max: i32) -> Self {
        Self {
            ability,
            min: None,
            max: Some(max),
        }
    }

    pub fn is_met_by(&self, value: i32) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// A playable race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub allowed_classes: BTreeSet<String>,
    #[serde(default)]
    pub ability_requirements: Vec<AbilityRequirement>,
    /// Hit die used whenever this race holds two or more classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiclass_hit_die: Option<String>,
}

impl RaceDef {
    /// True when the class id is on this race's list.
    pub fn allows_class(&self, class_id: &str) -> bool {
        self.allowed_classes.contains(class_id)
    }
}

/// A character class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub hit_die: String,
    /// XP needed for each level; index 0 is level 1.
    #[serde(default)]
    pub experience_table: Vec<u32>,
    #[serde(default)]
    pub class_type: ClassType,
    /// `None` means no restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_weapons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_armor: Option<Vec<String>>,
}

impl ClassDef {
    /// XP needed to reach `level`, or `None` past the table.
    pub fn experience_for_level(&self, level: u32) -> Option<u32> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.experience_table.get(index).copied()
    }

    /// Highest level the experience table covers.
    pub fn max_level(&self) -> u32 {
        u32::try_from(self.experience_table.len()).unwrap_or(u32::MAX)
    }

    pub fn permits_weapon(&self, weapon: &str) -> bool {
        permits(self.allowed_weapons.as_deref(), weapon)
    }

    pub fn permits_armor(&self, armor: &str) -> bool {
        permits(self.allowed_armor.as_deref(), armor)
    }
}

fn permits(allowed: Option<&[String]>, item: &str) -> bool {
    allowed.map_or(true, |list| list.iter().any(|a| a.eq_ignore_ascii_case(item)))
}

/// A registry id resolved to its definition, or kept as custom content.
#[derive(Debug, PartialEq)]
pub enum Resolved<'a, T> {
    Known(&'a T),
    Custom(&'a str),
}

impl<T> Clone for Resolved<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Resolved<'_, T> {}

impl<'a, T> Resolved<'a, T> {
    pub fn known(&self) -> Option<&'a T> {
        match *self {
            Resolved::Known(def) => Some(def),
            Resolved::Custom(_) => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Resolved::Custom(_))
    }
}

pub type RaceRef<'a> = Resolved<'a, RaceDef>;
pub type ClassRef<'a> = Resolved<'a, ClassDef>;

/// On-disk shape of a registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryData {
    #[serde(default)]
    pub races: Vec<RaceDef>,
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub combination_classes: Vec<String>,
}

/// Read-only race and class reference data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    races: BTreeMap<String, RaceDef>,
    classes: BTreeMap<String, ClassDef>,
    combination_classes: BTreeSet<String>,
}

impl Registry {
    /// Build a registry, validating ids, hit dice and combination classes.
    pub fn new(data: RegistryData) -> Result<Self, RegistryError> {
        let mut classes = BTreeMap::new();
        for class in data.classes {
            DiceExpression::parse(&class.hit_die).map_err(|source| RegistryError::InvalidHitDie {
                class: class.id.clone(),
                source,
            })?;
            if classes.contains_key(&class.id) {
                return Err(RegistryError::DuplicateClass(class.id));
            }
            classes.insert(class.id.clone(), class);
        }

        let mut races = BTreeMap::new();
        for race in data.races {
            if let Some(die) = &race.multiclass_hit_die {
                DiceExpression::parse(die).map_err(|source| {
                    RegistryError::InvalidMulticlassHitDie {
                        race: race.id.clone(),
                        source,
                    }
                })?;
            }
            if races.contains_key(&race.id) {
                return Err(RegistryError::DuplicateRace(race.id));
            }
            races.insert(race.id.clone(), race);
        }

        let mut combination_classes = BTreeSet::new();
        for id in data.combination_classes {
            if !classes.contains_key(&id) {
                return Err(RegistryError::UnknownCombinationClass(id));
            }
            combination_classes.insert(id);
        }

        debug!(
            races = races.len(),
            classes = classes.len(),
            combinations = combination_classes.len(),
            "Loaded rules registry"
        );

        Ok(Self {
            races,
            classes,
            combination_classes,
        })
    }

    /// Build without validation, for the built-in tables. `class_data` tests
    /// check that those tables also pass [`Registry::new`].
    pub(crate) fn from_data_unchecked(data: RegistryData) -> Self {
        Self {
            races: data.races.into_iter().map(|r| (r.id.clone(), r)).collect(),
            classes: data.classes.into_iter().map(|c| (c.id.clone(), c)).collect(),
            combination_classes: data.combination_classes.into_iter().collect(),
        }
    }

    /// Parse and validate a registry from JSON.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let data: RegistryData = serde_json::from_str(json)?;
        Self::new(data)
    }

    /// The built-in standard races and classes.
    pub fn standard() -> &'static Registry {
        &crate::class_data::STANDARD_REGISTRY
    }

    /// Export the registry in its JSON shape.
    pub fn to_data(&self) -> RegistryData {
        RegistryData {
            races: self.races.values().cloned().collect(),
            classes: self.classes.values().cloned().collect(),
            combination_classes: self.combination_classes.iter().cloned().collect(),
        }
    }

    /// Look up a registered race by id.
    pub fn race(&self, id: &str) -> Option<&RaceDef> {
        self.races.get(id)
    }

    /// Look up a registered class by id.
    pub fn class(&self, id: &str) -> Option<&ClassDef> {
        self.classes.get(id)
    }

    /// Registered races in id order.
    pub fn races(&self) -> impl Iterator<Item = &RaceDef> {
        self.races.values()
    }

    /// Registered classes in id order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    /// Ids of the pre-blended combination classes.
    pub fn combination_classes(&self) -> impl Iterator<Item = &str> {
        self.combination_classes.iter().map(String::as_str)
    }

    /// True when `id` is a combination class.
    pub fn is_combination_class(&self, id: &str) -> bool {
        self.combination_classes.contains(id)
    }

    /// Resolve a race id, falling back to a custom race.
    pub fn resolve_race<'a>(&'a self, id: &'a str) -> RaceRef<'a> {
        match self.races.get(id) {
            Some(race) => Resolved::Known(race),
            None => Resolved::Custom(id),
        }
    }

    /// Resolve a class id, falling back to a custom class.
    pub fn resolve_class<'a>(&'a self, id: &'a str) -> ClassRef<'a> {
        match self.classes.get(id) {
            Some(class) => Resolved::Known(class),
            None => Resolved::Custom(id),
        }
    }

    /// Resolve every class id in order.
    pub fn resolve_classes<'a>(&'a self, ids: &'a [String]) -> Vec<ClassRef<'a>> {
        ids.iter().map(|id| self.resolve_class(id)).collect()
    }
}
