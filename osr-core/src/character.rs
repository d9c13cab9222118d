//! The character record the rules operate on.
//!
//! A `Character` is owned by the calling application. The engine reads it
//! and hands back new values; it never edits one in place.

use crate::abilities::AbilityScores;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A known spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub description: String,
}

impl Spell {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level,
            description: String::new(),
        }
    }
}

/// A known cantrip (level 0 spell).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cantrip {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Cantrip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }
}

/// A carried piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub weight: f32,
    #[serde(default)]
    pub cost_gp: f32,
}

fn default_quantity() -> u32 {
    1
}

impl EquipmentItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1,
            weight: 0.0,
            cost_gp: 0.0,
        }
    }
}

/// Coins carried, by denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub platinum: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub electrum: u32,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub copper: u32,
}

impl Currency {
    pub fn gold(amount: u32) -> Self {
        Self {
            gold: amount,
            ..Self::default()
        }
    }

    /// Total value in copper pieces (1 pp = 5 gp, 1 gp = 2 ep = 10 sp = 100 cp).
    pub fn value_in_copper(&self) -> u64 {
        u64::from(self.platinum) * 500
            + u64::from(self.gold) * 100
            + u64::from(self.electrum) * 50
            + u64::from(self.silver) * 10
            + u64::from(self.copper)
    }
}

/// A player character.
///
/// `race` and each `class` entry are registry ids, or any other string for
/// custom content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default)]
    pub id: CharacterId,
    pub name: String,
    pub race: String,
    #[serde(default)]
    pub class: Vec<String>,
    #[serde(default)]
    pub abilities: AbilityScores,
    #[serde(default)]
    pub hp: i32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub spells: Vec<Spell>,
    #[serde(default)]
    pub cantrips: Vec<Cantrip>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
    #[serde(default)]
    pub currency: Currency,
    /// Application preferences. Never interpreted by the engine.
    #[serde(default)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

fn default_level() -> u32 {
    1
}

impl Character {
    /// A level 1 character with average scores and no class chosen yet.
    pub fn new(name: impl Into<String>, race: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            race: race.into(),
            class: Vec::new(),
            abilities: AbilityScores::default(),
            hp: 0,
            level: 1,
            xp: 0,
            spells: Vec::new(),
            cantrips: Vec::new(),
            equipment: Vec::new(),
            currency: Currency::default(),
            settings: serde_json::Map::new(),
        }
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn has_class(&self) -> bool {
        !self.class.is_empty()
    }

    pub fn is_multi_class(&self) -> bool {
        self.class.len() > 1
    }
}
