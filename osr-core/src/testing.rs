//! Testing utilities for the rules engine.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedRolls`, a random source that replays fixed die faces
//! - Sample characters for the standard races and classes
//! - Assertion helpers for derived rules values

use crate::abilities::{ability_issues, AbilityBounds, AbilityScores};
use crate::character::{Cantrip, Character, Spell};
use crate::dice::RandomSource;
use crate::hit_die::resolve_hit_die;
use crate::registry::Registry;

/// A random source that returns scripted die faces.
///
/// Faces are replayed in order and repeat once exhausted. Each face is
/// clamped into `1..=sides`, so a script written for d6 still works on a d4.
/// An empty script always rolls 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    faces: Vec<u32>,
    next: usize,
    consumed: usize,
}

impl ScriptedRolls {
    pub fn new(faces: Vec<u32>) -> Self {
        Self {
            faces,
            next: 0,
            consumed: 0,
        }
    }

    /// Every die rolls its highest face.
    pub fn max() -> Self {
        Self::new(vec![u32::MAX])
    }

    /// Number of dice rolled so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Append more faces to the script.
    pub fn queue(&mut self, faces: impl IntoIterator<Item = u32>) {
        self.faces.extend(faces);
    }

    /// Start the script over.
    pub fn reset(&mut self) {
        self.next = 0;
        self.consumed = 0;
    }
}

impl RandomSource for ScriptedRolls {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.consumed += 1;
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.next % self.faces.len()];
        self.next = (self.next + 1) % self.faces.len();
        face.clamp(1, sides.max(1))
    }
}

/// Human fighter with solid physical scores.
pub fn create_sample_fighter() -> Character {
    Character::new("Brom", "human")
        .with_classes(["fighter"])
        .with_abilities(AbilityScores::new(16, 12, 14, 9, 10, 11))
}

/// Dwarf cleric with one prepared spell.
pub fn create_sample_cleric() -> Character {
    let mut character = Character::new("Brother Tobin", "dwarf")
        .with_classes(["cleric"])
        .with_abilities(AbilityScores::new(12, 9, 14, 10, 16, 8));
    character.spells.push(Spell::new("Cure Light Wounds", 1));
    character
}

/// Elf fighter/magic-user with a spell and a cantrip.
pub fn create_sample_elf_fighter_mage() -> Character {
    let mut character = Character::new("Aelar", "elf")
        .with_classes(["fighter", "magic-user"])
        .with_abilities(AbilityScores::new(13, 14, 12, 15, 10, 11));
    character.spells.push(Spell::new("Magic Missile", 1));
    character.cantrips.push(Cantrip::new("Light"));
    character
}

/// A character built entirely from custom content.
pub fn create_sample_custom() -> Character {
    Character::new("Vex", "tiefling")
        .with_classes(["witch-hunter"])
        .with_abilities(AbilityScores::new(11, 15, 12, 13, 9, 14))
}

/// Assert that every ability score is in range with the table modifier.
pub fn assert_valid_abilities(character: &Character) {
    let issues = ability_issues(character, AbilityBounds::default());
    assert!(
        issues.is_empty(),
        "Expected valid ability scores for {}, found: {:?}",
        character.name,
        issues
    );
}

/// Assert the resolved hit die.
pub fn assert_hit_die(character: &Character, registry: &Registry, expected: Option<&str>) {
    let actual = resolve_hit_die(character, registry);
    assert_eq!(
        actual.as_deref(),
        expected,
        "Expected hit die {:?} for {} ({:?}), got {:?}",
        expected,
        character.name,
        character.class,
        actual
    );
}
