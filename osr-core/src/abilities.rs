//! Ability scores and the modifier table.

use crate::character::Character;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest legal ability score.
pub const MIN_ABILITY_SCORE: i32 = 3;

/// Highest legal ability score.
pub const MAX_ABILITY_SCORE: i32 = 18;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ascending threshold lookup.
///
/// The first entry whose upper bound is at least the looked-up value wins;
/// anything above the last bound gets `above`. The same shape backs armor
/// class and movement tables in the wider application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdTable {
    entries: &'static [(i32, i32)],
    above: i32,
}

impl ThresholdTable {
    pub const fn new(entries: &'static [(i32, i32)], above: i32) -> Self {
        Self { entries, above }
    }

    pub fn lookup(&self, value: i32) -> i32 {
        self.entries
            .iter()
            .find(|(max, _)| *max >= value)
            .map_or(self.above, |&(_, result)| result)
    }
}

/// Score → modifier.
pub const ABILITY_MODIFIERS: ThresholdTable =
    ThresholdTable::new(&[(3, -3), (5, -2), (8, -1), (12, 0), (15, 1), (17, 2)], 3);

/// Modifier for an ability score value.
pub fn ability_modifier(value: i32) -> i32 {
    ABILITY_MODIFIERS.lookup(value)
}

/// Inclusive range of legal ability score values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBounds {
    pub min: i32,
    pub max: i32,
}

impl AbilityBounds {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for AbilityBounds {
    fn default() -> Self {
        Self::new(MIN_ABILITY_SCORE, MAX_ABILITY_SCORE)
    }
}

/// A stored ability score together with its derived modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub value: i32,
    pub modifier: i32,
}

impl AbilityScore {
    /// Score with the modifier looked up from the table.
    pub fn new(value: i32) -> Self {
        Self {
            value,
            modifier: ability_modifier(value),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_within(AbilityBounds::default())
    }

    pub fn is_valid_within(&self, bounds: AbilityBounds) -> bool {
        bounds.contains(self.value) && self.modifier == ability_modifier(self.value)
    }
}

impl Default for AbilityScore {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Why a stored ability score is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AbilityIssue {
    OutOfRange {
        ability: Ability,
        value: i32,
    },
    ModifierMismatch {
        ability: Ability,
        value: i32,
        stored: i32,
        expected: i32,
    },
}

impl AbilityIssue {
    pub fn ability(&self) -> Ability {
        match self {
            AbilityIssue::OutOfRange { ability, .. }
            | AbilityIssue::ModifierMismatch { ability, .. } => *ability,
        }
    }
}

impl fmt::Display for AbilityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityIssue::OutOfRange { ability, value } => {
                write!(f, "{} score {value} is out of range", ability.name())
            }
            AbilityIssue::ModifierMismatch {
                ability,
                value,
                stored,
                expected,
            } => write!(
                f,
                "{} {value} should have modifier {expected:+}, found {stored:+}",
                ability.name()
            ),
        }
    }
}

/// The six ability scores of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: AbilityScore,
    pub dexterity: AbilityScore,
    pub constitution: AbilityScore,
    pub intelligence: AbilityScore,
    pub wisdom: AbilityScore,
    pub charisma: AbilityScore,
}

impl AbilityScores {
    /// Build from raw values; modifiers come from the table.
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: AbilityScore::new(str),
            dexterity: AbilityScore::new(dex),
            constitution: AbilityScore::new(con),
            intelligence: AbilityScore::new(int),
            wisdom: AbilityScore::new(wis),
            charisma: AbilityScore::new(cha),
        }
    }

    pub fn get(&self, ability: Ability) -> AbilityScore {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Store a score exactly as given, including a mismatched modifier.
    pub fn set(&mut self, ability: Ability, score: AbilityScore) {
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Dexterity => self.dexterity = score,
            Ability::Constitution => self.constitution = score,
            Ability::Intelligence => self.intelligence = score,
            Ability::Wisdom => self.wisdom = score,
            Ability::Charisma => self.charisma = score,
        }
    }

    /// Store a new value and recompute its modifier.
    pub fn set_value(&mut self, ability: Ability, value: i32) {
        self.set(ability, AbilityScore::new(value));
    }

    pub fn value(&self, ability: Ability) -> i32 {
        self.get(ability).value
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.get(ability).modifier
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, AbilityScore)> + '_ {
        Ability::all().into_iter().map(move |a| (a, self.get(a)))
    }

    /// Every invalid score, in ability order.
    pub fn issues(&self, bounds: AbilityBounds) -> Vec<AbilityIssue> {
        let mut issues = Vec::new();
        for (ability, score) in self.iter() {
            if !bounds.contains(score.value) {
                issues.push(AbilityIssue::OutOfRange {
                    ability,
                    value: score.value,
                });
            }
            let expected = ability_modifier(score.value);
            if score.modifier != expected {
                issues.push(AbilityIssue::ModifierMismatch {
                    ability,
                    value: score.value,
                    stored: score.modifier,
                    expected,
                });
            }
        }
        issues
    }
}

/// True when every ability is in range and carries the table modifier.
pub fn has_valid_ability_scores(character: &Character) -> bool {
    has_valid_ability_scores_within(character, AbilityBounds::default())
}

/// Like [`has_valid_ability_scores`] with explicit bounds.
pub fn has_valid_ability_scores_within(character: &Character, bounds: AbilityBounds) -> bool {
    character
        .abilities
        .iter()
        .all(|(_, score)| score.is_valid_within(bounds))
}

/// Diagnostics for every invalid ability of a character.
pub fn ability_issues(character: &Character, bounds: AbilityBounds) -> Vec<AbilityIssue> {
    character.abilities.issues(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_table() {
        assert_eq!(ability_modifier(3), -3);
        assert_eq!(ability_modifier(4), -2);
        assert_eq!(ability_modifier(5), -2);
        assert_eq!(ability_modifier(6), -1);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), 0);
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(13), 1);
        assert_eq!(ability_modifier(15), 1);
        assert_eq!(ability_modifier(16), 2);
        assert_eq!(ability_modifier(17), 2);
        assert_eq!(ability_modifier(18), 3);
    }

    #[test]
    fn test_modifier_outside_legal_range() {
        // Lookup still answers; validity is a separate check.
        assert_eq!(ability_modifier(1), -3);
        assert_eq!(ability_modifier(25), 3);
    }

    #[test]
    fn test_score_validity() {
        assert!(AbilityScore::new(3).is_valid());
        assert!(AbilityScore::new(18).is_valid());
        assert!(!AbilityScore::new(2).is_valid());
        assert!(!AbilityScore::new(19).is_valid());

        let corrupted = AbilityScore {
            value: 12,
            modifier: 1,
        };
        assert!(!corrupted.is_valid());
    }

    #[test]
    fn test_issues_report_each_problem() {
        let mut scores = AbilityScores::new(10, 10, 10, 10, 10, 10);
        scores.set(
            Ability::Wisdom,
            AbilityScore {
                value: 16,
                modifier: 0,
            },
        );
        scores.set_value(Ability::Charisma, 20);

        let issues = scores.issues(AbilityBounds::default());
        assert_eq!(
            issues,
            vec![
                AbilityIssue::ModifierMismatch {
                    ability: Ability::Wisdom,
                    value: 16,
                    stored: 0,
                    expected: 2,
                },
                AbilityIssue::OutOfRange {
                    ability: Ability::Charisma,
                    value: 20,
                },
            ]
        );
        assert_eq!(issues[0].ability(), Ability::Wisdom);
    }

    #[test]
    fn test_custom_bounds() {
        let scores = AbilityScores::new(19, 10, 10, 10, 10, 10);
        assert!(!scores.issues(AbilityBounds::default()).is_empty());
        assert!(scores.issues(AbilityBounds::new(3, 20)).is_empty());
    }

    #[test]
    fn test_character_validity() {
        let mut character = Character::new("Aldric", "human");
        character.abilities = AbilityScores::new(13, 9, 12, 8, 15, 10);
        assert!(has_valid_ability_scores(&character));

        character.abilities.strength.modifier = 2;
        assert!(!has_valid_ability_scores(&character));
        assert_eq!(ability_issues(&character, AbilityBounds::default()).len(), 1);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(AbilityScores::default()).unwrap();
        assert_eq!(json["strength"]["value"], 10);
        assert_eq!(json["charisma"]["modifier"], 0);
    }
}
