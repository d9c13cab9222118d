//! Re-validating a character after its race or class selection changes.

use crate::abilities::{Ability, AbilityBounds, AbilityIssue};
use crate::character::Character;
use crate::eligibility::{can_multi_class, is_class_allowed, unmet_requirements};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A problem the caller should show the user. Never corrected silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationWarning {
    AbilityScore(AbilityIssue),
    RequirementUnmet {
        race: String,
        ability: Ability,
        value: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i32>,
    },
    ClassNotAllowed {
        race: String,
        class: String,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::AbilityScore(issue) => write!(f, "{issue}"),
            ValidationWarning::RequirementUnmet {
                race,
                ability,
                value,
                min,
                max,
            } => {
                write!(f, "{race} requires {}", ability.name())?;
                match (min, max) {
                    (Some(min), Some(max)) => write!(f, " {min}-{max}")?,
                    (Some(min), None) => write!(f, " of at least {min}")?,
                    (None, Some(max)) => write!(f, " of at most {max}")?,
                    (None, None) => {}
                }
                write!(f, ", found {value}")
            }
            ValidationWarning::ClassNotAllowed { race, class } => {
                write!(f, "{race} characters cannot be {class}")
            }
        }
    }
}

/// Outcome of [`cascade_validate_with_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeReport {
    pub character: Character,
    /// Classes, spells and cantrips were cleared.
    pub reset: bool,
    pub warnings: Vec<ValidationWarning>,
}

impl CascadeReport {
    pub fn is_clean(&self) -> bool {
        !self.reset && self.warnings.is_empty()
    }
}

/// Apply `new_race` to a copy of the character and drop selections it
/// invalidates.
///
/// Re-running with the same race returns the same character.
pub fn cascade_validate(character: &Character, new_race: &str, registry: &Registry) -> Character {
    cascade_validate_with_report(character, new_race, registry, AbilityBounds::default()).character
}

/// Same as [`cascade_validate`], also returning what changed and what the
/// user should review.
pub fn cascade_validate_with_report(
    character: &Character,
    new_race: &str,
    registry: &Registry,
    bounds: AbilityBounds,
) -> CascadeReport {
    let mut updated = character.clone();
    updated.race = new_race.to_string();

    let race = registry.resolve_race(new_race);
    let reset = updated.is_multi_class() && !can_multi_class(race, registry);
    if reset {
        debug!(
            character = %character.id,
            race = new_race,
            classes = ?character.class,
            "Race does not allow multi-classing; clearing classes and spells"
        );
        updated.class.clear();
        updated.spells.clear();
        updated.cantrips.clear();
    }

    let mut warnings: Vec<ValidationWarning> = updated
        .abilities
        .issues(bounds)
        .into_iter()
        .map(ValidationWarning::AbilityScore)
        .collect();

    warnings.extend(unmet_requirements(&updated, race).into_iter().map(|req| {
        ValidationWarning::RequirementUnmet {
            race: new_race.to_string(),
            ability: req.ability,
            value: updated.abilities.value(req.ability),
            min: req.min,
            max: req.max,
        }
    }));

    warnings.extend(
        updated
            .class
            .iter()
            .filter(|class| !is_class_allowed(race, class, registry))
            .map(|class| ValidationWarning::ClassNotAllowed {
                race: new_race.to_string(),
                class: class.clone(),
            }),
    );

    CascadeReport {
        character: updated,
        reset,
        warnings,
    }
}
