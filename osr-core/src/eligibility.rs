//! Race and class eligibility.
//!
//! Custom races and classes (ids the registry does not know) bypass every
//! check here: they are author-defined content.

use crate::character::Character;
use crate::registry::{AbilityRequirement, RaceRef, Registry, Resolved};
use std::collections::BTreeSet;

/// True when the character's scores satisfy every requirement of the race.
pub fn is_race_eligible(character: &Character, race: RaceRef<'_>) -> bool {
    unmet_requirements(character, race).is_empty()
}

/// Requirements of the race the character's current scores fail.
pub fn unmet_requirements<'a>(
    character: &Character,
    race: RaceRef<'a>,
) -> Vec<&'a AbilityRequirement> {
    match race {
        Resolved::Custom(_) => Vec::new(),
        Resolved::Known(race) => race
            .ability_requirements
            .iter()
            .filter(|req| !req.is_met_by(character.abilities.value(req.ability)))
            .collect(),
    }
}

/// Whether characters of this race may hold two or more classes.
///
/// A race supports it when it allows at least one combination class.
pub fn can_multi_class(race: RaceRef<'_>, registry: &Registry) -> bool {
    match race {
        Resolved::Custom(_) => true,
        Resolved::Known(race) => registry
            .combination_classes()
            .any(|id| race.allows_class(id)),
    }
}

/// Class ids the race allows. `None` for a custom race, which allows any.
pub fn allowed_classes<'a>(race: RaceRef<'a>) -> Option<&'a BTreeSet<String>> {
    race.known().map(|race| &race.allowed_classes)
}

/// True when the race may take the class. Custom races and classes always pass.
pub fn is_class_allowed(race: RaceRef<'_>, class_id: &str, registry: &Registry) -> bool {
    match (race, registry.resolve_class(class_id)) {
        (Resolved::Custom(_), _) | (_, Resolved::Custom(_)) => true,
        (Resolved::Known(race), Resolved::Known(class)) => race.allows_class(&class.id),
    }
}

/// Whether a whole class selection is legal for the race.
///
/// An empty selection is always legal. Two or more classes need a race that
/// can multi-class, and every known class must still be allowed.
pub fn is_class_selection_allowed(
    race: RaceRef<'_>,
    classes: &[String],
    registry: &Registry,
) -> bool {
    if classes.len() > 1 && !can_multi_class(race, registry) {
        return false;
    }
    classes
        .iter()
        .all(|class| is_class_allowed(race, class, registry))
}
