//! Experience thresholds and level lookup.

use crate::character::Character;
use crate::registry::{ClassRef, Registry};

/// XP needed to reach `level` with the given classes.
///
/// A multi-class character needs the sum of each class's threshold. `None`
/// when no class is chosen, a class is custom (it has no table), or a table
/// stops below `level`.
pub fn experience_required(classes: &[ClassRef<'_>], level: u32) -> Option<u32> {
    if classes.is_empty() {
        return None;
    }
    classes.iter().try_fold(0u32, |total, class| {
        let needed = class.known()?.experience_for_level(level)?;
        Some(total.saturating_add(needed))
    })
}

/// Highest level the character's XP has earned.
pub fn level_for_xp(character: &Character, registry: &Registry) -> Option<u32> {
    let classes = registry.resolve_classes(&character.class);
    experience_required(&classes, 1)?;

    let mut level = 1;
    while let Some(needed) = experience_required(&classes, level + 1) {
        if character.xp < needed {
            break;
        }
        level += 1;
    }
    Some(level)
}
