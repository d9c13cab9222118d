//! Built-in race and class tables.
//!
//! Covers the four core classes, the optional arcane and divine variants,
//! the elven combination classes and the five standard races. Applications
//! with their own content load a [`Registry`] from JSON instead.

use crate::abilities::Ability;
use crate::registry::{AbilityRequirement, ClassDef, ClassType, RaceDef, Registry, RegistryData};

/// Experience needed for levels 1 to 20.
pub const CLERIC_XP: [u32; 20] = [
    0, 1_500, 3_000, 6_000, 12_000, 24_000, 48_000, 90_000, 180_000, 270_000, 360_000, 450_000,
    540_000, 630_000, 720_000, 810_000, 900_000, 990_000, 1_080_000, 1_170_000,
];
pub const FIGHTER_XP: [u32; 20] = [
    0, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 120_000, 240_000, 360_000, 480_000, 600_000,
    720_000, 840_000, 960_000, 1_080_000, 1_200_000, 1_320_000, 1_440_000, 1_560_000,
];
pub const MAGIC_USER_XP: [u32; 20] = [
    0, 2_500, 5_000, 10_000, 20_000, 40_000, 80_000, 150_000, 300_000, 450_000, 600_000,
    750_000, 900_000, 1_050_000, 1_200_000, 1_350_000, 1_500_000, 1_650_000, 1_800_000,
    1_950_000,
];
pub const THIEF_XP: [u32; 20] = [
    0, 1_250, 2_500, 5_000, 10_000, 20_000, 40_000, 75_000, 150_000, 225_000, 300_000, 375_000,
    450_000, 525_000, 600_000, 675_000, 750_000, 825_000, 900_000, 975_000,
];

/// Ids of the classes that are pre-blended pairs.
pub const COMBINATION_CLASSES: [&str; 2] = ["fighter-magic-user", "magic-user-thief"];

const CLERIC_WEAPONS: [&str; 6] = ["Club", "Mace", "Maul", "Quarterstaff", "Sling", "Warhammer"];
const MAGIC_USER_WEAPONS: [&str; 3] = ["Dagger", "Quarterstaff", "Walking Staff"];
const THIEF_ARMOR: [&str; 1] = ["Leather Armor"];

lazy_static::lazy_static! {
    /// The standard registry shared by every caller. Never mutated.
    pub static ref STANDARD_REGISTRY: Registry = Registry::from_data_unchecked(standard_data());
}

/// The standard tables in their JSON shape.
pub fn standard_data() -> RegistryData {
    RegistryData {
        races: standard_races(),
        classes: standard_classes(),
        combination_classes: COMBINATION_CLASSES.iter().map(|id| id.to_string()).collect(),
    }
}

fn class(id: &str, name: &str, hit_die: &str, xp: &[u32], class_type: ClassType) -> ClassDef {
    ClassDef {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        hit_die: hit_die.to_string(),
        experience_table: xp.to_vec(),
        class_type,
        allowed_weapons: None,
        allowed_armor: None,
    }
}

fn names(list: &[&str]) -> Option<Vec<String>> {
    Some(list.iter().map(|s| s.to_string()).collect())
}

/// Combination classes need the sum of both components' experience.
fn combined_xp(a: &[u32], b: &[u32]) -> Vec<u32> {
    a.iter().zip(b).map(|(x, y)| x.saturating_add(*y)).collect()
}

fn standard_classes() -> Vec<ClassDef> {
    let mut cleric = class("cleric", "Cleric", "1d6", &CLERIC_XP, ClassType::ClericFamily);
    cleric.description = "A holy warrior who channels divine power.".to_string();
    cleric.allowed_weapons = names(&CLERIC_WEAPONS);

    let mut fighter = class("fighter", "Fighter", "1d8", &FIGHTER_XP, ClassType::None);
    fighter.description = "A master of arms and armor.".to_string();

    let mut magic_user = class(
        "magic-user",
        "Magic-User",
        "1d4",
        &MAGIC_USER_XP,
        ClassType::MagicUserFamily,
    );
    magic_user.description = "A scholar of arcane magic.".to_string();
    magic_user.allowed_weapons = names(&MAGIC_USER_WEAPONS);
    magic_user.allowed_armor = Some(Vec::new());

    let mut thief = class("thief", "Thief", "1d4", &THIEF_XP, ClassType::None);
    thief.description = "A stealthy expert in locks and traps.".to_string();
    thief.allowed_armor = names(&THIEF_ARMOR);

    let arcane_variant = |id: &str, name: &str| {
        let mut def = class(id, name, "1d4", &MAGIC_USER_XP, ClassType::MagicUserFamily);
        def.allowed_weapons = names(&MAGIC_USER_WEAPONS);
        def.allowed_armor = Some(Vec::new());
        def
    };

    let mut druid = class("druid", "Druid", "1d6", &CLERIC_XP, ClassType::ClericFamily);
    druid.description = "A priest of the natural world.".to_string();

    let paladin = class("paladin", "Paladin", "1d8", &FIGHTER_XP, ClassType::ClericFamily);
    let ranger = class("ranger", "Ranger", "1d8", &FIGHTER_XP, ClassType::None);

    let mut fighter_magic_user = class(
        "fighter-magic-user",
        "Fighter/Magic-User",
        "1d6",
        &combined_xp(&FIGHTER_XP, &MAGIC_USER_XP),
        ClassType::MagicUserFamily,
    );
    fighter_magic_user.description = "Fights and casts arcane spells in armor.".to_string();

    let magic_user_thief = class(
        "magic-user-thief",
        "Magic-User/Thief",
        "1d4",
        &combined_xp(&MAGIC_USER_XP, &THIEF_XP),
        ClassType::MagicUserFamily,
    );

    vec![
        cleric,
        fighter,
        magic_user,
        thief,
        arcane_variant("illusionist", "Illusionist"),
        arcane_variant("necromancer", "Necromancer"),
        arcane_variant("spellcrafter", "Spellcrafter"),
        druid,
        paladin,
        ranger,
        fighter_magic_user,
        magic_user_thief,
    ]
}

fn race(
    id: &str,
    name: &str,
    description: &str,
    allowed: &[&str],
    requirements: Vec<AbilityRequirement>,
) -> RaceDef {
    RaceDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        allowed_classes: allowed.iter().map(|s| s.to_string()).collect(),
        ability_requirements: requirements,
        multiclass_hit_die: None,
    }
}

fn standard_races() -> Vec<RaceDef> {
    let human = race(
        "human",
        "Human",
        "Adaptable and ambitious, humans may follow any calling.",
        &[
            "cleric",
            "fighter",
            "magic-user",
            "thief",
            "illusionist",
            "necromancer",
            "spellcrafter",
            "druid",
            "paladin",
            "ranger",
        ],
        Vec::new(),
    );

    let dwarf = race(
        "dwarf",
        "Dwarf",
        "Stout and hardy folk of the deep halls.",
        &["cleric", "fighter", "thief"],
        vec![
            AbilityRequirement::min(Ability::Constitution, 9),
            AbilityRequirement::max(Ability::Charisma, 17),
        ],
    );

    let mut elf = race(
        "elf",
        "Elf",
        "Graceful and long-lived, at home with sword and spell alike.",
        &[
            "cleric",
            "fighter",
            "magic-user",
            "thief",
            "illusionist",
            "fighter-magic-user",
            "magic-user-thief",
        ],
        vec![
            AbilityRequirement::min(Ability::Intelligence, 9),
            AbilityRequirement::max(Ability::Constitution, 17),
        ],
    );
    elf.multiclass_hit_die = Some("1d6".to_string());

    let halfling = race(
        "halfling",
        "Halfling",
        "Small, quick and lucky.",
        &["cleric", "fighter", "thief"],
        vec![
            AbilityRequirement::min(Ability::Dexterity, 9),
            AbilityRequirement::max(Ability::Strength, 17),
        ],
    );

    let half_elf = race(
        "half-elf",
        "Half-Elf",
        "Of two peoples, welcome in both.",
        &[
            "cleric",
            "fighter",
            "magic-user",
            "thief",
            "fighter-magic-user",
            "magic-user-thief",
        ],
        vec![AbilityRequirement::min(Ability::Charisma, 9)],
    );

    vec![human, dwarf, elf, halfling, half_elf]
}
