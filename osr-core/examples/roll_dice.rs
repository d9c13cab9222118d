//! Roll a few formulas and generate a character.
//!
//! Pass formulas on the command line to roll those instead:
//! `cargo run -p osr-core --example roll_dice -- 2d6+1 3d6*10`

use osr_core::dice::DiceExpression;
use osr_core::{CharacterBuilder, Registry, RulesEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let formulas: Vec<String> = std::env::args().skip(1).collect();

    println!("=== Rolling Dice ===\n");
    if formulas.is_empty() {
        roll("1d20", "Basic d20");
        roll("3d6", "Ability score");
        roll("1d8+1", "Longsword with a bonus");
        roll("10-1d4", "Subtracted die");
        roll("3d6*10", "Starting gold");
        roll("101d6", "Too many dice");
        roll("1d0", "Zero-sided die");
    } else {
        for formula in &formulas {
            roll(formula, "command line");
        }
    }

    println!("\n=== Seeded Character ===\n");
    let mut rng = StdRng::seed_from_u64(2024);
    let result = CharacterBuilder::new()
        .name("Aelar")
        .race("elf")
        .class("fighter")
        .class("magic-user")
        .assign([13, 14, 12, 15, 10, 11])
        .roll_gold(&mut rng)
        .build(Registry::standard());

    match result {
        Ok(character) => {
            let engine = RulesEngine::standard();
            println!("{} the {} ({})", character.name, character.race, character.class.join("/"));
            for (ability, score) in character.abilities.iter() {
                println!("  {ability}: {:>2} ({:+})", score.value, score.modifier);
            }
            println!("  HP: {}", character.hp);
            println!("  Gold: {}", character.currency.gold);
            println!(
                "  Hit die: {}",
                engine.resolve_hit_die(&character).unwrap_or_default()
            );
            println!("  Spells: {}", engine.classify_spell_system(&character));

            let human = engine.cascade_with_report(&character, "human");
            println!("\nAs a human: classes {:?}, reset = {}", human.character.class, human.reset);
        }
        Err(e) => println!("BUILD ERROR: {e}"),
    }
}

fn roll(formula: &str, description: &str) {
    print!("Rolling {formula} ({description})... ");
    match DiceExpression::parse(formula) {
        Ok(expr) => println!("{}", expr.roll()),
        Err(e) => println!("PARSE ERROR: {e}"),
    }
}
