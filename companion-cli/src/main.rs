use anyhow::{anyhow, Context};
use poke_companion::battle::Phase;
use poke_companion::effectiveness::EffectivenessTable;
use poke_companion::engine::BattleEngine;
use poke_companion::model::{Combatant, Stats};
use poke_companion::roster::{combatant_from_api, load_roster, sample_generation};
use poke_companion::shiny::{cumulative_chance, method_by_name, Hunt, METHODS};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::env;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!(
        "Usage:\n  companion-cli run --roster <roster.json> [--seed N] [--table <table.json>] [--max-turns N]\n  companion-cli demo [--seed N]\n  companion-cli odds --method <name> --attempts N\n  companion-cli hunt --target <species> --method <name> --encounters N\n  companion-cli methods\n  companion-cli sample --first <id> --last <id> [--count N] [--seed N]"
    );
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("run") => run_battle(args),
        Some("demo") => demo(args),
        Some("odds") => odds(args),
        Some("hunt") => hunt(args),
        Some("sample") => sample(args),
        Some("methods") => {
            for method in METHODS {
                println!("{} (1/{})", method.name, method.denominator);
            }
            Ok(())
        }
        _ => usage(),
    }
}

fn run_battle(mut args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let mut roster_path: Option<PathBuf> = None;
    let mut table_path: Option<PathBuf> = None;
    let mut seed = 0u64;
    let mut max_turns = 500usize;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--roster" => {
                roster_path = args.next().map(PathBuf::from);
            }
            "--table" => {
                table_path = args.next().map(PathBuf::from);
            }
            "--seed" => {
                let val = args.next().ok_or_else(|| anyhow!("--seed requires a number"))?;
                seed = val.parse().context("--seed must be an unsigned integer")?;
            }
            "--max-turns" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow!("--max-turns requires a number"))?;
                max_turns = val.parse().context("--max-turns must be a positive integer")?;
            }
            other => return Err(anyhow!("Unknown argument {other} for run")),
        }
    }
    let roster_path =
        roster_path.ok_or_else(|| anyhow!("run requires --roster <roster.json>"))?;
    let roster = load_roster(&roster_path)?;

    let mut rng = SmallRng::seed_from_u64(seed);
    let player = combatant_from_api(&roster.player, &mut rng)?;
    let opponent = combatant_from_api(&roster.opponent, &mut rng)?;

    let mut engine = BattleEngine::new(player, opponent, seed);
    if let Some(path) = table_path {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read effectiveness table at {}", path.display()))?;
        engine = engine.with_table(EffectivenessTable::from_json(&raw)?);
    }
    finish(engine, max_turns)
}

fn demo(mut args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let mut seed = 0u64;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let val = args.next().ok_or_else(|| anyhow!("--seed requires a number"))?;
                seed = val.parse().context("--seed must be an unsigned integer")?;
            }
            other => return Err(anyhow!("Unknown argument {other} for demo")),
        }
    }
    let charizard = Combatant::new(
        6,
        "charizard",
        vec!["fire".to_string(), "flying".to_string()],
        Stats {
            hp: 78,
            attack: 84,
            defense: 78,
            speed: 100,
        },
        vec!["Tackle".to_string(), "Flamethrower".to_string()],
    );
    let blastoise = Combatant::new(
        9,
        "blastoise",
        vec!["water".to_string()],
        Stats {
            hp: 79,
            attack: 83,
            defense: 100,
            speed: 78,
        },
        vec!["Tackle".to_string(), "Thunderbolt".to_string()],
    );
    finish(BattleEngine::new(charizard, blastoise, seed), 500)
}

fn odds(mut args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let mut method_name: Option<String> = None;
    let mut attempts = 0u32;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--method" => {
                method_name = args.next();
            }
            "--attempts" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow!("--attempts requires a number"))?;
                attempts = val.parse().context("--attempts must be an unsigned integer")?;
            }
            other => return Err(anyhow!("Unknown argument {other} for odds")),
        }
    }
    let method_name = method_name.ok_or_else(|| anyhow!("odds requires --method <name>"))?;
    let method = method_by_name(&method_name)
        .ok_or_else(|| anyhow!("Unknown method '{}' (see `companion-cli methods`)", method_name))?;
    let chance = cumulative_chance(method.denominator, attempts);
    println!(
        "{} at 1/{}: {:.2}% after {} encounters",
        method.name,
        method.denominator,
        chance * 100.0,
        attempts
    );
    Ok(())
}

fn hunt(mut args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let mut target: Option<String> = None;
    let mut method_name: Option<String> = None;
    let mut encounters = 0u32;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--target" => {
                target = args.next();
            }
            "--method" => {
                method_name = args.next();
            }
            "--encounters" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow!("--encounters requires a number"))?;
                encounters = val
                    .parse()
                    .context("--encounters must be an unsigned integer")?;
            }
            other => return Err(anyhow!("Unknown argument {other} for hunt")),
        }
    }
    let target = target.ok_or_else(|| anyhow!("hunt requires --target <species>"))?;
    let method_name = method_name.ok_or_else(|| anyhow!("hunt requires --method <name>"))?;
    let method = method_by_name(&method_name)
        .ok_or_else(|| anyhow!("Unknown method '{}' (see `companion-cli methods`)", method_name))?;
    let mut hunt = Hunt::new(target, *method);
    for _ in 0..encounters {
        hunt.record_encounter();
    }
    println!(
        "Hunting {} via {} (1/{}): {} encounters, {:.2}% cumulative chance",
        hunt.target,
        hunt.method.name,
        hunt.method.denominator,
        hunt.attempts,
        hunt.chance_so_far() * 100.0
    );
    Ok(())
}

fn sample(mut args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let mut first: Option<u32> = None;
    let mut last: Option<u32> = None;
    let mut count = 6usize;
    let mut seed = 0u64;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--first" => {
                let val = args.next().ok_or_else(|| anyhow!("--first requires an id"))?;
                first = Some(val.parse().context("--first must be an unsigned integer")?);
            }
            "--last" => {
                let val = args.next().ok_or_else(|| anyhow!("--last requires an id"))?;
                last = Some(val.parse().context("--last must be an unsigned integer")?);
            }
            "--count" => {
                let val = args.next().ok_or_else(|| anyhow!("--count requires a number"))?;
                count = val.parse().context("--count must be a positive integer")?;
            }
            "--seed" => {
                let val = args.next().ok_or_else(|| anyhow!("--seed requires a number"))?;
                seed = val.parse().context("--seed must be an unsigned integer")?;
            }
            other => return Err(anyhow!("Unknown argument {other} for sample")),
        }
    }
    let first = first.ok_or_else(|| anyhow!("sample requires --first <id>"))?;
    let last = last.ok_or_else(|| anyhow!("sample requires --last <id>"))?;
    let mut rng = SmallRng::seed_from_u64(seed);
    for id in sample_generation(first, last, count, &mut rng) {
        println!("{id}");
    }
    Ok(())
}

fn finish(mut engine: BattleEngine, max_turns: usize) -> anyhow::Result<()> {
    let winner = engine.run_auto(max_turns)?;
    for line in engine.session().log_lines() {
        println!("{line}");
    }
    match winner {
        Some(side) => {
            let name = &engine.session().combatant(side).name;
            println!("Winner: {name} ({side})");
        }
        None => {
            if matches!(engine.session().phase(), Phase::Active { .. }) {
                println!("No winner after {max_turns} moves");
            }
        }
    }
    Ok(())
}
