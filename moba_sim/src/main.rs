//! moba_sim - run a seeded duel between the first two roster characters

use anyhow::{Context, Result};
use clap::Parser;
use moba_core::config::ContentPack;
use moba_core::types::CharacterId;
use moba_sim::{default_roster, load_roster, Combatant, DuelReport, DuelSimulation};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Headless MOBA duel simulator
#[derive(Parser, Debug)]
#[command(name = "moba_sim")]
#[command(about = "Simulate a duel between two characters")]
#[command(version)]
struct Args {
    /// RNG seed for weapon rolls
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Maximum duel length in seconds
    #[arg(long, default_value = "120")]
    duration: f64,

    /// Simulation step in seconds
    #[arg(long, default_value = "0.1")]
    tick: f64,

    /// Directory with constants/levels/abilities/effects/items TOML overrides
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Roster file, defaults to the bundled roster
    #[arg(long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let content = match &args.config_dir {
        Some(dir) => ContentPack::load_dir(dir)
            .with_context(|| format!("loading content from {}", dir.display()))?,
        None => ContentPack::defaults(),
    };
    let roster = match &args.roster {
        Some(path) => {
            load_roster(path).with_context(|| format!("loading roster {}", path.display()))?
        }
        None => default_roster().context("parsing bundled roster")?,
    };

    let mut sides = Vec::with_capacity(2);
    for (index, template) in roster.characters.iter().take(2).enumerate() {
        let (character, abilities) = template
            .build(CharacterId(index as u32 + 1), &content)
            .with_context(|| format!("building {}", template.name))?;
        sides.push(Combatant::new(character, abilities));
    }
    let second = sides.pop().context("roster is missing the second character")?;
    let first = sides.pop().context("roster is missing the first character")?;

    info!(
        seed = args.seed,
        first = %first.character.name,
        second = %second.character.name,
        "duel starting"
    );
    let sim = DuelSimulation::new(first, second, &content, ChaCha8Rng::seed_from_u64(args.seed));
    let report = sim.run(args.duration, args.tick);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &DuelReport) {
    println!("\n{}", "=".repeat(60));
    match (&report.winner, report.kill_time) {
        (Some(winner), Some(t)) => println!("  {} wins at {:.1}s", winner, t),
        _ => println!("  No winner after {:.1}s", report.duration),
    }
    println!("{}\n", "=".repeat(60));

    for stats in &report.combatants {
        println!("  {}", stats.name);
        println!("    Damage dealt:   {:.0}", stats.damage_dealt);
        println!("    Healing done:   {:.0}", stats.healing_done);
        println!("    Casts:          {}", stats.casts);
        println!("    Potions used:   {}", stats.potions_used);
        println!("    Health left:    {:.0}", stats.health_remaining);
        println!("    Stat changes:   {}", stats.attribute_changes);
    }
}
