//! Encounter simulator entry point.
//!
//! Loads an encounter description, runs it to completion and prints the
//! outcome records as plain text or JSON lines.
//! Run with: `cargo run -p battle-sim -- <encounter.toml>`

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use battle_content::EncounterLoader;
use battle_core::{Encounter, EncounterSpec};
use clap::Parser;
use tracing::info;

/// Turn-based encounter simulator
#[derive(Parser)]
#[command(name = "battle-sim")]
#[command(about = "Runs a hero roster against a boss and prints every outcome", long_about = None)]
#[command(version)]
struct Cli {
    /// Encounter file (.toml or .ron)
    encounter: PathBuf,

    /// Override the encounter seed
    #[arg(long)]
    seed: Option<u64>,

    /// Engage the core modifier (control durations shortened by one round)
    #[arg(long)]
    core: bool,

    /// Override the round cap
    #[arg(long, value_name = "N")]
    rounds: Option<u32>,

    /// Print outcome records as JSON lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply_overrides(&self, spec: &mut EncounterSpec) {
        if let Some(seed) = self.seed {
            spec.config.seed = seed;
        }
        if self.core {
            spec.config.core_engaged = true;
        }
        if let Some(rounds) = self.rounds {
            spec.config.round_cap = rounds.max(1);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut spec = EncounterLoader::load(&cli.encounter)?;
    cli.apply_overrides(&mut spec);
    info!(
        heroes = spec.heroes.len(),
        seed = spec.config.seed,
        core = spec.config.core_engaged,
        "starting encounter"
    );

    let mut encounter = Encounter::new(&spec).context("Invalid encounter")?;
    let result = encounter.run();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for outcome in encounter.outcomes() {
        if cli.json {
            serde_json::to_writer(&mut out, outcome)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{outcome}")?;
        }
    }

    if !cli.json {
        let state = encounter.state();
        writeln!(out)?;
        writeln!(out, "Result: {result} after {} rounds", state.round())?;
        for hero in state.heroes() {
            writeln!(
                out,
                "  {:<16} hp {:>10}/{:<10} dealt {}",
                hero.name(),
                hero.hp(),
                hero.max_hp(),
                hero.damage_dealt()
            )?;
        }
        let boss = state.boss();
        writeln!(out, "  {:<16} hp {:>10}/{:<10}", boss.name(), boss.hp(), boss.max_hp())?;
    }
    out.flush()?;

    Ok(())
}
