//! Entry point for the `keyreplay` binary.
//!
//! Loads a RON scenario, replays its steps against the keybind engine on a
//! simulated host, and prints every callback that fired.

mod cli;
mod error;
mod replay;
mod scenario;

use std::{process, sync::Arc};

use clap::Parser;
use keystore::{FileStore, KeyStore, MemoryStore};
use tracing::{error, warn};

use crate::{
    cli::{Cli, DEFAULT_TICK_MS},
    error::Result,
    replay::{Replay, render_text},
    scenario::Scenario,
};

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log);
    if let Err(err) = run(&cli) {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(err.exit_code());
    }
}

/// Load the scenario, replay it, and print the report.
fn run(cli: &Cli) -> Result<()> {
    let scenario = Scenario::load(&cli.scenario)?;
    let store: Arc<dyn KeyStore> = match &cli.store {
        Some(path) => {
            if !scenario.stored.is_empty() {
                warn!(
                    "ignoring {} preloaded store values; using {}",
                    scenario.stored.len(),
                    path.display()
                );
            }
            Arc::new(FileStore::open(path)?)
        }
        None => Arc::new(MemoryStore::with_values(scenario.stored.clone())),
    };
    let tick_ms = cli
        .tick_ms
        .or(scenario.tick_ms)
        .unwrap_or(DEFAULT_TICK_MS);

    let mut replay = Replay::new(&scenario, store, tick_ms)?;
    replay.run(&scenario.steps)?;
    let report = replay.report();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}
