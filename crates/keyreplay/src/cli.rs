//! Command-line interface definitions for keyreplay.

use std::path::PathBuf;

use clap::Parser;
use logging::LogArgs;

/// Default interval between simulated frames while waiting.
pub const DEFAULT_TICK_MS: u64 = 16;

/// Command-line interface for the `keyreplay` binary.
#[derive(Parser, Debug)]
#[command(
    name = "keyreplay",
    about = "Replay a scripted input scenario against the keybind engine",
    version
)]
pub struct Cli {
    /// Logging controls shared across keybind binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Scenario file (RON) describing bindings and input steps.
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Persist remaps to this JSON store instead of an in-memory one.
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Frame interval used by `wait` steps; overrides the scenario's value.
    #[arg(long, value_name = "MS")]
    pub tick_ms: Option<u64>,
}
