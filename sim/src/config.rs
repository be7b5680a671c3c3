use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use common::config::Tunables;

const LOG_FILTER: &str = "info";

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SnapshotFormat {
    Json,
    Bincode,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless maze quest simulator", long_about = None)]
pub struct Args {
    // JSON file with tunables; missing fields keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    // Seed for maze generation and NPC spawning (random if omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    // Number of frames to run
    #[arg(short, long, default_value_t = 600)]
    pub frames: u64,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    #[arg(long)]
    pub npcs: Option<usize>,

    // Punch the entry and exit doors through the outer wall
    #[arg(long, default_value_t = false)]
    pub open_doors: bool,

    // Intent script, one frame per line; the autopilot plays when omitted
    #[arg(long)]
    pub script: Option<PathBuf>,

    // Write the final frame's snapshot here
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = SnapshotFormat::Bincode)]
    pub format: SnapshotFormat,
}

impl Args {
    // Tunables from the config file (if any) with command-line overrides applied.
    pub fn tunables(&self) -> Result<Tunables> {
        let mut tunables = match &self.config {
            Some(path) => load_config(path)?,
            None => Tunables::default(),
        };

        if let Some(width) = self.width {
            tunables.width = width;
        }
        if let Some(height) = self.height {
            tunables.height = height;
        }
        if let Some(npcs) = self.npcs {
            tunables.num_npcs = npcs;
        }
        if self.open_doors {
            tunables.open_doors = true;
        }

        if let Err(err) = tunables.validate() {
            warn!("rejected tunables: {err:#}");
            return Err(err);
        }
        Ok(tunables)
    }
}

#[cfg(feature = "json")]
fn load_config(path: &std::path::Path) -> Result<Tunables> {
    common::config::load_tunables(path)
}

#[cfg(not(feature = "json"))]
fn load_config(path: &std::path::Path) -> Result<Tunables> {
    anyhow::bail!("cannot read {}: built without the json feature", path.display())
}

// ============================================================================
// Logging
// ============================================================================

// Install the global subscriber. RUST_LOG overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let args = Args::parse_from(["sim", "--width", "7", "--height", "5", "--npcs", "2", "--open-doors"]);
        let tunables = args.tunables().expect("valid");
        assert_eq!(tunables.width, 7);
        assert_eq!(tunables.height, 5);
        assert_eq!(tunables.num_npcs, 2);
        assert!(tunables.open_doors);
        assert_eq!(args.frames, 600);
        assert_eq!(args.format, SnapshotFormat::Bincode);
    }

    #[test]
    fn zero_width_is_rejected() {
        let args = Args::parse_from(["sim", "--width", "0"]);
        assert!(args.tunables().is_err());
    }

    #[test]
    fn format_parses_from_its_name() {
        let args = Args::parse_from(["sim", "--format", "json", "--seed", "9"]);
        assert_eq!(args.format, SnapshotFormat::Json);
        assert_eq!(args.seed, Some(9));
    }
}
