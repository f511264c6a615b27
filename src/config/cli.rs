//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// plgraph - partitioned power-law graph generator
///
/// Options left unset fall back to the TOML file given with `--config`, then
/// to built-in defaults.
#[derive(Parser, Debug, Default)]
#[command(name = "plgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Graph Options ===
    /// Number of nodes in the graph
    #[arg(short = 'n', long = "nodes")]
    pub num_nodes: Option<usize>,

    /// Number of workers (map and reduce tasks)
    #[arg(short = 'w', long = "workers")]
    pub num_workers: Option<usize>,

    /// Edge assignment mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Also emit the reverse of every edge (approximate mode only)
    #[arg(long)]
    pub symmetric: bool,

    /// Cumulative distribution normalization
    #[arg(long, value_enum)]
    pub normalization: Option<NormalizationArg>,

    /// Fixed sampler seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    // === Config File ===
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // === Output Options ===
    /// Directory for per-reducer part files
    #[arg(long, env = "PLGRAPH_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for the staged degree buffer
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Merged edge list path
    #[arg(long, value_name = "FILE")]
    pub merged_output: Option<PathBuf>,

    /// Skip the final merge of part files
    #[arg(long, conflicts_with = "merged_output")]
    pub no_merge: bool,

    /// Where the degree buffer is staged for workers
    #[arg(long, value_enum)]
    pub broadcast: Option<BroadcastArg>,

    /// Write a JSON run summary to this path
    #[arg(long, value_name = "FILE")]
    pub summary_json: Option<PathBuf>,

    // === Runtime Options ===
    /// Validate and print the configuration without generating
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

/// Edge assignment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Global wraparound with exact out-degrees
    Exact,
    /// Block-local saturation, no cross-worker reads
    Approximate,
}

/// Cumulative distribution normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NormalizationArg {
    /// Normalize every class
    Full,
    /// Leave the top class unnormalized
    Legacy,
}

/// Broadcast backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BroadcastArg {
    /// Keep the degree buffer in memory
    Memory,
    /// Stage the degree buffer as a file
    File,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.num_workers == Some(0) {
            anyhow::bail!("workers must be at least 1");
        }

        if self.num_nodes == Some(0) {
            anyhow::bail!("nodes must be at least 1");
        }

        Ok(())
    }
}
