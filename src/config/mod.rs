//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::distribution::powerlaw::Normalization;
use crate::generator::{EdgeDirection, GeneratorMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub workers: WorkerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// What graph to generate and how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Number of nodes N
    #[serde(default = "default_num_nodes")]
    pub num_nodes: usize,
    /// Edge assignment algorithm
    #[serde(default)]
    pub mode: GeneratorMode,
    /// Emit back edges in the approximate path
    #[serde(default)]
    pub direction: EdgeDirection,
    /// Cumulative distribution normalization
    #[serde(default)]
    pub normalization: Normalization,
    /// Fixed sampler seed (tests and debugging only)
    pub seed: Option<u64>,
}

fn default_num_nodes() -> usize {
    1000
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            num_nodes: default_num_nodes(),
            mode: GeneratorMode::default(),
            direction: EdgeDirection::default(),
            normalization: Normalization::default(),
            seed: None,
        }
    }
}

/// Worker configuration
///
/// `num_workers` is kept optional so the run can tell an explicit worker count
/// from the default one (see [`select_map_tasks`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of workers (map and reduce tasks)
    pub num_workers: Option<usize>,
}

fn default_num_workers() -> usize {
    1
}

impl WorkerConfig {
    /// Worker count, falling back to the default of 1
    pub fn count(&self) -> usize {
        self.num_workers.unwrap_or_else(default_num_workers)
    }

    /// Whether the worker count was given explicitly
    pub fn is_explicit(&self) -> bool {
        self.num_workers.is_some()
    }
}

/// Where the broadcast degree buffer lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastBackend {
    /// Held in process memory
    Memory,
    /// Written to `<input_dir>/degrees.dat`
    #[default]
    File,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for per-reducer part files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory for the staged degree buffer
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Merged edge list (None skips the merge)
    #[serde(default = "default_merged_output")]
    pub merged_output: Option<PathBuf>,
    /// Broadcast backend for the degree buffer
    #[serde(default)]
    pub broadcast: BroadcastBackend,
    /// JSON run summary path
    pub summary_json: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("graph_output")
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("graph_input")
}

fn default_merged_output() -> Option<PathBuf> {
    Some(PathBuf::from("graph_output_final.txt"))
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            input_dir: default_input_dir(),
            merged_output: default_merged_output(),
            broadcast: BroadcastBackend::default(),
            summary_json: None,
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Validate and print the configuration, then exit
    #[serde(default)]
    pub dry_run: bool,
    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

/// Number of map tasks for a run
///
/// With more than one worker and no explicit worker count the task count
/// grows to `round(ln N)`. The worker count can only exceed its default of 1
/// when it was given explicitly, so that branch is unreachable in practice.
/// It is kept unchanged instead of being reactivated under a new condition.
pub fn select_map_tasks(num_nodes: usize, num_workers: usize, explicit_workers: bool) -> usize {
    let map_tasks = if num_workers > 1 && !explicit_workers {
        let by_size = (num_nodes as f64).ln().round();
        let by_size = if by_size.is_finite() && by_size > 0.0 {
            by_size as usize
        } else {
            0
        };
        num_workers.max(by_size)
    } else {
        num_workers
    };
    map_tasks.max(1)
}

impl Config {
    /// Map task count for this configuration
    pub fn map_tasks(&self) -> usize {
        select_map_tasks(
            self.graph.num_nodes,
            self.workers.count(),
            self.workers.is_explicit(),
        )
    }

    /// Reduce task count for this configuration
    ///
    /// The approximate path routes each node to the reducer that owns its
    /// block, so it needs one reducer per map task.
    pub fn reduce_tasks(&self) -> usize {
        match self.graph.mode {
            GeneratorMode::Exact => self.workers.count().max(1),
            GeneratorMode::Approximate => self.map_tasks(),
        }
    }
}

// Display trait implementations

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Graph: {}", self.graph)?;
        writeln!(f, "  Workers: {}", self.workers)?;
        writeln!(f, "  Output: {}", self.output)?;
        writeln!(f, "  Runtime: {}", self.runtime)?;
        Ok(())
    }
}

impl fmt::Display for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, mode={}, normalization={}",
            self.num_nodes, self.mode, self.normalization
        )?;
        if self.mode == GeneratorMode::Approximate {
            write!(f, ", direction={}", self.direction)?;
        }
        if let Some(seed) = self.seed {
            write!(f, ", seed={}", seed)?;
        }
        Ok(())
    }
}

impl fmt::Display for WorkerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} worker(s)", self.count())?;
        if !self.is_explicit() {
            write!(f, " (default)")?;
        }
        Ok(())
    }
}

impl fmt::Display for BroadcastBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastBackend::Memory => write!(f, "memory"),
            BroadcastBackend::File => write!(f, "file"),
        }
    }
}

impl fmt::Display for OutputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parts={}, broadcast={}",
            self.output_dir.display(),
            self.broadcast
        )?;
        if let Some(ref merged) = self.merged_output {
            write!(f, ", merged={}", merged.display())?;
        }
        if let Some(ref summary) = self.summary_json {
            write!(f, ", summary={}", summary.display())?;
        }
        Ok(())
    }
}

impl fmt::Display for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.dry_run {
            parts.push("dry_run");
        }
        if self.debug {
            parts.push("debug");
        }
        if parts.is_empty() {
            write!(f, "default")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.graph.num_nodes, 1000);
        assert_eq!(config.workers.count(), 1);
        assert!(!config.workers.is_explicit());
        assert_eq!(config.graph.mode, GeneratorMode::Exact);
        assert_eq!(config.output.broadcast, BroadcastBackend::File);
        assert_eq!(config.map_tasks(), 1);
    }

    #[test]
    fn test_select_map_tasks_explicit_workers() {
        assert_eq!(select_map_tasks(1_000_000, 4, true), 4);
        assert_eq!(select_map_tasks(10, 1, true), 1);
    }

    #[test]
    fn test_select_map_tasks_auto_branch_when_called_directly() {
        // ln(1e6) ≈ 13.8
        assert_eq!(select_map_tasks(1_000_000, 4, false), 14);
        assert_eq!(select_map_tasks(10, 4, false), 4);
        assert_eq!(select_map_tasks(0, 2, false), 2);
    }

    #[test]
    fn test_auto_branch_unreachable_from_config() {
        // Default worker count is 1, anything larger is explicit
        let mut config = Config::default();
        config.graph.num_nodes = 1_000_000;
        assert_eq!(config.map_tasks(), 1);

        config.workers.num_workers = Some(4);
        assert_eq!(config.map_tasks(), 4);
    }

    #[test]
    fn test_reduce_tasks_follow_mode() {
        let mut config = Config::default();
        config.workers.num_workers = Some(3);
        assert_eq!(config.reduce_tasks(), 3);
        config.graph.mode = GeneratorMode::Approximate;
        assert_eq!(config.reduce_tasks(), 3);
    }

    #[test]
    fn test_display() {
        let mut config = Config::default();
        config.graph.seed = Some(9);
        let text = config.to_string();
        assert!(text.contains("1000 nodes"));
        assert!(text.contains("seed=9"));
        assert!(text.contains("1 worker(s) (default)"));
    }
}
