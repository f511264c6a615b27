//! JSON run summary
//!
//! One document per run: when it ran, with which parameters, what the sampler
//! produced and what every worker did.

use crate::config::Config;
use crate::coordinator::JobReport;
use crate::distribution::DegreeSample;
use crate::stats::WorkerStats;
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Duration with both microseconds and a human-readable form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: crate::output::text::format_duration(d),
        }
    }
}

/// Parameters the run was started with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRunConfig {
    pub num_nodes: usize,
    pub mode: String,
    pub direction: String,
    pub normalization: String,
    pub map_tasks: usize,
    pub reduce_tasks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// What the degree sampler produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDegreeSummary {
    pub total_degree: u64,
    pub max_degree: u32,
    pub assigned_draws: u64,
    pub dropped_draws: u64,
    /// Nodes per degree class, index = degree
    pub histogram: Vec<u64>,
}

/// Counters of one worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWorker {
    pub worker_id: usize,
    #[serde(flatten)]
    pub stats: WorkerStats,
}

/// Complete run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRunSummary {
    pub tool: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub duration: JsonDuration,
    pub config: JsonRunConfig,
    pub degrees: JsonDegreeSummary,
    pub aggregate: WorkerStats,
    pub workers: Vec<JsonWorker>,
    pub part_files: Vec<String>,
}

/// Build the summary document for a finished run
pub fn build_run_summary(
    config: &Config,
    sample: &DegreeSample,
    report: &JobReport,
    duration: Duration,
) -> JsonRunSummary {
    JsonRunSummary {
        tool: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        duration: JsonDuration::from_duration(duration),
        config: JsonRunConfig {
            num_nodes: config.graph.num_nodes,
            mode: config.graph.mode.to_string(),
            direction: config.graph.direction.to_string(),
            normalization: config.graph.normalization.to_string(),
            map_tasks: report.plan.map_tasks,
            reduce_tasks: report.plan.reduce_tasks,
            seed: config.graph.seed,
        },
        degrees: JsonDegreeSummary {
            total_degree: sample.degrees.total_degree(),
            max_degree: sample.degrees.max_degree(),
            assigned_draws: sample.assigned_draws(),
            dropped_draws: sample.dropped_draws,
            histogram: sample.histogram.clone(),
        },
        aggregate: report.stats.aggregate(),
        workers: report
            .stats
            .per_worker()
            .map(|(worker_id, stats)| JsonWorker {
                worker_id,
                stats: stats.clone(),
            })
            .collect(),
        part_files: report
            .part_files
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    }
}

/// Write the summary as JSON
pub fn write_json_output(output_path: &Path, summary: &JsonRunSummary, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON summary {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, summary)?;
    } else {
        serde_json::to_writer(&mut writer, summary)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush JSON summary {}", output_path.display()))?;

    Ok(())
}
