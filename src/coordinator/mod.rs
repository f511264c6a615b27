//! Job coordinator
//!
//! Drives one generation job in-process: every map task runs in parallel on
//! the rayon pool, their credit tables are shuffled to the reducers, and every
//! reduce task then writes its own part file in parallel.
//!
//! Part files are named `part-r-NNNNN` after the reducer index. Each reducer
//! writes to a hidden temporary file first and renames it into place, so a
//! failed run never leaves a truncated part behind for the merge step.
//!
//! # Example
//!
//! ```
//! use plgraph::broadcast::{stage_degrees, InMemoryBroadcast};
//! use plgraph::coordinator::collect_edges;
//! use plgraph::generator::{EdgeDirection, GeneratorMode};
//! use plgraph::graph::DegreeVector;
//! use plgraph::worker::JobPlan;
//! use std::sync::Arc;
//!
//! let channel = InMemoryBroadcast::new();
//! stage_degrees(&channel, &DegreeVector::new(vec![1, 2, 0, 1])).unwrap();
//!
//! let plan = Arc::new(JobPlan::new(4, 2, 2, GeneratorMode::Exact, EdgeDirection::Forward));
//! let (edges, stats) = collect_edges(&plan, &channel).unwrap();
//! assert_eq!(edges.iter().map(Vec::len).sum::<usize>(), 4);
//! assert_eq!(stats.aggregate().edges, 4);
//! ```

use crate::broadcast::{
    stage_degrees, BroadcastChannel, FileBroadcast, InMemoryBroadcast, DEGREES_FILE_NAME,
};
use crate::config::{BroadcastBackend, Config, OutputConfig};
use crate::distribution::powerlaw::PowerLawSampler;
use crate::distribution::{DegreeSample, DegreeSampler};
use crate::error::GenResult;
use crate::generator::CreditTable;
use crate::graph::Edge;
use crate::output::merge::{merge_part_files, PART_PREFIX};
use crate::output::text::TextEdgeWriter;
use crate::stats::aggregator::StatisticsAggregator;
use crate::stats::WorkerStats;
use crate::worker::{JobPlan, MapOutput, Worker};
use crate::Result;
use anyhow::Context;
use rayon::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a finished job
#[derive(Debug)]
pub struct JobReport {
    pub plan: JobPlan,
    /// Map and reduce counters, merged per worker index
    pub stats: StatisticsAggregator,
    /// Part files in reducer order
    pub part_files: Vec<PathBuf>,
}

/// File name of a reducer's output
pub fn part_file_name(reducer: usize) -> String {
    format!("part-r-{:05}", reducer)
}

/// True for files a previous run wrote into the parts directory
fn is_part_artifact(name: &str) -> bool {
    name.starts_with(PART_PREFIX) || (name.starts_with(".part-") && name.ends_with(".tmp"))
}

/// True for files a previous run staged into the input directory
fn is_broadcast_artifact(name: &str) -> bool {
    name == DEGREES_FILE_NAME || name == "degrees.tmp"
}

/// Create `dir` if needed and delete the files in it that `generated` claims
///
/// Anything else in `dir` is left alone, so pointing a run at a directory
/// that holds unrelated data never destroys it. Returns the number of files
/// removed.
pub fn clear_generated_files(dir: &Path, generated: fn(&str) -> bool) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut removed = 0;
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if is_file && generated(name) {
            fs::remove_file(entry.path())
                .with_context(|| format!("Failed to remove {}", entry.path().display()))?;
            removed += 1;
        }
    }
    if removed > 0 {
        debug!(dir = %dir.display(), removed, "removed previous run output");
    }
    Ok(removed)
}

/// Open the broadcast channel selected by the output configuration
///
/// The file backend removes a degree buffer left by an earlier run.
pub fn open_broadcast(output: &OutputConfig) -> Result<Box<dyn BroadcastChannel>> {
    match output.broadcast {
        BroadcastBackend::Memory => Ok(Box::new(InMemoryBroadcast::new())),
        BroadcastBackend::File => {
            clear_generated_files(&output.input_dir, is_broadcast_artifact)?;
            Ok(Box::new(FileBroadcast::in_dir(&output.input_dir)))
        }
    }
}

/// Run every map task in parallel
pub fn run_map_stage(plan: &Arc<JobPlan>, channel: &dyn BroadcastChannel) -> GenResult<Vec<MapOutput>> {
    (0..plan.map_tasks)
        .into_par_iter()
        .map(|index| Worker::new(index, Arc::clone(plan)).run_map(channel))
        .collect()
}

/// Group map outputs by reducer
///
/// Entry `r` holds every non-empty table addressed to reducer `r`.
pub fn shuffle(outputs: Vec<MapOutput>, reducers: usize) -> Vec<Vec<CreditTable>> {
    let mut inputs: Vec<Vec<CreditTable>> = (0..reducers).map(|_| Vec::new()).collect();
    for output in outputs {
        for (reducer, table) in output.partitions.into_iter().enumerate() {
            if !table.is_empty() {
                if let Some(slot) = inputs.get_mut(reducer) {
                    slot.push(table);
                }
            }
        }
    }
    inputs
}

/// Run a whole job, writing one part file per reducer into `output_dir`
///
/// Part files from an earlier run are removed from `output_dir` first. Other
/// files there are kept. The degree buffer must already be staged on
/// `channel`.
pub fn run_job(
    plan: Arc<JobPlan>,
    channel: &dyn BroadcastChannel,
    output_dir: &Path,
) -> Result<JobReport> {
    clear_generated_files(output_dir, is_part_artifact)?;

    let outputs = run_map_stage(&plan, channel).context("Map stage failed")?;
    let mut stats = StatisticsAggregator::new();
    for output in &outputs {
        stats.add_worker(output.worker_index, output.stats.clone());
    }
    info!(tasks = outputs.len(), "map stage finished");

    let inputs = shuffle(outputs, plan.reduce_tasks);
    let reduced: Vec<(usize, WorkerStats, PathBuf)> = inputs
        .into_par_iter()
        .enumerate()
        .map(|(reducer, tables)| -> Result<(usize, WorkerStats, PathBuf)> {
            let worker = Worker::new(reducer, Arc::clone(&plan));
            let (reduce_stats, path) = write_part(&worker, tables, output_dir)?;
            Ok((reducer, reduce_stats, path))
        })
        .collect::<Result<_>>()?;

    let mut part_files = Vec::with_capacity(reduced.len());
    for (reducer, reduce_stats, path) in reduced {
        stats.add_worker(reducer, reduce_stats);
        part_files.push(path);
    }
    info!(
        tasks = part_files.len(),
        edges = stats.aggregate().edges,
        "reduce stage finished"
    );

    Ok(JobReport {
        plan: (*plan).clone(),
        stats,
        part_files,
    })
}

/// Run one reducer into its part file
fn write_part(
    worker: &Worker,
    tables: Vec<CreditTable>,
    output_dir: &Path,
) -> Result<(WorkerStats, PathBuf)> {
    let name = part_file_name(worker.index());
    let final_path = output_dir.join(&name);
    let tmp_path = output_dir.join(format!(".{}.tmp", name));

    let file = File::create(&tmp_path)
        .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
    let mut writer = TextEdgeWriter::new(file);
    let stats = worker
        .run_reduce(tables, &mut writer)
        .with_context(|| format!("Reduce task {} failed", worker.index()))?;
    writer
        .finish()
        .with_context(|| format!("Failed to flush {}", tmp_path.display()))?;

    fs::rename(&tmp_path, &final_path)
        .with_context(|| format!("Failed to move part file to {}", final_path.display()))?;
    Ok((stats, final_path))
}

/// Sample, stage, generate and merge according to `config`
///
/// The merged edge list is written only when `merged_output` is set.
pub fn run_generation(config: &Config) -> Result<(DegreeSample, JobReport)> {
    let mut sampler = match config.graph.seed {
        Some(seed) => PowerLawSampler::with_seed(config.graph.normalization, seed),
        None => PowerLawSampler::new(config.graph.normalization),
    };
    let sample = sampler.sample(config.graph.num_nodes);
    info!(
        nodes = sample.degrees.len(),
        normalization = %sampler.normalization(),
        total_degree = sample.degrees.total_degree(),
        dropped = sample.dropped_draws,
        "degree sequence sampled"
    );

    let channel = open_broadcast(&config.output)?;
    stage_degrees(channel.as_ref(), &sample.degrees).context("Failed to stage degree buffer")?;

    let plan = Arc::new(JobPlan::from_config(config));
    let report = run_job(plan, channel.as_ref(), &config.output.output_dir)?;

    if let Some(ref merged) = config.output.merged_output {
        merge_part_files(&config.output.output_dir, merged)?;
    }
    Ok((sample, report))
}

/// Run a whole job in memory, returning each reducer's edges
pub fn collect_edges(
    plan: &Arc<JobPlan>,
    channel: &dyn BroadcastChannel,
) -> GenResult<(Vec<Vec<Edge>>, StatisticsAggregator)> {
    let outputs = run_map_stage(plan, channel)?;
    let mut stats = StatisticsAggregator::new();
    for output in &outputs {
        stats.add_worker(output.worker_index, output.stats.clone());
    }

    let inputs = shuffle(outputs, plan.reduce_tasks);
    let reduced: Vec<(Vec<Edge>, WorkerStats)> = inputs
        .into_par_iter()
        .enumerate()
        .map(|(reducer, tables)| -> GenResult<(Vec<Edge>, WorkerStats)> {
            let mut edges: Vec<Edge> = Vec::new();
            let reduce_stats = Worker::new(reducer, Arc::clone(plan)).run_reduce(tables, &mut edges)?;
            Ok((edges, reduce_stats))
        })
        .collect::<GenResult<_>>()?;

    let mut edges = Vec::with_capacity(reduced.len());
    for (reducer, (reducer_edges, reduce_stats)) in reduced.into_iter().enumerate() {
        stats.add_worker(reducer, reduce_stats);
        edges.push(reducer_edges);
    }
    Ok((edges, stats))
}
