//! Human-readable text output
//!
//! Two concerns live here: the tab-separated edge writer used for part files,
//! and the console report printed before and after a run.

use crate::config::Config;
use crate::coordinator::JobReport;
use crate::distribution::DegreeSample;
use crate::graph::{Edge, EdgeSink};
use std::io::{self, BufWriter, Write};
use std::time::Duration;

/// Edge sink writing one `source<TAB>target` line per edge
///
/// Output is buffered; call [`TextEdgeWriter::finish`] to flush and get the
/// underlying writer back.
pub struct TextEdgeWriter<W: Write> {
    out: BufWriter<W>,
    lines: u64,
}

impl<W: Write> TextEdgeWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            out: BufWriter::new(inner),
            lines: 0,
        }
    }

    /// Lines written so far
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush buffered lines and return the inner writer
    pub fn finish(self) -> io::Result<W> {
        self.out.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> EdgeSink for TextEdgeWriter<W> {
    fn emit(&mut self, (source, target): Edge) -> io::Result<()> {
        writeln!(self.out, "{}\t{}", source, target)?;
        self.lines += 1;
        Ok(())
    }
}

/// Print the effective configuration
pub fn print_configuration(config: &Config) {
    println!("Configuration:");
    println!("  Graph:");
    println!("    Nodes: {}", format_number(config.graph.num_nodes as u64));
    println!("    Mode: {}", config.graph.mode);
    if config.graph.mode == crate::generator::GeneratorMode::Approximate {
        println!("    Direction: {}", config.graph.direction);
    }
    println!("    Normalization: {}", config.graph.normalization);
    if let Some(seed) = config.graph.seed {
        println!("    Seed: {}", seed);
    }
    println!("  Workers: {}", config.workers);
    println!("    Map tasks: {}", config.map_tasks());
    println!("    Reduce tasks: {}", config.reduce_tasks());
    println!("  Output:");
    println!("    Parts: {}", config.output.output_dir.display());
    println!("    Broadcast: {}", config.output.broadcast);
    match config.output.merged_output {
        Some(ref merged) => println!("    Merged: {}", merged.display()),
        None => println!("    Merged: (skipped)"),
    }
    if let Some(ref summary) = config.output.summary_json {
        println!("    Summary: {}", summary.display());
    }
}

/// Print run results to console
///
/// Displays the sampled degree sequence, the per-stage counters and a
/// per-worker breakdown when more than one worker ran.
pub fn print_results(sample: &DegreeSample, report: &JobReport, duration: Duration) {
    let aggregate = report.stats.aggregate();

    println!("═══════════════════════════════════════════════════════════");
    println!("                    RUN RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Elapsed Time: {:.3}s", duration.as_secs_f64());
    println!();

    println!("Degree Sequence:");
    println!("  Nodes:         {}", format_number(sample.degrees.len() as u64));
    println!("  Total degree:  {}", format_number(sample.degrees.total_degree()));
    println!("  Max degree:    {}", format_number(sample.degrees.max_degree() as u64));
    println!(
        "  Draws:         {} assigned, {} dropped",
        format_number(sample.assigned_draws()),
        format_number(sample.dropped_draws)
    );
    println!();

    println!("Map Stage ({} tasks):", report.plan.map_tasks);
    println!("  Credits:       {}", format_number(aggregate.credits_emitted));
    println!("  Credit total:  {}", format_number(aggregate.credit_total));
    if aggregate.cancelled > 0 {
        println!("  Cancelled:     {}", format_number(aggregate.cancelled));
    }
    println!();

    println!("Reduce Stage ({} tasks):", report.plan.reduce_tasks);
    println!("  Sources:       {}", format_number(aggregate.sources));
    println!("  Edges:         {}", format_number(aggregate.edges));
    println!("  Self-loops:    {}", format_number(aggregate.self_loops));
    println!("  Degree drift:  {:+}", aggregate.degree_drift());
    println!("  Part files:    {}", report.part_files.len());
    println!();

    if report.stats.num_workers() > 1 {
        println!("Per Worker:");
        println!("  {:>6} {:>12} {:>12} {:>14} {:>10}", "id", "nodes", "credits", "edges", "time");
        for (id, stats) in report.stats.per_worker() {
            println!(
                "  {:>6} {:>12} {:>12} {:>14} {:>10}",
                id,
                format_number(stats.nodes),
                format_number(stats.credits_emitted),
                format_number(stats.edges),
                format_duration(Duration::from_micros(stats.elapsed_us))
            );
        }
        println!();
    }

    println!("═══════════════════════════════════════════════════════════");
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, c) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a duration with a unit fitting its magnitude
pub fn format_duration(d: Duration) -> String {
    let micros = d.as_micros() as u64;
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.3}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.3}s", micros as f64 / 1_000_000.0)
    }
}
