//! plgraph CLI entry point

use anyhow::{Context, Result};
use plgraph::config::{cli::Cli, toml::build_config, validator::validate_config};
use plgraph::coordinator::run_generation;
use plgraph::logging::init_logging;
use plgraph::output::{json, text};
use std::time::Instant;
use tracing::debug;

fn main() -> Result<()> {
    let main_start = Instant::now();

    println!("plgraph v{}", env!("CARGO_PKG_VERSION"));
    println!("Partitioned power-law graph generator");
    println!();

    // Parse CLI arguments
    let cli = Cli::parse_args();
    cli.validate()?;

    // Build configuration (TOML file, then CLI overrides)
    let config = build_config(&cli)?;
    init_logging(config.runtime.debug).context("Failed to initialise logging")?;
    debug!(elapsed_ms = main_start.elapsed().as_millis() as u64, "configuration built");

    validate_config(&config).context("Configuration validation failed")?;

    text::print_configuration(&config);

    if config.runtime.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    println!();
    println!("Generating graph...");
    println!();

    let run_start = Instant::now();
    let (sample, report) = run_generation(&config)?;
    let duration = run_start.elapsed();

    text::print_results(&sample, &report, duration);

    if let Some(ref merged) = config.output.merged_output {
        println!("Merged edge list: {}", merged.display());
    }

    if let Some(ref path) = config.output.summary_json {
        let summary = json::build_run_summary(&config, &sample, &report, duration);
        json::write_json_output(path, &summary, true)?;
        println!("JSON summary: {}", path.display());
    }

    Ok(())
}
