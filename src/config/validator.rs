//! Configuration validation

use super::*;
use anyhow::Result;
use tracing::warn;

/// Largest node count the degree buffer can address (int32 wire format)
pub const MAX_NODES: usize = i32::MAX as usize;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_graph(&config.graph)?;
    validate_workers(&config.workers, config.graph.num_nodes)?;
    validate_output(&config.output)?;

    Ok(())
}

/// Validate graph configuration
pub fn validate_graph(graph: &GraphConfig) -> Result<()> {
    if graph.num_nodes == 0 {
        anyhow::bail!("num_nodes must be at least 1");
    }
    if graph.num_nodes > MAX_NODES {
        anyhow::bail!(
            "num_nodes ({}) exceeds the degree buffer limit of {}",
            graph.num_nodes,
            MAX_NODES
        );
    }

    if graph.direction == EdgeDirection::Symmetric && graph.mode != GeneratorMode::Approximate {
        anyhow::bail!("symmetric edges are only supported in approximate mode");
    }

    Ok(())
}

/// Validate worker configuration
pub fn validate_workers(workers: &WorkerConfig, num_nodes: usize) -> Result<()> {
    if workers.num_workers == Some(0) {
        anyhow::bail!("num_workers must be at least 1");
    }

    // More workers than nodes leaves some blocks empty, which is legal
    if workers.count() > num_nodes {
        warn!(
            workers = workers.count(),
            nodes = num_nodes,
            "more workers than nodes, some blocks will be empty"
        );
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if output.output_dir.as_os_str().is_empty() {
        anyhow::bail!("output_dir must not be empty");
    }

    if output.broadcast == BroadcastBackend::File {
        if output.input_dir.as_os_str().is_empty() {
            anyhow::bail!("input_dir must not be empty for the file broadcast");
        }
        if output.input_dir == output.output_dir {
            anyhow::bail!(
                "input_dir and output_dir must differ (both are {})",
                output.output_dir.display()
            );
        }
        if output.input_dir.starts_with(&output.output_dir)
            || output.output_dir.starts_with(&output.input_dir)
        {
            anyhow::bail!(
                "input_dir ({}) and output_dir ({}) must not be nested in each other",
                output.input_dir.display(),
                output.output_dir.display()
            );
        }
    }

    if let Some(ref merged) = output.merged_output {
        if merged.starts_with(&output.output_dir) {
            anyhow::bail!(
                "merged_output ({}) must not be inside output_dir ({})",
                merged.display(),
                output.output_dir.display()
            );
        }
    }

    Ok(())
}
