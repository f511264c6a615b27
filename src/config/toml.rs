//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert::{
    convert_broadcast, convert_direction, convert_mode, convert_normalization,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Override graph settings
    if let Some(num_nodes) = cli.num_nodes {
        config.graph.num_nodes = num_nodes;
    }
    if let Some(mode) = cli.mode {
        config.graph.mode = convert_mode(mode);
    }
    if let Some(direction) = convert_direction(cli.symmetric) {
        config.graph.direction = direction;
    }
    if let Some(normalization) = cli.normalization {
        config.graph.normalization = convert_normalization(normalization);
    }
    if let Some(seed) = cli.seed {
        config.graph.seed = Some(seed);
    }

    // Override worker settings
    if let Some(num_workers) = cli.num_workers {
        config.workers.num_workers = Some(num_workers);
    }

    // Override output settings
    if let Some(ref dir) = cli.output_dir {
        config.output.output_dir = dir.clone();
    }
    if let Some(ref dir) = cli.input_dir {
        config.output.input_dir = dir.clone();
    }
    if let Some(ref path) = cli.merged_output {
        config.output.merged_output = Some(path.clone());
    }
    if cli.no_merge {
        config.output.merged_output = None;
    }
    if let Some(broadcast) = cli.broadcast {
        config.output.broadcast = convert_broadcast(broadcast);
    }
    if let Some(ref path) = cli.summary_json {
        config.output.summary_json = Some(path.clone());
    }

    // Override runtime settings
    if cli.dry_run {
        config.runtime.dry_run = true;
    }
    if cli.debug {
        config.runtime.debug = true;
    }

    Ok(config)
}

/// Build the run configuration from the CLI and the optional `--config` file
pub fn build_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    merge_cli_with_config(cli, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::{ModeArg, NormalizationArg};
    use std::io::Write;

    #[test]
    fn test_parse_toml_basic() {
        let toml = r#"
            [graph]
            num_nodes = 5000
            mode = "approximate"
            direction = "symmetric"
            normalization = "legacy"
            seed = 7

            [workers]
            num_workers = 8

            [output]
            output_dir = "out"
            broadcast = "memory"
        "#;

        let config = parse_toml_string(toml).unwrap();
        assert_eq!(config.graph.num_nodes, 5000);
        assert_eq!(config.graph.mode, GeneratorMode::Approximate);
        assert_eq!(config.graph.direction, EdgeDirection::Symmetric);
        assert_eq!(config.graph.normalization, Normalization::Legacy);
        assert_eq!(config.graph.seed, Some(7));
        assert_eq!(config.workers.count(), 8);
        assert!(config.workers.is_explicit());
        assert_eq!(config.output.output_dir, PathBuf::from("out"));
        assert_eq!(config.output.broadcast, BroadcastBackend::Memory);
        // Untouched fields keep their defaults
        assert_eq!(config.output.input_dir, PathBuf::from("graph_input"));
    }

    #[test]
    fn test_parse_toml_empty_is_default() {
        let config = parse_toml_string("").unwrap();
        assert_eq!(config.graph.num_nodes, 1000);
        assert!(!config.workers.is_explicit());
        assert_eq!(
            config.output.merged_output,
            Some(PathBuf::from("graph_output_final.txt"))
        );
    }

    #[test]
    fn test_parse_toml_rejects_unknown_mode() {
        let err = parse_toml_string("[graph]\nmode = \"fast\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_cli_overrides_toml() {
        let config = parse_toml_string("[graph]\nnum_nodes = 10\n[workers]\nnum_workers = 2\n")
            .unwrap();
        let cli = Cli {
            num_nodes: Some(99),
            mode: Some(ModeArg::Approximate),
            normalization: Some(NormalizationArg::Legacy),
            symmetric: true,
            no_merge: true,
            ..Default::default()
        };

        let merged = merge_cli_with_config(&cli, config).unwrap();
        assert_eq!(merged.graph.num_nodes, 99);
        assert_eq!(merged.graph.mode, GeneratorMode::Approximate);
        assert_eq!(merged.graph.direction, EdgeDirection::Symmetric);
        assert_eq!(merged.graph.normalization, Normalization::Legacy);
        assert_eq!(merged.workers.count(), 2);
        assert!(merged.output.merged_output.is_none());
    }

    #[test]
    fn test_build_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[graph]\nnum_nodes = 42").unwrap();

        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            num_workers: Some(3),
            ..Default::default()
        };
        let config = build_config(&cli).unwrap();
        assert_eq!(config.graph.num_nodes, 42);
        assert_eq!(config.workers.count(), 3);
    }

    #[test]
    fn test_build_config_missing_file() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/plgraph.toml")),
            ..Default::default()
        };
        let err = build_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
