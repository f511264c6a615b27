//! Merge of reducer part files
//!
//! The merged edge list is the byte-for-byte concatenation of every regular
//! file in the parts directory whose name starts with `part-`, taken in name
//! order. Nothing is deduplicated, sorted or validated.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Name prefix shared by all reducer outputs
pub const PART_PREFIX: &str = "part-";

/// Part files in `dir`, sorted by file name
pub fn list_part_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list part files in {}", dir.display()))?;

    let mut parts = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let is_part = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(PART_PREFIX));
        if is_part && entry.file_type()?.is_file() {
            parts.push(entry.path());
        }
    }
    parts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(parts)
}

/// Concatenate all part files of `parts_dir` into `merged`
///
/// Returns the number of bytes written.
pub fn merge_part_files(parts_dir: &Path, merged: &Path) -> Result<u64> {
    let parts = list_part_files(parts_dir)?;

    if let Some(parent) = merged.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = File::create(merged)
        .with_context(|| format!("Failed to create merged output {}", merged.display()))?;
    let mut out = BufWriter::new(file);

    let mut written = 0u64;
    for part in &parts {
        let mut input =
            File::open(part).with_context(|| format!("Failed to open {}", part.display()))?;
        written += io::copy(&mut input, &mut out)
            .with_context(|| format!("Failed to copy {}", part.display()))?;
    }
    out.flush()
        .with_context(|| format!("Failed to flush {}", merged.display()))?;

    info!(
        parts = parts.len(),
        bytes = written,
        merged = %merged.display(),
        "merged part files"
    );
    Ok(written)
}
