//! Degree vector staging and broadcast
//!
//! The degree vector is serialized once by the driver and then read by every
//! worker. Workers only ever see the decoded, immutable [`DegreeVector`].
//!
//! # Wire Format
//!
//! Fixed-width big-endian 32-bit signed integers:
//!
//! ```text
//! int32 N
//! int32 degree[0]
//! int32 degree[1]
//! ...
//! int32 degree[N-1]
//! ```
//!
//! A reader checks the declared `N` against its own configured node count and
//! rejects the buffer on mismatch.
//!
//! # Backends
//!
//! - [`InMemoryBroadcast`]: single process, buffer held behind an `Arc`
//! - [`FileBroadcast`]: buffer written to a `degrees.dat` file once and
//!   read back by each worker
//!
//! # Example
//!
//! ```
//! use plgraph::broadcast::{load_degrees, stage_degrees, InMemoryBroadcast};
//! use plgraph::graph::DegreeVector;
//!
//! let channel = InMemoryBroadcast::new();
//! stage_degrees(&channel, &DegreeVector::new(vec![3, 1, 1, 1])).unwrap();
//!
//! let degrees = load_degrees(&channel, 4).unwrap();
//! assert_eq!(degrees.as_slice(), &[3, 1, 1, 1]);
//! assert!(load_degrees(&channel, 5).is_err());
//! ```

use crate::error::{GenError, GenResult};
use crate::graph::DegreeVector;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// File name used by [`FileBroadcast::in_dir`]
pub const DEGREES_FILE_NAME: &str = "degrees.dat";

/// Size of one wire integer
const WORD: usize = 4;

/// Transport for the serialized degree buffer
///
/// `stage` is called once by the driver before any worker starts; `fetch` is
/// called by every worker and must not hand out a writable view.
pub trait BroadcastChannel: Send + Sync {
    /// Publish the serialized buffer
    fn stage(&self, buffer: Vec<u8>) -> GenResult<()>;

    /// Read the published buffer
    ///
    /// Returns [`GenError::BroadcastMissing`] if nothing was staged.
    fn fetch(&self) -> GenResult<Arc<[u8]>>;
}

/// Serialize a degree vector into the wire format
///
/// # Errors
///
/// Returns [`GenError::Config`] if the node count or a degree does not fit in
/// a signed 32-bit integer.
pub fn encode(degrees: &DegreeVector) -> GenResult<Vec<u8>> {
    let num_nodes = i32::try_from(degrees.len()).map_err(|_| {
        GenError::Config(format!(
            "{} nodes do not fit the 32-bit degree buffer",
            degrees.len()
        ))
    })?;

    let mut buffer = Vec::with_capacity(WORD * (degrees.len() + 1));
    buffer.extend_from_slice(&num_nodes.to_be_bytes());
    for (node, &degree) in degrees.as_slice().iter().enumerate() {
        let degree = i32::try_from(degree).map_err(|_| {
            GenError::Config(format!("degree {} of node {} overflows int32", degree, node))
        })?;
        buffer.extend_from_slice(&degree.to_be_bytes());
    }

    Ok(buffer)
}

/// Parse a wire buffer, checking it against the configured node count
///
/// # Errors
///
/// Returns [`GenError::Format`] if the declared node count differs from
/// `expected_nodes`, the buffer length does not match the declared count, or a
/// degree is negative.
pub fn decode(buffer: &[u8], expected_nodes: usize) -> GenResult<DegreeVector> {
    if buffer.len() < WORD {
        return Err(GenError::Format(format!(
            "buffer too small for node count (need {} bytes, got {})",
            WORD,
            buffer.len()
        )));
    }

    let declared = read_i32(&buffer[..WORD]);
    if usize::try_from(declared).ok() != Some(expected_nodes) {
        return Err(GenError::Format(format!(
            "buffer declares {} nodes but {} are configured",
            declared, expected_nodes
        )));
    }

    let body = &buffer[WORD..];
    if body.len() != expected_nodes * WORD {
        return Err(GenError::Format(format!(
            "expected {} bytes of degrees, got {}",
            expected_nodes * WORD,
            body.len()
        )));
    }

    let degrees = body
        .chunks_exact(WORD)
        .enumerate()
        .map(|(node, chunk)| {
            let degree = read_i32(chunk);
            u32::try_from(degree).map_err(|_| {
                GenError::Format(format!("negative degree {} for node {}", degree, node))
            })
        })
        .collect::<GenResult<Vec<u32>>>()?;

    Ok(DegreeVector::new(degrees))
}

fn read_i32(chunk: &[u8]) -> i32 {
    let mut bytes = [0u8; WORD];
    bytes.copy_from_slice(chunk);
    i32::from_be_bytes(bytes)
}

/// Encode and stage a degree vector on a channel
pub fn stage_degrees(channel: &dyn BroadcastChannel, degrees: &DegreeVector) -> GenResult<()> {
    let buffer = encode(degrees)?;
    debug!(bytes = buffer.len(), nodes = degrees.len(), "staging degree buffer");
    channel.stage(buffer)
}

/// Worker-side setup: fetch and decode the staged degree vector
pub fn load_degrees(channel: &dyn BroadcastChannel, expected_nodes: usize) -> GenResult<DegreeVector> {
    let buffer = channel.fetch()?;
    decode(&buffer, expected_nodes)
}

/// Broadcast held in process memory
///
/// The buffer can be staged exactly once.
#[derive(Debug, Default)]
pub struct InMemoryBroadcast {
    buffer: OnceLock<Arc<[u8]>>,
}

impl InMemoryBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_staged(&self) -> bool {
        self.buffer.get().is_some()
    }
}

impl BroadcastChannel for InMemoryBroadcast {
    fn stage(&self, buffer: Vec<u8>) -> GenResult<()> {
        self.buffer
            .set(buffer.into())
            .map_err(|_| GenError::Config("degree buffer already staged".to_string()))
    }

    fn fetch(&self) -> GenResult<Arc<[u8]>> {
        self.buffer
            .get()
            .cloned()
            .ok_or_else(|| GenError::BroadcastMissing("nothing staged in memory".to_string()))
    }
}

/// Broadcast through a file on a shared filesystem
///
/// Staging writes to a temporary sibling and renames it into place, so a
/// reader never observes a partially written buffer.
#[derive(Debug, Clone)]
pub struct FileBroadcast {
    path: PathBuf,
}

impl FileBroadcast {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `<dir>/degrees.dat`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEGREES_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BroadcastChannel for FileBroadcast {
    fn stage(&self, buffer: Vec<u8>) -> GenResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&buffer)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn fetch(&self) -> GenResult<Arc<[u8]>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes.into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(GenError::BroadcastMissing(
                format!("{} not found", self.path.display()),
            )),
            Err(e) => Err(GenError::Io(e)),
        }
    }
}
