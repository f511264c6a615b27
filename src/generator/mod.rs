//! Edge assignment
//!
//! Two paths turn a degree vector into edges:
//!
//! - **Exact** ([`global`]): each node's full degree is summed through the
//!   [`aggregate`] step and emitted with targets wrapping over the whole id
//!   space. Out-degree per source is exact.
//! - **Approximate** ([`saturation`] then [`local`]): each worker first cancels
//!   credit between nodes of its own block, then emits the residual degree
//!   with targets confined to the block. No worker ever needs another block.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod aggregate;
pub mod global;
pub mod local;
pub mod saturation;

pub use aggregate::{sum_credits, CreditTable, DegreeCredit};
pub use global::{generate_global, GlobalForwardEdges};
pub use local::{generate_local, LocalForwardEdges};
pub use saturation::{saturate, saturate_block, Saturation};

/// Which edge assignment algorithm to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorMode {
    /// Global wraparound, exact out-degree
    #[default]
    Exact,
    /// Block-local saturation and wraparound
    Approximate,
}

impl fmt::Display for GeneratorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorMode::Exact => write!(f, "exact"),
            GeneratorMode::Approximate => write!(f, "approximate"),
        }
    }
}

/// Edge emission direction for the approximate path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    /// Only `(source, target)`
    #[default]
    Forward,
    /// `(source, target)` followed by `(target, source)`
    Symmetric,
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeDirection::Forward => write!(f, "forward"),
            EdgeDirection::Symmetric => write!(f, "symmetric"),
        }
    }
}
