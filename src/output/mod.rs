//! Output formatting
//!
//! - [`text`]: part file edge writer and console reports
//! - [`merge`]: concatenation of part files into the final edge list
//! - [`json`]: machine-readable run summary

pub mod json;
pub mod merge;
pub mod text;

pub use merge::merge_part_files;
pub use text::TextEdgeWriter;
