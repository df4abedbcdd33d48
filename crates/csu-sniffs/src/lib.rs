//! csu-sniffs: Coding standard sniffs over PHP token streams
//!
//! This crate provides:
//! - `Sniff`: The trait every check implements
//! - `SniffRegistry`: Configured sniffs and per-file dispatch
//! - Engines for preceding empty lines, member ordering and vertical alignment
//! - `RunContext`: Per-run state such as annotation config and detected versions
//!
//! # Example
//!
//! ```
//! use csu_sniffs::{RunContext, SniffRegistry};
//!
//! let registry = SniffRegistry::new();
//! let mut run = RunContext::default();
//! let report = registry.check_source("a.php", "<?php\n$a = null;\n", &mut run).unwrap();
//! assert_eq!(report.error_count(), 2);
//! ```

pub mod config;
pub mod context;
pub mod engine;
mod error;
pub mod file;
pub mod registry;
pub mod sniffs;
pub mod utils;
pub mod version;

#[cfg(test)]
mod testing;

pub use config::{RunContext, RunOptions, SniffProperties};
pub use error::SniffError;
pub use file::File;
pub use registry::{SniffInfo, SniffRegistry};
pub use sniffs::Sniff;
