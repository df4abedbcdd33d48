//! Sniff implementations
//!
//! This module contains the individual sniffs. Each sniff registers the token
//! kinds it wants to see and is called once for every such token of a file.

pub mod analysis;
pub mod capitalization;
pub mod classes;
pub mod spacing;

use csu_core::TokenKind;

use crate::file::File;
use crate::SniffError;

/// A check run over the tokens of one file
pub trait Sniff: Send + Sync {
    /// Qualified name, e.g. `RN.Spacing.Property`
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Token kinds the sniff is dispatched on
    fn register(&self) -> &'static [TokenKind];

    /// Inspect the token at `ptr` and report into `file`
    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError>;
}
