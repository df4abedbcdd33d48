//! csu-core: Token-level building blocks for the csu sniffs
//!
//! This crate provides:
//! - `Token`/`TokenKind`: The PHP_CodeSniffer-shaped token model
//! - `tokenize()`: A reference tokenizer producing line-split tokens
//! - `TokenStream`: Structural linking plus the backward/forward query facade
//! - `Edit`/`EditGroup`: Byte-range fixes, applied atomically per group
//! - `Diagnostic`/`Report`: The per-file result sink

mod diagnostic;
mod edit;
pub mod lexer;
mod stream;
pub mod token;

pub use diagnostic::{Diagnostic, Report, Severity};
pub use edit::{apply_edit_groups, apply_edits, Edit, EditError, EditGroup};
pub use lexer::tokenize;
pub use stream::{Search, TokenStream};
pub use token::{Token, TokenKind};
