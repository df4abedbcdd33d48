//! Empty lines before constant declarations

use csu_core::TokenKind;

use crate::engine::{ContextAwareChecker, Expectation, ExpectationTable};
use crate::file::File;
use crate::sniffs::Sniff;
use crate::SniffError;

/// Ensures constants are grouped and separated from preceding code
pub struct ConstSpacingSniff {
    checker: ContextAwareChecker,
}

impl ConstSpacingSniff {
    pub fn new() -> Self {
        let table = ExpectationTable::new()
            .with(TokenKind::OpenCurlyBracket, Expectation::Exact(0))
            .with(TokenKind::OpenTag, Expectation::Range(0, 1))
            .with(TokenKind::CloseTag, Expectation::Range(0, 2))
            .with(TokenKind::Semicolon, Expectation::Range(0, 2));
        Self {
            checker: ContextAwareChecker::new(table, TokenKind::Const, &[TokenKind::Final]),
        }
    }
}

impl Default for ConstSpacingSniff {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniff for ConstSpacingSniff {
    fn name(&self) -> &'static str {
        "RN.Spacing.Const"
    }

    fn description(&self) -> &'static str {
        "Empty lines before constant declarations"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Const]
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        // `use const Foo\BAR;` imports a constant
        let is_import = file
            .stream
            .previous_non_empty(ptr)
            .is_some_and(|prev| file.stream.kind(prev) == TokenKind::Use);
        if is_import {
            return Ok(());
        }
        self.checker.check(file, ptr)
    }
}
