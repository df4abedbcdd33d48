//! Empty lines before class declarations

use csu_core::{TokenKind, TokenStream};

use crate::engine::{ContextAwareChecker, Expectation, ExpectationTable};
use crate::file::File;
use crate::sniffs::Sniff;
use crate::SniffError;

/// Ensures class declarations are separated from preceding code
pub struct ClassSpacingSniff {
    checker: ContextAwareChecker,
}

impl ClassSpacingSniff {
    pub fn new() -> Self {
        let table = ExpectationTable::new()
            .with(TokenKind::CloseCurlyBracket, Expectation::Range(1, 2))
            .with(TokenKind::Semicolon, Expectation::Range(1, 2))
            .with(TokenKind::Comment, Expectation::Range(0, 2))
            .with(TokenKind::DocCommentCloseTag, Expectation::Exact(0))
            .with(TokenKind::OpenTag, Expectation::Range(0, 2));
        let checker = ContextAwareChecker::new(
            table,
            TokenKind::Class,
            &[TokenKind::Abstract, TokenKind::Final, TokenKind::Readonly],
        )
        .before_hook(docblock_after_docblock);
        Self { checker }
    }
}

impl Default for ClassSpacingSniff {
    fn default() -> Self {
        Self::new()
    }
}

/// A class docblock directly after the file docblock needs a separating line
fn docblock_after_docblock(stream: &TokenStream, effective: usize, prev: usize) -> Option<Expectation> {
    (stream.kind(effective) == TokenKind::DocCommentOpenTag && stream.kind(prev) == TokenKind::DocCommentCloseTag)
        .then_some(Expectation::Range(1, 2))
}

impl Sniff for ClassSpacingSniff {
    fn name(&self) -> &'static str {
        "RN.Spacing.Class"
    }

    fn description(&self) -> &'static str {
        "Empty lines before class declarations"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Class]
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        self.checker.check(file, ptr)
    }
}
