use csu_core::TokenKind;

use crate::engine::{Expectation, ExpectationTable, PrecedingLinesChecker};
use crate::file::File;
use crate::sniffs::Sniff;
use crate::SniffError;

/// Ensures namespace declarations follow the file header directly
pub struct NamespaceSpacingSniff {
    checker: PrecedingLinesChecker,
}

impl NamespaceSpacingSniff {
    pub fn new() -> Self {
        let table = ExpectationTable::new()
            .with(TokenKind::OpenTag, Expectation::Exact(0))
            .with(TokenKind::Declare, Expectation::Exact(0))
            .with(TokenKind::DocCommentCloseTag, Expectation::Exact(1))
            .with(TokenKind::Comment, Expectation::Range(0, 1));
        Self {
            checker: PrecedingLinesChecker::new(table),
        }
    }
}

impl Default for NamespaceSpacingSniff {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniff for NamespaceSpacingSniff {
    fn name(&self) -> &'static str {
        "RN.Spacing.Namespace"
    }

    fn description(&self) -> &'static str {
        "Empty lines before namespace declarations"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Namespace]
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        // `namespace\foo()` is a relative name, not a declaration
        let is_relative_name = file
            .stream
            .get(ptr + 1)
            .is_some_and(|next| next.kind == TokenKind::NsSeparator);
        if is_relative_name {
            return Ok(());
        }
        self.checker.check(file, ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{codes, messages};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_after_declare() {
        let sniff = NamespaceSpacingSniff::new();
        assert!(codes(&sniff, "<?php\ndeclare(strict_types=1);\nnamespace App;\n").is_empty());
        assert_eq!(
            messages(&sniff, "<?php\ndeclare(strict_types=1);\n\nnamespace App;\n"),
            vec!["Expected exactly 0 lines between declare statement and namespace declaration, got 1 instead"]
        );
    }

    #[test]
    fn test_after_file_docblock() {
        let sniff = NamespaceSpacingSniff::new();
        assert!(codes(&sniff, "<?php\n/**\n * File\n */\n\nnamespace App;\n").is_empty());
        assert_eq!(codes(&sniff, "<?php\n/** File */\nnamespace App;\n"), vec!["PrecedingNewlines"]);
    }

    #[test]
    fn test_trailing_comment_resolves_to_code() {
        let sniff = NamespaceSpacingSniff::new();
        assert!(codes(&sniff, "<?php\ndeclare(strict_types=1); // strict\nnamespace App;\n").is_empty());
    }
}
