//! Empty lines before `use` statements

use csu_core::TokenKind;

use crate::engine::{Expectation, ExpectationTable, PrecedingLinesChecker};
use crate::file::File;
use crate::sniffs::Sniff;
use crate::SniffError;

/// Ensures imports form one block below the namespace declaration
pub struct UseSpacingSniff {
    checker: PrecedingLinesChecker,
}

impl UseSpacingSniff {
    pub fn new() -> Self {
        let table = ExpectationTable::new()
            .with(TokenKind::OpenTag, Expectation::Exact(0))
            .with(TokenKind::Declare, Expectation::Exact(1))
            .with(TokenKind::Namespace, Expectation::Exact(1))
            .with(TokenKind::Use, Expectation::Exact(0))
            // closure imports
            .with(TokenKind::CloseParenthesis, Expectation::Exact(-1))
            // trait imports
            .with(TokenKind::OpenCurlyBracket, Expectation::Exact(0))
            .with(TokenKind::DocCommentCloseTag, Expectation::Exact(1))
            .with(TokenKind::Comment, Expectation::Range(0, 1));
        Self {
            checker: PrecedingLinesChecker::new(table),
        }
    }
}

impl Default for UseSpacingSniff {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniff for UseSpacingSniff {
    fn name(&self) -> &'static str {
        "RN.Spacing.Use"
    }

    fn description(&self) -> &'static str {
        "Empty lines before use statements"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Use]
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        self.checker.check(file, ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, codes, messages};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_import_block() {
        let sniff = UseSpacingSniff::new();
        let source = "<?php\nnamespace App;\n\nuse Foo\\Bar;\nuse Foo\\Baz;\n";
        assert!(codes(&sniff, source).is_empty());

        let cramped = "<?php\nnamespace App;\nuse Foo\\Bar;\n\nuse Foo\\Baz;\n";
        assert_eq!(
            messages(&sniff, cramped),
            vec![
                "Expected exactly 1 line between namespace declaration and use statement, got 0 instead",
                "Expected exactly 0 lines between use statement and use statement, got 1 instead",
            ]
        );
    }

    #[test]
    fn test_closure_and_trait_imports() {
        let sniff = UseSpacingSniff::new();
        let source = "<?php\nclass A {\n    use T;\n\n    function f() {\n        return function () use ($x) {};\n    }\n}\n";
        assert!(codes(&sniff, source).is_empty());
    }

    #[test]
    fn test_unknown_statement() {
        let sniff = UseSpacingSniff::new();
        let diagnostics = check(&sniff, "<?php\n$a = 1;\nuse Foo;\n");
        let codes: Vec<&str> = diagnostics.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["UnknownContext", "UnhandledContext"]);
        assert_eq!(diagnostics[0].message, "Unhandled preceding statement type");
    }
}
