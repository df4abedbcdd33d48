//! Empty lines before function declarations

use csu_core::{TokenKind, TokenStream};

use crate::engine::{ContextAwareChecker, Expectation, ExpectationTable};
use crate::file::File;
use crate::sniffs::Sniff;
use crate::utils::members::method_properties;
use crate::SniffError;

/// Ensures functions are separated from preceding code
pub struct FunctionSpacingSniff {
    checker: ContextAwareChecker,
}

impl FunctionSpacingSniff {
    pub fn new() -> Self {
        let table = ExpectationTable::new()
            .with(TokenKind::OpenCurlyBracket, Expectation::Exact(0))
            .with(TokenKind::CloseCurlyBracket, Expectation::Range(1, 2))
            .with(TokenKind::Semicolon, Expectation::Range(0, 2));
        let checker = ContextAwareChecker::new(
            table,
            TokenKind::Function,
            &[TokenKind::Abstract, TokenKind::Static, TokenKind::Final],
        )
        .after_hook(same_kind_of_declaration);
        Self { checker }
    }
}

impl Default for FunctionSpacingSniff {
    fn default() -> Self {
        Self::new()
    }
}

/// Bodiless declarations of the same kind may be grouped
fn same_kind_of_declaration(stream: &TokenStream, current: usize, previous: usize) -> Option<Expectation> {
    let current = method_properties(stream, current)?;
    let previous = method_properties(stream, previous)?;
    Some(
        if current.is_abstract == previous.is_abstract && current.is_static == previous.is_static {
            Expectation::Range(0, 2)
        } else {
            Expectation::Range(1, 2)
        },
    )
}

impl Sniff for FunctionSpacingSniff {
    fn name(&self) -> &'static str {
        "RN.Spacing.Function"
    }

    fn description(&self) -> &'static str {
        "Empty lines before function declarations"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Function]
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        self.checker.check(file, ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{codes, messages};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_methods() {
        let sniff = FunctionSpacingSniff::new();
        let source = "<?php
class A {
    public function a() {
    }

    /**
     * Doc
     */
    public static function b() {
    }
}
";
        assert!(codes(&sniff, source).is_empty());

        let cramped = "<?php\nclass A {\n    function a() {}\n    function b() {}\n}\n";
        assert_eq!(
            messages(&sniff, cramped),
            vec!["Expected between 1 and 2 lines between closing curly bracket \"}\" and function, got 0 instead"]
        );
    }

    #[test]
    fn test_abstract_declarations_group() {
        let sniff = FunctionSpacingSniff::new();
        let source = "<?php
abstract class A {
    abstract public function a();
    abstract public function b();

    public static function c() {}
}
";
        assert!(codes(&sniff, source).is_empty());

        let mixed = "<?php\ninterface I {\n    public function a();\n    public static function b();\n}\n";
        assert_eq!(codes(&sniff, mixed), vec!["PrecedingNewlines"]);
    }

    #[test]
    fn test_first_method_in_body() {
        let sniff = FunctionSpacingSniff::new();
        assert_eq!(
            messages(&sniff, "<?php\nclass A {\n\n    function a() {}\n}\n"),
            vec!["Expected exactly 0 lines between opening curly bracket \"{\" and function, got 1 instead"]
        );
    }
}
