//! Empty lines before property declarations

use csu_core::{TokenKind, TokenStream};

use crate::engine::{ContextAwareChecker, Expectation, ExpectationTable};
use crate::file::File;
use crate::sniffs::Sniff;
use crate::utils::members::{is_member_var, member_properties, TYPE_KINDS};
use crate::SniffError;

/// Ensures properties are grouped by staticness
pub struct PropertySpacingSniff {
    checker: ContextAwareChecker,
}

impl PropertySpacingSniff {
    pub fn new() -> Self {
        let table = ExpectationTable::new()
            .with(TokenKind::OpenCurlyBracket, Expectation::Exact(0))
            .with(TokenKind::CloseCurlyBracket, Expectation::Range(1, 2))
            .with(TokenKind::Comma, Expectation::Range(-1, 0))
            .with(TokenKind::Variable, Expectation::Range(-1, 0))
            .with(TokenKind::Comment, Expectation::Range(0, 1))
            .with(TokenKind::Semicolon, Expectation::Range(0, 2));

        // Type declarations sit between the modifiers and the variable
        let mut ignored = vec![TokenKind::Static, TokenKind::Var, TokenKind::Readonly];
        ignored.extend(TYPE_KINDS.iter().copied().filter(|kind| *kind != TokenKind::Static));

        Self {
            checker: ContextAwareChecker::new(table, TokenKind::Variable, &ignored).after_hook(same_staticness),
        }
    }
}

impl Default for PropertySpacingSniff {
    fn default() -> Self {
        Self::new()
    }
}

fn same_staticness(stream: &TokenStream, current: usize, previous: usize) -> Option<Expectation> {
    let current = member_properties(stream, current)?;
    let previous = member_properties(stream, previous)?;
    Some(if current.is_static == previous.is_static {
        Expectation::Range(0, 1)
    } else {
        Expectation::Range(1, 2)
    })
}

impl Sniff for PropertySpacingSniff {
    fn name(&self) -> &'static str {
        "RN.Spacing.Property"
    }

    fn description(&self) -> &'static str {
        "Empty lines before property declarations"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Variable]
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        if !is_member_var(file.stream, ptr) {
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
    fn test_grouped_properties() {
        let sniff = PropertySpacingSniff::new();
        let source = "<?php
class A {
    public static $a;
    private static $b;

    public $c, $d;
    protected int $e;
    /** @var string */
    public ?string $f;
}
";
        assert!(codes(&sniff, source).is_empty());
    }

    #[test]
    fn test_static_and_instance_need_separation() {
        let sniff = PropertySpacingSniff::new();
        let source = "<?php\nclass A {\n    public static $a;\n    public $b;\n}\n";
        assert_eq!(
            messages(&sniff, source),
            vec!["Expected between 1 and 2 lines between semicolon and variable or property, got 0 instead"]
        );
    }

    #[test]
    fn test_too_many_lines_in_group() {
        let sniff = PropertySpacingSniff::new();
        let source = "<?php\nclass A {\n    public $a;\n\n\n    public $b;\n}\n";
        assert_eq!(codes(&sniff, source), vec!["PrecedingNewlines"]);
    }

    #[test]
    fn test_local_variables_are_ignored() {
        let sniff = PropertySpacingSniff::new();
        let source = "<?php\nclass A {\n    function f($x) {\n\n\n        $y = $x;\n    }\n}\n$z = 1;\n";
        assert!(codes(&sniff, source).is_empty());
    }
}
