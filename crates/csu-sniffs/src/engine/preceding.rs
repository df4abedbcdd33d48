//! Empty lines before declarations and statements

use csu_core::{Search, TokenKind, TokenStream};
use tracing::debug;

use crate::context::{effective_start, skip_set, skip_single_line_code_comment};
use crate::engine::expectation::{AfterHook, BeforeHook, Expectation, ExpectationTable};
use crate::file::File;
use crate::SniffError;

/// Fallback when a `;` has no earlier declaration of the same kind
const FIRST_OF_KIND: Expectation = Expectation::Range(1, 2);
/// Fallback between two declarations of the same kind
const SAME_KIND: Expectation = Expectation::Range(0, 1);

/// Checks blank lines before a declaration, taking attached comments,
/// modifiers and the previous declaration of the same kind into account
#[derive(Debug, Clone)]
pub struct ContextAwareChecker {
    table: ExpectationTable,
    expected: TokenKind,
    ignored: Vec<TokenKind>,
    before: Option<BeforeHook>,
    after: Option<AfterHook>,
}

impl ContextAwareChecker {
    pub fn new(table: ExpectationTable, expected: TokenKind, ignored: &[TokenKind]) -> Self {
        Self {
            table,
            expected,
            ignored: ignored.to_vec(),
            before: None,
            after: None,
        }
    }

    pub fn before_hook(mut self, hook: BeforeHook) -> Self {
        self.before = Some(hook);
        self
    }

    pub fn after_hook(mut self, hook: AfterHook) -> Self {
        self.after = Some(hook);
        self
    }

    pub fn check(&self, file: &mut File<'_>, target: usize) -> Result<(), SniffError> {
        let stream = file.stream;
        let effective = effective_start(stream, target, &self.ignored)?;
        let Some(mut prev) = stream.previous_non_whitespace(effective) else {
            return Ok(());
        };

        if stream[prev].line + 1 >= stream[target].line {
            prev = self.skip_previous(stream, prev);
        }
        prev = skip_single_line_code_comment(stream, prev);

        if !self.table.contains(stream.kind(prev)) {
            report_unhandled(file, prev);
            return Ok(());
        }

        let expectation = self.expectation(stream, target, effective, prev);
        debug!(target, effective, prev, ?expectation, "checking preceding lines");
        report_mismatch(file, expectation, effective, prev, target);
        Ok(())
    }

    fn skip_previous(&self, stream: &TokenStream, start: usize) -> usize {
        if matches!(
            stream.kind(start),
            TokenKind::OpenCurlyBracket | TokenKind::CloseCurlyBracket | TokenKind::Semicolon
        ) {
            return start;
        }
        let skipped = skip_set(&self.ignored);
        start
            .checked_sub(1)
            .and_then(|from| stream.find_previous(&skipped, from, Search::excluding().local()))
            .unwrap_or(start)
    }

    fn expectation(&self, stream: &TokenStream, target: usize, effective: usize, prev: usize) -> Expectation {
        if let Some(expectation) = self.before.and_then(|hook| hook(stream, effective, prev)) {
            return expectation;
        }

        if stream.kind(prev) != TokenKind::Semicolon {
            return self.table.lookup(stream.kind(prev)).unwrap_or(FIRST_OF_KIND);
        }

        let Some(earlier) = prev
            .checked_sub(1)
            .and_then(|from| stream.find_previous(&[self.expected], from, Search::new().local()))
        else {
            return FIRST_OF_KIND;
        };

        self.after
            .and_then(|hook| hook(stream, target, earlier))
            .unwrap_or(SAME_KIND)
    }
}

/// Checks blank lines before a statement, resolving a preceding `;` to the
/// keyword that opened that statement
#[derive(Debug, Clone)]
pub struct PrecedingLinesChecker {
    table: ExpectationTable,
}

impl PrecedingLinesChecker {
    pub fn new(table: ExpectationTable) -> Self {
        Self { table }
    }

    pub fn check(&self, file: &mut File<'_>, target: usize) -> Result<(), SniffError> {
        let stream = file.stream;
        let Some(mut prev) = stream.previous_non_whitespace(target) else {
            return Ok(());
        };

        if !self.table.is_wildcard() {
            prev = skip_single_line_code_comment(stream, prev);
            if stream.kind(prev) == TokenKind::Semicolon {
                prev = statement_opener(file, prev);
            }
        }

        let Some(expectation) = self.table.lookup(stream.kind(prev)) else {
            report_unhandled(file, prev);
            return Ok(());
        };

        debug!(target, prev, ?expectation, "checking preceding lines");
        report_mismatch(file, expectation, target, prev, target);
        Ok(())
    }
}

/// Keyword that opened the statement ended by `semicolon`
fn statement_opener(file: &mut File<'_>, semicolon: usize) -> usize {
    let stream = file.stream;
    let opener = semicolon.checked_sub(1).and_then(|from| {
        stream.find_previous_by(from, Search::new().local(), |kind| kind.is_scope_opener())
    });
    match opener {
        Some(opener) => opener,
        None => {
            file.add_warning("Unhandled preceding statement type", semicolon, "UnknownContext", vec![]);
            semicolon
        }
    }
}

fn report_unhandled(file: &mut File<'_>, prev: usize) {
    let type_name = file.stream.kind(prev).type_name();
    file.add_warning(
        format!("Unhandled preceding token type \"{type_name}\""),
        prev,
        "UnhandledContext",
        vec![type_name.to_string()],
    );
}

fn report_mismatch(file: &mut File<'_>, expectation: Expectation, effective: usize, prev: usize, target: usize) {
    let stream = file.stream;
    let lines = stream[effective].line as i32 - stream[prev].line as i32 - 1;
    if expectation.accepts(lines) {
        return;
    }

    let expected = expectation.describe();
    let prev_name = stream.kind(prev).printable_name();
    let target_name = stream.kind(target).printable_name();
    file.add_error(
        format!("Expected {expected} between {prev_name} and {target_name}, got {lines} instead"),
        target,
        "PrecedingNewlines",
        vec![expected, prev_name.to_string(), target_name.to_string(), lines.to_string()],
    );
}
