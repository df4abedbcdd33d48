//! Expected blank-line counts and the tables that map preceding tokens to them

use csu_core::{TokenKind, TokenStream};

/// Number of empty lines allowed between two tokens
///
/// Counts are signed: `-1` means both tokens share a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Exact(i32),
    /// Inclusive bounds
    Range(i32, i32),
}

impl Expectation {
    pub fn accepts(&self, lines: i32) -> bool {
        match *self {
            Expectation::Exact(expected) => lines == expected,
            Expectation::Range(min, max) => (min..=max).contains(&lines),
        }
    }

    /// Message fragment, e.g. `exactly 1 line` or `between 0 and 2 lines`
    pub fn describe(&self) -> String {
        match *self {
            Expectation::Exact(expected) => {
                let unit = if expected == 1 { "line" } else { "lines" };
                format!("exactly {expected} {unit}")
            }
            Expectation::Range(min, max) => format!("between {min} and {max} lines"),
        }
    }
}

/// Overrides the table lookup given the effective start and the preceding token
pub type BeforeHook = fn(&TokenStream, usize, usize) -> Option<Expectation>;

/// Overrides the same-kind fallback given the target and the earlier entry
pub type AfterHook = fn(&TokenStream, usize, usize) -> Option<Expectation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preceding {
    Kind(TokenKind),
    Any,
}

/// Maps the kind of the preceding token to the expected blank-line count
#[derive(Debug, Clone, Default)]
pub struct ExpectationTable {
    entries: Vec<(Preceding, Expectation)>,
}

impl ExpectationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: TokenKind, expectation: Expectation) -> Self {
        self.entries.push((Preceding::Kind(kind), expectation));
        self
    }

    /// Entry used for any kind without its own entry
    pub fn with_any(mut self, expectation: Expectation) -> Self {
        self.entries.push((Preceding::Any, expectation));
        self
    }

    pub fn lookup(&self, kind: TokenKind) -> Option<Expectation> {
        self.entries
            .iter()
            .find(|(preceding, _)| *preceding == Preceding::Kind(kind))
            .or_else(|| self.entries.iter().find(|(preceding, _)| *preceding == Preceding::Any))
            .map(|&(_, expectation)| expectation)
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        self.lookup(kind).is_some()
    }

    /// Whether the table only holds the `Any` wildcard
    pub fn is_wildcard(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|(preceding, _)| *preceding == Preceding::Any)
    }
}
