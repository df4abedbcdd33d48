//! Guessing the PHP version a file requires from the language features it uses
//!
//! Each version tier is a static table of feature probes. Tiers are checked
//! newest first; the first tier with a used feature is the file's version.

mod php70;
mod php71;
mod php72;

use std::cmp::Ordering;
use std::sync::OnceLock;

use csu_core::{Search, TokenKind, TokenStream};
use regex::Regex;
use tracing::debug;

/// Version reported when no probe matches
pub const BASELINE_VERSION: &str = "5.6";

/// Detector of one language feature
pub type Probe = fn(&TokenStream) -> bool;

/// The feature probes of one PHP version
pub struct VersionTier {
    pub version: &'static str,
    pub probes: &'static [(&'static str, Probe)],
}

impl VersionTier {
    /// Name of the first feature of this tier the file uses
    pub fn used_feature(&self, stream: &TokenStream) -> Option<&'static str> {
        self.probes.iter().find(|(_, probe)| probe(stream)).map(|(name, _)| *name)
    }
}

/// Checked tiers, newest first
pub static TIERS: &[&VersionTier] = &[&php72::TIER, &php71::TIER, &php70::TIER];

/// Versions with feature probes, newest first
pub fn checked_versions() -> Vec<&'static str> {
    TIERS.iter().map(|tier| tier.version).collect()
}

/// The PHP version `stream` seems to require
pub fn detect_version(stream: &TokenStream) -> &'static str {
    for tier in TIERS {
        if let Some(feature) = tier.used_feature(stream) {
            debug!(version = tier.version, feature, "detected PHP feature version");
            return tier.version;
        }
    }
    BASELINE_VERSION
}

/// Whether `version` is an acceptable version string
pub fn is_valid_version(version: &str) -> bool {
    static VERSION_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    VERSION_REGEX
        .get_or_init(|| Regex::new(r"(?i)^[1-9][0-9a-z._-]*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(version))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Number(u64),
    Special(i8),
}

/// Rank of plain numbers among the special forms
const NUMBER_RANK: i8 = 4;

impl Part {
    fn special(word: &str) -> Part {
        let rank = match word.to_lowercase().as_str() {
            "dev" => 0,
            "alpha" | "a" => 1,
            "beta" | "b" => 2,
            "rc" => 3,
            "#" => NUMBER_RANK,
            "pl" | "p" => 5,
            _ => -1,
        };
        Part::Special(rank)
    }

    fn rank(&self) -> i8 {
        match self {
            Part::Number(_) => NUMBER_RANK,
            Part::Special(rank) => *rank,
        }
    }

    fn compare(&self, other: &Part) -> Ordering {
        match (self, other) {
            (Part::Number(a), Part::Number(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Split into numeric and word parts: `7.1.0RC1` is `7 . 1 . 0 . RC . 1`
fn version_parts(version: &str) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let flush = |current: &mut String, parts: &mut Vec<Part>| {
        if current.is_empty() {
            return;
        }
        let part = match current.parse::<u64>() {
            Ok(number) => Part::Number(number),
            Err(_) => Part::special(current),
        };
        parts.push(part);
        current.clear();
    };

    for c in version.chars() {
        if matches!(c, '.' | '-' | '_' | '+') {
            flush(&mut current, &mut parts);
            continue;
        }
        let switches_class = current
            .chars()
            .last()
            .is_some_and(|last| last.is_ascii_digit() != c.is_ascii_digit());
        if switches_class {
            flush(&mut current, &mut parts);
        }
        current.push(c);
    }
    flush(&mut current, &mut parts);
    parts
}

/// Compare version strings: numeric parts numerically, `dev < alpha < beta < RC < release < pl`
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = version_parts(a);
    let right = version_parts(b);

    for (l, r) in left.iter().zip(&right) {
        match l.compare(r) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }

    // A trailing number makes a version newer, a trailing pre-release older
    match left.len().cmp(&right.len()) {
        Ordering::Greater => trailing_order(&left[right.len()]),
        Ordering::Less => trailing_order(&right[left.len()]).reverse(),
        Ordering::Equal => Ordering::Equal,
    }
}

fn trailing_order(part: &Part) -> Ordering {
    match part {
        Part::Number(_) => Ordering::Greater,
        Part::Special(rank) => rank.cmp(&NUMBER_RANK),
    }
}

/// Positions of all tokens of the given kinds
fn positions<'a>(stream: &'a TokenStream, kinds: &'a [TokenKind]) -> impl Iterator<Item = usize> + 'a {
    stream
        .tokens()
        .iter()
        .enumerate()
        .filter(move |(_, token)| kinds.contains(&token.kind))
        .map(|(index, _)| index)
}

fn contains_kind(stream: &TokenStream, kind: TokenKind) -> bool {
    stream.tokens().iter().any(|token| token.kind == kind)
}

/// The parenthesis pair owned by `owner`
fn owned_parentheses(stream: &TokenStream, owner: usize) -> Option<(usize, usize)> {
    let opener = stream.find_next(&[TokenKind::OpenParenthesis], owner + 1, Search::new())?;
    if stream[opener].parenthesis_owner != Some(owner) {
        return None;
    }
    Some((opener, stream[opener].bracket?))
}

/// Whether `ptr` is the first code token of its statement
fn starts_statement(stream: &TokenStream, ptr: usize) -> bool {
    match stream.previous_non_empty(ptr) {
        None => true,
        Some(prev) => matches!(
            stream.kind(prev),
            TokenKind::Semicolon
                | TokenKind::OpenCurlyBracket
                | TokenKind::CloseCurlyBracket
                | TokenKind::OpenTag
                | TokenKind::Colon
        ),
    }
}

/// Whether the `[` at `ptr` opens an array literal rather than an offset access
fn is_short_array(stream: &TokenStream, ptr: usize) -> bool {
    if stream.kind(ptr) != TokenKind::OpenSquareBracket {
        return false;
    }
    match stream.previous_non_empty(ptr) {
        None => true,
        Some(prev) => !matches!(
            stream.kind(prev),
            TokenKind::Variable
                | TokenKind::Identifier
                | TokenKind::ConstantEncapsedString
                | TokenKind::CloseSquareBracket
                | TokenKind::CloseParenthesis
                | TokenKind::CloseCurlyBracket
        ),
    }
}

/// Whether a short array literal or `array(` occurs in `start..end`
fn has_array_literal(stream: &TokenStream, start: usize, end: usize) -> bool {
    (start..end).any(|i| stream.kind(i) == TokenKind::Array || is_short_array(stream, i))
}
