//! Whitespace around assignment operators
//!
//! `$a=1;` is the expected form. Padding before the operator is accepted
//! when it lines the operator up with the operators of neighbouring lines and
//! at least one of them is unpadded, so the grid has an anchor.

use csu_core::{Edit, TokenKind, TokenStream};

use crate::engine::{find_vertical_alignment, AlignmentGroup};
use crate::file::File;
use crate::sniffs::Sniff;
use crate::SniffError;

const ASSIGNMENTS: &[TokenKind] = &[
    TokenKind::Equal,
    TokenKind::PlusEqual,
    TokenKind::MinusEqual,
    TokenKind::MulEqual,
    TokenKind::DivEqual,
    TokenKind::ConcatEqual,
    TokenKind::ModEqual,
    TokenKind::PowEqual,
    TokenKind::AndEqual,
    TokenKind::OrEqual,
    TokenKind::XorEqual,
    TokenKind::SlEqual,
    TokenKind::SrEqual,
    TokenKind::CoalesceEqual,
    TokenKind::DoubleArrow,
];

/// Disallows whitespace around assignment operators beyond vertical alignment
pub struct AssignmentOperatorsSniff;

impl Sniff for AssignmentOperatorsSniff {
    fn name(&self) -> &'static str {
        "RN.Spacing.AssignmentOperators"
    }

    fn description(&self) -> &'static str {
        "No whitespace around assignment operators"
    }

    fn register(&self) -> &'static [TokenKind] {
        ASSIGNMENTS
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        let stream = file.stream;
        let group = find_vertical_alignment(stream, ptr);
        let anchored = group.as_ref().is_some_and(|g| g.anchored);

        let space_before = !anchored && ptr > 0 && stream.kind(ptr - 1) == TokenKind::Whitespace;
        let space_after = stream.get(ptr + 1).is_some_and(|t| t.kind == TokenKind::Whitespace);

        let (code, side) = match (space_before, space_after) {
            (true, true) => ("SpaceAround", "around"),
            (true, false) => ("SpaceBefore", "before"),
            (false, true) => ("SpaceAfter", "after"),
            (false, false) => return Ok(()),
        };
        let suffix = if space_before && group.is_some() {
            " beyond vertical alignment"
        } else {
            ""
        };
        let message = format!("There must not be any spaces or newlines {side} assignment operators{suffix}");

        let before = space_before.then(|| trim_before(stream, ptr, group.as_ref()));
        let after = space_after.then(|| trim_after(stream, ptr));
        let edits: Option<Vec<Edit>> = before.into_iter().chain(after).collect();

        match edits {
            Some(edits) => file.add_fixable_error(message, ptr, code, vec![side.to_string()], edits),
            None => file.add_error(message, ptr, code, vec![side.to_string()]),
        }
        Ok(())
    }
}

/// Removal of the padding before the operator, if it is on the operator's line
fn trim_before(stream: &TokenStream, ptr: usize, group: Option<&AlignmentGroup>) -> Option<Edit> {
    let padding = &stream[ptr - 1];
    let code = stream.get(ptr.checked_sub(2)?)?;
    if padding.line != stream[ptr].line || code.line != padding.line {
        return None;
    }
    let width = match group {
        Some(group) => group.min_trim?.min(padding.text.len()),
        None => padding.text.len(),
    };
    Some(Edit::delete(padding.end_offset() - width, padding.end_offset()))
}

/// Removal of the whitespace after the operator, unless it breaks the line
fn trim_after(stream: &TokenStream, ptr: usize) -> Option<Edit> {
    let padding = &stream[ptr + 1];
    if padding.ends_line() {
        return None;
    }
    Some(Edit::delete(padding.offset, padding.end_offset()))
}
