//! Whitespace around function call arguments
//!
//! Calls on adjacent lines whose arguments form a column grid may pad their
//! arguments to keep the grid, as long as the last argument is not padded
//! on the right.

use std::ops::Range;

use csu_core::{Edit, Token, TokenKind, TokenStream};

use crate::engine::alignment::numerically_aligned;
use crate::file::File;
use crate::sniffs::Sniff;
use crate::utils::calls::{argument_ranges, first_code_token, last_callee_token};
use crate::SniffError;

/// Corresponding arguments that must line up for two calls to form a grid
const MIN_ALIGNED_ARGUMENTS: usize = 2;

/// Ensures function call arguments are not padded with whitespace
pub struct FunctionCallParametersSniff;

impl Sniff for FunctionCallParametersSniff {
    fn name(&self) -> &'static str {
        "RN.Spacing.FunctionCallParameters"
    }

    fn description(&self) -> &'static str {
        "No whitespace around function call arguments"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::OpenParenthesis]
    }

    fn process(&self, file: &mut File<'_>, opener: usize) -> Result<(), SniffError> {
        let stream = file.stream;
        let Some(callee) = last_callee_token(stream, opener) else {
            return Ok(());
        };
        if stream[opener].bracket.is_none() {
            file.add_warning(
                "Could not parse function call, closing parenthesis seems to be missing",
                opener,
                "Unhandled",
                vec![],
            );
            return Ok(());
        }

        let ranges = argument_ranges(stream, opener);
        let aligned = is_aligned_call(stream, callee, &ranges);
        let last = ranges.len().saturating_sub(1);

        for (index, range) in ranges.iter().enumerate() {
            if aligned && index != last {
                continue;
            }
            check_argument(file, range, aligned);
        }
        Ok(())
    }
}

fn check_argument(file: &mut File<'_>, range: &Range<usize>, only_trailing: bool) {
    let stream = file.stream;
    if range.is_empty() {
        return;
    }
    let first = range.start;
    let last = range.end - 1;
    let mut left_space = stream.kind(first) == TokenKind::Whitespace;

    if first == last {
        if left_space && !only_trailing {
            let edits = same_line_padding(stream, first).into_iter().collect();
            file.add_fixable_error(
                "Empty function call argument list shouldn't contain any whitespaces",
                first,
                "SpaceInstead",
                vec![],
                edits,
            );
        }
        return;
    }

    let mut left_fixable = left_space;
    if left_space && is_line_break(&stream[first]) && stream[first + 1].line > stream[first].line {
        // Argument on its own line: indentation is fine, blank lines are not
        left_fixable = false;
        let next_line = stream[first + 1].line;
        for i in first + 1..=last {
            if stream.kind(i) != TokenKind::Whitespace || (i < last && stream[i + 1].line > next_line) {
                left_space = stream.kind(i) == TokenKind::Whitespace;
                break;
            }
        }
    }
    if only_trailing {
        left_space = false;
    }
    let right_space = stream.kind(last) == TokenKind::Whitespace;

    let (message, code) = match (left_space, right_space) {
        (true, true) => ("Function call argument shouldn't be wrapped in whitespaces", "SpaceAround"),
        (true, false) => ("Function call argument shouldn't have whitespaces on left side", "SpaceBefore"),
        (false, true) => ("Function call argument shouldn't have whitespaces on right side", "SpaceAfter"),
        (false, false) => return,
    };

    let left = left_space.then(|| if left_fixable { same_line_padding(stream, first) } else { None });
    let right = right_space.then(|| same_line_padding(stream, last));
    let edits: Option<Vec<Edit>> = left.into_iter().chain(right).collect();

    let target = first_code_token(stream, range).unwrap_or(first);
    match edits {
        Some(edits) => file.add_fixable_error(message, target, code, vec![], edits),
        None => file.add_error(message, target, code, vec![]),
    }
}

fn is_line_break(token: &Token) -> bool {
    token.text == "\n" || token.text == "\r\n"
}

/// Removal of whitespace that neither starts nor ends a line
fn same_line_padding(stream: &TokenStream, ptr: usize) -> Option<Edit> {
    let token = &stream[ptr];
    let before = stream.get(ptr.checked_sub(1)?)?;
    if token.ends_line() || before.line != token.line {
        return None;
    }
    Some(Edit::delete(token.offset, token.end_offset()))
}

/// Whether a call on an adjacent line forms an argument grid with this one
fn is_aligned_call(stream: &TokenStream, callee: usize, ranges: &[Range<usize>]) -> bool {
    let line = stream[callee].line;
    [line.checked_sub(1), Some(line + 1)]
        .into_iter()
        .flatten()
        .filter_map(|other_line| neighbour_arguments(stream, callee, other_line))
        .any(|other| aligned_arguments(stream, ranges, &other) >= MIN_ALIGNED_ARGUMENTS)
}

/// Argument ranges of the call on `line` whose callee starts at the column of `callee`
fn neighbour_arguments(stream: &TokenStream, callee: usize, line: usize) -> Option<Vec<Range<usize>>> {
    let other = stream.token_at(line, stream[callee].column, Some(&[stream.kind(callee)]))?;
    let opener = stream.next_non_empty(other)?;
    if last_callee_token(stream, opener) != Some(other) || stream[opener].bracket.is_none() {
        return None;
    }
    Some(argument_ranges(stream, opener))
}

fn aligned_arguments(stream: &TokenStream, ours: &[Range<usize>], theirs: &[Range<usize>]) -> usize {
    ours.iter()
        .zip(theirs)
        .filter_map(|(a, b)| Some((first_code_token(stream, a)?, first_code_token(stream, b)?)))
        .filter(|&(a, b)| stream[a].column == stream[b].column || numerically_aligned(stream, a, b))
        .count()
}
