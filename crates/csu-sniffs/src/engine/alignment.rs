//! Vertical alignment grids
//!
//! A grid is a column of same-kind tokens on consecutive lines. Padding that
//! only serves such a grid is tolerated by the spacing sniffs.

use csu_core::{TokenKind, TokenStream};
use tracing::debug;

/// Tokens aligned with a pivot token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentGroup {
    /// Aligned tokens in line order, pivot included
    pub rows: Vec<usize>,
    /// Some row has no whitespace before it
    pub anchored: bool,
    /// Padding every row can lose while the grid stays intact
    pub min_trim: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

/// Rows of the pivot's kind starting at its column on adjacent lines
pub fn find_vertical_alignment(stream: &TokenStream, pivot: usize) -> Option<AlignmentGroup> {
    let above = scan(stream, pivot, Direction::Up);
    let below = scan(stream, pivot, Direction::Down);
    if above.is_empty() && below.is_empty() {
        return None;
    }

    let rows: Vec<usize> = above
        .into_iter()
        .rev()
        .chain(std::iter::once(pivot))
        .chain(below)
        .collect();

    let anchored = rows.iter().any(|&row| !has_whitespace_before(stream, row));
    let min_trim = if anchored {
        None
    } else {
        rows.iter().filter_map(|&row| same_line_padding(stream, row)).min()
    };

    debug!(pivot, rows = rows.len(), anchored, ?min_trim, "found alignment group");
    Some(AlignmentGroup {
        rows,
        anchored,
        min_trim,
    })
}

fn scan(stream: &TokenStream, pivot: usize, direction: Direction) -> Vec<usize> {
    let token = &stream[pivot];
    let kinds = [token.kind];
    let mut rows = Vec::new();
    let mut line = token.line;

    loop {
        line = match direction {
            Direction::Up if line > 1 => line - 1,
            Direction::Down if line < stream.last_line() => line + 1,
            _ => break,
        };
        match stream.token_at(line, token.column, Some(&kinds)) {
            Some(row) => rows.push(row),
            None => break,
        }
    }
    rows
}

fn has_whitespace_before(stream: &TokenStream, ptr: usize) -> bool {
    ptr > 0 && stream.kind(ptr - 1) == TokenKind::Whitespace
}

/// Width of the whitespace between `ptr` and code earlier on its line
pub fn same_line_padding(stream: &TokenStream, ptr: usize) -> Option<usize> {
    let padding = ptr.checked_sub(1)?;
    let code = padding.checked_sub(1)?;
    let line = stream[ptr].line;
    let is_padding = stream.kind(padding) == TokenKind::Whitespace
        && stream[padding].line == line
        && stream[code].line == line
        && stream.kind(code) != TokenKind::Whitespace;
    is_padding.then(|| stream[padding].width())
}

/// Column of the decimal point of a number, or of its virtual point after the last digit
pub fn decimal_point_column(stream: &TokenStream, ptr: usize) -> Option<usize> {
    let token = &stream[ptr];
    if !matches!(token.kind, TokenKind::LNumber | TokenKind::DNumber) {
        return None;
    }
    let offset = token.text.find('.').unwrap_or(token.text.len());
    Some(token.column + offset)
}

/// Whether two numbers line up by their last digit or their decimal point
pub fn numerically_aligned(stream: &TokenStream, a: usize, b: usize) -> bool {
    let (Some(point_a), Some(point_b)) = (decimal_point_column(stream, a), decimal_point_column(stream, b)) else {
        return false;
    };
    let end = |ptr: usize| stream[ptr].column + stream[ptr].width();
    point_a == point_b || end(a) == end(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equals(stream: &TokenStream) -> Vec<usize> {
        stream
            .tokens()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == TokenKind::Equal)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_no_neighbours_no_group() {
        let stream = TokenStream::from_source("<?php\n$a = 1;\n$bb = 2;\n");
        assert_eq!(find_vertical_alignment(&stream, equals(&stream)[0]), None);
    }

    #[test]
    fn test_anchored_group() {
        let stream = TokenStream::from_source("<?php\n$aaa=1;\n$b  =2;\n$c   = 3;\n");
        let rows = equals(&stream);
        let group = find_vertical_alignment(&stream, rows[1]).unwrap();
        assert_eq!(group.rows, vec![rows[0], rows[1]]);
        assert!(group.anchored);
        assert_eq!(group.min_trim, None);
    }

    #[test]
    fn test_padded_group_trim() {
        let stream = TokenStream::from_source("<?php\n$aaa  = 1;\n$b    = 2;\n");
        let rows = equals(&stream);
        let group = find_vertical_alignment(&stream, rows[0]).unwrap();
        assert_eq!(group.rows, rows);
        assert!(!group.anchored);
        assert_eq!(group.min_trim, Some(2));
    }

    #[test]
    fn test_continuation_rows_do_not_count_for_trim() {
        let stream = TokenStream::from_source("<?php\n$aaa  = 1;\n      = 2;\n");
        let rows = equals(&stream);
        let group = find_vertical_alignment(&stream, rows[0]).unwrap();
        assert_eq!(group.rows.len(), 2);
        assert_eq!(group.min_trim, Some(2));
        assert_eq!(same_line_padding(&stream, rows[1]), None);
    }

    #[test]
    fn test_numeric_alignment() {
        let stream = TokenStream::from_source("<?php\nf( 1.5, 100);\nf(12.25, 3);\n");
        let numbers: Vec<usize> = stream
            .tokens()
            .iter()
            .enumerate()
            .filter(|(_, t)| matches!(t.kind, TokenKind::LNumber | TokenKind::DNumber))
            .map(|(i, _)| i)
            .collect();
        assert!(numerically_aligned(&stream, numbers[0], numbers[2]));
        assert!(!numerically_aligned(&stream, numbers[1], numbers[3]));
    }
}
