//! Function call detection and argument splitting

use std::ops::Range;

use csu_core::{TokenKind, TokenStream};

/// Last token of the callee when `opener` opens a call's argument list
///
/// Parameter lists of declarations and parentheses owned by language
/// constructs (`if`, `array`, `isset`, ...) are not calls.
pub fn last_callee_token(stream: &TokenStream, opener: usize) -> Option<usize> {
    let token = stream.get(opener)?;
    if token.kind != TokenKind::OpenParenthesis || token.parenthesis_owner.is_some() {
        return None;
    }
    let callee = stream.previous_non_empty(opener)?;
    matches!(
        stream.kind(callee),
        TokenKind::Identifier | TokenKind::Variable | TokenKind::CloseCurlyBracket | TokenKind::CloseParenthesis
    )
    .then_some(callee)
}

/// Commas separating the top-level items of the group opened at `opener`
pub fn separating_commas(stream: &TokenStream, opener: usize) -> Vec<usize> {
    let Some(closer) = stream[opener].bracket else {
        return Vec::new();
    };
    let mut commas = Vec::new();
    let mut i = opener + 1;
    while i < closer {
        let token = &stream[i];
        match token.kind {
            TokenKind::OpenParenthesis | TokenKind::OpenSquareBracket | TokenKind::OpenCurlyBracket => {
                if let Some(nested_closer) = token.bracket.filter(|&c| c > i) {
                    i = nested_closer;
                }
            }
            TokenKind::Comma => commas.push(i),
            _ => {}
        }
        i += 1;
    }
    commas
}

/// Token ranges of the arguments between `opener` and its closer
///
/// An empty argument list yields a single empty range.
pub fn argument_ranges(stream: &TokenStream, opener: usize) -> Vec<Range<usize>> {
    let Some(closer) = stream[opener].bracket else {
        return Vec::new();
    };
    let mut separators = vec![opener];
    separators.extend(separating_commas(stream, opener));
    separators.push(closer);
    separators.windows(2).map(|pair| pair[0] + 1..pair[1]).collect()
}

/// First token of `range` that is not whitespace
pub fn first_code_token(stream: &TokenStream, range: &Range<usize>) -> Option<usize> {
    range.clone().find(|&i| stream.kind(i) != TokenKind::Whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(stream: &TokenStream, text: &str) -> usize {
        stream.tokens().iter().position(|t| t.text == text).unwrap()
    }

    fn openers(stream: &TokenStream) -> Vec<usize> {
        stream
            .tokens()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == TokenKind::OpenParenthesis)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_calls_are_detected() {
        let stream = TokenStream::from_source("<?php\nfoo(1);\n$f(2);\n$o->m(3)(4);\n");
        let calls: Vec<_> = openers(&stream)
            .into_iter()
            .filter_map(|o| last_callee_token(&stream, o))
            .map(|c| stream[c].text.clone())
            .collect();
        assert_eq!(calls, vec!["foo", "$f", "m", ")"]);
    }

    #[test]
    fn test_declarations_and_constructs_are_not_calls() {
        let source = "<?php\nfunction foo($a) {}\nif ($a) {}\n$x = array(1);\n$f = function ($b) use ($c) {};\nisset($d);\n";
        let stream = TokenStream::from_source(source);
        assert!(openers(&stream).into_iter().all(|o| last_callee_token(&stream, o).is_none()));
    }

    #[test]
    fn test_argument_ranges_skip_nested_groups() {
        let stream = TokenStream::from_source("<?php\nfoo($a, bar(1, 2), [3, 4], function () { return 5; });\n");
        let opener = position(&stream, "(");
        let ranges = argument_ranges(&stream, opener);
        assert_eq!(ranges.len(), 4);
        assert_eq!(stream.content(ranges[0].start, ranges[0].end - 1), "$a");
        assert_eq!(stream.content(ranges[1].start, ranges[1].end - 1), " bar(1, 2)");
        assert_eq!(stream.content(ranges[2].start, ranges[2].end - 1), " [3, 4]");
    }

    #[test]
    fn test_empty_argument_list() {
        let stream = TokenStream::from_source("<?php\nfoo();\n");
        let ranges = argument_ranges(&stream, position(&stream, "("));
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].is_empty());
    }
}
