//! Resolves where a declaration logically starts
//!
//! A declaration's blank-line count is measured from its docblock or from the
//! leading run of line comments attached to it, not from the keyword itself.

use csu_core::{Search, TokenKind, TokenStream};
use tracing::trace;

use crate::SniffError;

/// Kinds skipped when looking for what precedes a declaration
pub fn skip_set(ignored: &[TokenKind]) -> Vec<TokenKind> {
    let mut kinds = vec![
        TokenKind::Public,
        TokenKind::Protected,
        TokenKind::Private,
        TokenKind::Whitespace,
    ];
    for &kind in ignored {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

/// Effective start of the declaration at `target`
///
/// Folds an attached docblock or comment block into the declaration.
/// Returns `target` itself when nothing is attached.
pub fn effective_start(stream: &TokenStream, target: usize, ignored: &[TokenKind]) -> Result<usize, SniffError> {
    let skipped = skip_set(ignored);
    let Some(preceding) = target
        .checked_sub(1)
        .and_then(|start| stream.find_previous(&skipped, start, Search::excluding().local()))
    else {
        return Ok(target);
    };

    let target_line = stream[target].line;
    let preceding_line = stream[preceding].line;
    if preceding_line > target_line || preceding_line + 1 < target_line {
        return Ok(target);
    }

    let effective = match stream.kind(preceding) {
        TokenKind::DocCommentCloseTag => stream[preceding].bracket.unwrap_or(target),
        TokenKind::Comment if trails_code(stream, preceding) => {
            let without_comment: Vec<TokenKind> =
                skipped.iter().copied().filter(|&k| k != TokenKind::Comment).collect();
            stream
                .find_next(&without_comment, preceding + 1, Search::excluding())
                .unwrap_or(target)
        }
        TokenKind::Comment => skip_consecutive_comments(stream, preceding)?,
        _ => target,
    };

    trace!(target, effective, "resolved effective start");
    Ok(effective)
}

/// Whether code precedes the comment at `comment` on its line
pub fn trails_code(stream: &TokenStream, comment: usize) -> bool {
    stream
        .find_previous_on_line_except(&[TokenKind::Whitespace, TokenKind::Comment], comment)
        .is_some()
}

/// The code token a trailing comment belongs to, or `ptr` unchanged
pub fn skip_single_line_code_comment(stream: &TokenStream, ptr: usize) -> usize {
    if stream.kind(ptr) != TokenKind::Comment {
        return ptr;
    }
    stream
        .find_previous_on_line_except(&[TokenKind::Comment, TokenKind::Whitespace], ptr)
        .unwrap_or(ptr)
}

/// Earliest comment of the own-line block ending at `start`
fn skip_consecutive_comments(stream: &TokenStream, mut start: usize) -> Result<usize, SniffError> {
    while start > 0 {
        let Some(prev) = stream.previous_non_whitespace(start) else {
            return Ok(start);
        };
        if stream[prev].line + 1 < stream[start].line
            || stream.kind(prev) != TokenKind::Comment
            || trails_code(stream, prev)
        {
            return Ok(start);
        }
        start = prev;
    }
    Err(SniffError::Invariant(
        "comment block reaches the start of the file".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(stream: &TokenStream, text: &str) -> usize {
        stream.tokens().iter().position(|t| t.text == text).unwrap()
    }

    #[test]
    fn test_docblock_is_folded() {
        let stream = TokenStream::from_source("<?php\n/**\n * Doc\n */\nfinal class A {}\n");
        let class = position(&stream, "class");
        let start = effective_start(&stream, class, &[TokenKind::Final]).unwrap();
        assert_eq!(stream.kind(start), TokenKind::DocCommentOpenTag);
    }

    #[test]
    fn test_detached_docblock_is_not_folded() {
        let stream = TokenStream::from_source("<?php\n/** Doc */\n\nclass A {}\n");
        let class = position(&stream, "class");
        assert_eq!(effective_start(&stream, class, &[]).unwrap(), class);
    }

    #[test]
    fn test_comment_block_is_folded_to_its_first_line() {
        let source = "<?php\nclass A {\n    // first\n    // second\n    public $a;\n}\n";
        let stream = TokenStream::from_source(source);
        let variable = position(&stream, "$a");
        let start = effective_start(&stream, variable, &[]).unwrap();
        assert_eq!(stream[start].text, "// first");
    }

    #[test]
    fn test_comment_block_stops_at_gap() {
        let source = "<?php\nclass A {\n    // first\n\n    // second\n    public $a;\n}\n";
        let stream = TokenStream::from_source(source);
        let variable = position(&stream, "$a");
        let start = effective_start(&stream, variable, &[]).unwrap();
        assert_eq!(stream[start].text, "// second");
    }

    #[test]
    fn test_trailing_comment_is_not_folded() {
        let source = "<?php\nclass A {\n    public $a; // note\n    public $b;\n}\n";
        let stream = TokenStream::from_source(source);
        let variable = position(&stream, "$b");
        assert_eq!(effective_start(&stream, variable, &[]).unwrap(), variable);

        let comment = position(&stream, "// note");
        assert!(trails_code(&stream, comment));
        assert_eq!(stream.kind(skip_single_line_code_comment(&stream, comment)), TokenKind::Semicolon);
    }

    #[test]
    fn test_skip_set_has_no_duplicates() {
        let kinds = skip_set(&[TokenKind::Static, TokenKind::Whitespace]);
        assert_eq!(kinds.iter().filter(|&&k| k == TokenKind::Whitespace).count(), 1);
        assert!(kinds.contains(&TokenKind::Static));

        let kinds = skip_set(&[TokenKind::Final, TokenKind::Final, TokenKind::Private]);
        assert_eq!(
            kinds,
            vec![
                TokenKind::Public,
                TokenKind::Protected,
                TokenKind::Private,
                TokenKind::Whitespace,
                TokenKind::Final,
            ]
        );
    }
}
