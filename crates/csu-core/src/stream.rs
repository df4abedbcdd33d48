//! Structural linking and the query facade over one file's tokens
//!
//! `TokenStream::new` computes every structural link once (matching brackets,
//! parenthesis owners, scope openers/closers, enclosing conditions and nested
//! parentheses). After that the stream is read-only: sniffs only query it.

use std::ops::{Index, Range};

use tracing::trace;

use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// Options for [`TokenStream::find_previous`] and [`TokenStream::find_next`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Search {
    /// Return the first token whose kind is NOT in the set
    pub exclude: bool,
    /// Stay inside the current statement: stop at `;` and, when walking
    /// backward, jump over bracketed groups as a whole
    pub local: bool,
    /// Bound of the scan: inclusive when walking backward, exclusive forward
    pub end: Option<usize>,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn excluding() -> Self {
        Self {
            exclude: true,
            ..Self::default()
        }
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    pub fn until(mut self, end: usize) -> Self {
        self.end = Some(end);
        self
    }
}

/// Ordered, linked tokens of a single file
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    /// First token index of every line (index 0 is line 1)
    line_starts: Vec<usize>,
}

impl TokenStream {
    /// Link raw tokens; positions must already be assigned
    pub fn new(mut tokens: Vec<Token>) -> Self {
        link_brackets(&mut tokens);
        link_parenthesis_owners(&mut tokens);
        let scope_owners = link_scopes(&mut tokens);
        assign_nesting(&mut tokens, &scope_owners);
        let line_starts = index_lines(&tokens);

        trace!(tokens = tokens.len(), lines = line_starts.len(), "linked token stream");

        Self { tokens, line_starts }
    }

    /// Tokenize and link PHP source
    pub fn from_source(source: &str) -> Self {
        Self::new(tokenize(source))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn kind(&self, index: usize) -> TokenKind {
        self.tokens[index].kind
    }

    /// Concatenated text of `start..=end`
    pub fn content(&self, start: usize, end: usize) -> String {
        if start > end || start >= self.tokens.len() {
            return String::new();
        }
        let end = end.min(self.tokens.len() - 1);
        self.tokens[start..=end].iter().map(|t| t.text.as_str()).collect()
    }

    /// Search backward from `start` (inclusive)
    pub fn find_previous(&self, kinds: &[TokenKind], start: usize, search: Search) -> Option<usize> {
        self.scan_backward(start, search, |kind| kinds.contains(&kind))
    }

    /// Search forward from `start` (inclusive)
    pub fn find_next(&self, kinds: &[TokenKind], start: usize, search: Search) -> Option<usize> {
        self.scan_forward(start, search, |kind| kinds.contains(&kind))
    }

    /// Search backward from `start` (inclusive) for a kind accepted by `matches`
    pub fn find_previous_by(
        &self,
        start: usize,
        search: Search,
        matches: impl Fn(TokenKind) -> bool,
    ) -> Option<usize> {
        self.scan_backward(start, search, matches)
    }

    /// Nearest token before `ptr` that is not whitespace
    pub fn previous_non_whitespace(&self, ptr: usize) -> Option<usize> {
        let start = ptr.checked_sub(1)?;
        self.scan_backward(start, Search::excluding(), |kind| kind == TokenKind::Whitespace)
    }

    /// Nearest token before `ptr` that is neither whitespace nor a comment
    pub fn previous_non_empty(&self, ptr: usize) -> Option<usize> {
        let start = ptr.checked_sub(1)?;
        self.scan_backward(start, Search::excluding(), |kind| kind.is_empty())
    }

    /// Nearest token after `ptr` that is neither whitespace nor a comment
    pub fn next_non_empty(&self, ptr: usize) -> Option<usize> {
        self.scan_forward(ptr + 1, Search::excluding(), |kind| kind.is_empty())
    }

    /// Nearest token before `ptr` on the same line whose kind is not in `except`
    pub fn find_previous_on_line_except(&self, except: &[TokenKind], ptr: usize) -> Option<usize> {
        let line = self.tokens.get(ptr)?.line;
        (0..ptr)
            .rev()
            .take_while(|&i| self.tokens[i].line == line)
            .find(|&i| !except.contains(&self.tokens[i].kind))
    }

    /// Token starting at `line:column`, if it exists and (optionally) has one of `kinds`
    pub fn token_at(&self, line: usize, column: usize, kinds: Option<&[TokenKind]>) -> Option<usize> {
        let found = self.line_range(line).find(|&i| self.tokens[i].column == column)?;
        match kinds {
            Some(kinds) if !kinds.contains(&self.tokens[found].kind) => None,
            _ => Some(found),
        }
    }

    /// Indices of the tokens starting on `line`
    pub fn line_range(&self, line: usize) -> Range<usize> {
        let Some(&start) = line.checked_sub(1).and_then(|l| self.line_starts.get(l)) else {
            return self.tokens.len()..self.tokens.len();
        };
        let end = self.line_starts.get(line).copied().unwrap_or(self.tokens.len());
        start..end
    }

    /// Last line that carries a token
    pub fn last_line(&self) -> usize {
        self.line_starts.len()
    }

    fn scan_backward(&self, start: usize, search: Search, matches: impl Fn(TokenKind) -> bool) -> Option<usize> {
        if self.tokens.is_empty() {
            return None;
        }
        let end = search.end.unwrap_or(0);
        let mut i = start.min(self.tokens.len() - 1);

        loop {
            if i < end {
                return None;
            }
            let token = &self.tokens[i];
            if matches(token.kind) != search.exclude {
                return Some(i);
            }
            if search.local {
                let is_closer = matches!(
                    token.kind,
                    TokenKind::CloseCurlyBracket | TokenKind::CloseParenthesis | TokenKind::CloseSquareBracket
                );
                match token.bracket {
                    Some(opener) if is_closer && opener < i => i = opener,
                    _ if token.kind == TokenKind::Semicolon => return None,
                    _ => {}
                }
            }
            i = i.checked_sub(1)?;
        }
    }

    fn scan_forward(&self, start: usize, search: Search, matches: impl Fn(TokenKind) -> bool) -> Option<usize> {
        let end = search.end.unwrap_or(self.tokens.len()).min(self.tokens.len());
        for i in start..end {
            let kind = self.tokens[i].kind;
            if matches(kind) != search.exclude {
                return Some(i);
            }
            if search.local && kind == TokenKind::Semicolon {
                return None;
            }
        }
        None
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

/// Stack slot and direction of a bracket-like token
fn bracket_slot(kind: TokenKind) -> Option<(usize, bool)> {
    match kind {
        TokenKind::OpenCurlyBracket => Some((0, true)),
        TokenKind::CloseCurlyBracket => Some((0, false)),
        TokenKind::OpenParenthesis => Some((1, true)),
        TokenKind::CloseParenthesis => Some((1, false)),
        TokenKind::OpenSquareBracket => Some((2, true)),
        TokenKind::CloseSquareBracket => Some((2, false)),
        TokenKind::DocCommentOpenTag => Some((3, true)),
        TokenKind::DocCommentCloseTag => Some((3, false)),
        _ => None,
    }
}

fn link_brackets(tokens: &mut [Token]) {
    let mut stacks: [Vec<usize>; 4] = Default::default();

    for i in 0..tokens.len() {
        let Some((slot, is_opener)) = bracket_slot(tokens[i].kind) else {
            continue;
        };
        if is_opener {
            stacks[slot].push(i);
        } else if let Some(opener) = stacks[slot].pop() {
            tokens[opener].bracket = Some(i);
            tokens[i].bracket = Some(opener);
        }
    }
}

fn link_parenthesis_owners(tokens: &mut [Token]) {
    let previous_code = |tokens: &[Token], from: usize, skip_reference: bool| -> Option<usize> {
        (0..from)
            .rev()
            .find(|&i| !tokens[i].kind.is_empty() && !(skip_reference && tokens[i].kind == TokenKind::Ampersand))
    };

    let mut owners = Vec::new();
    for i in 0..tokens.len() {
        if tokens[i].kind != TokenKind::OpenParenthesis {
            continue;
        }
        let Some(closer) = tokens[i].bracket else {
            continue;
        };
        let Some(prev) = previous_code(tokens, i, false) else {
            continue;
        };

        let owner = match tokens[prev].kind {
            TokenKind::If
            | TokenKind::ElseIf
            | TokenKind::While
            | TokenKind::For
            | TokenKind::Foreach
            | TokenKind::Switch
            | TokenKind::Catch
            | TokenKind::Declare
            | TokenKind::Match
            | TokenKind::Array
            | TokenKind::List
            | TokenKind::Isset
            | TokenKind::Empty
            | TokenKind::Unset
            | TokenKind::Closure
            | TokenKind::Fn
            | TokenKind::Use
            | TokenKind::AnonClass => Some(prev),
            TokenKind::Identifier => previous_code(tokens, prev, true)
                .filter(|&keyword| tokens[keyword].kind == TokenKind::Function),
            _ => None,
        };

        if let Some(owner) = owner {
            owners.push((i, closer, owner));
        }
    }

    for (opener, closer, owner) in owners {
        tokens[opener].parenthesis_owner = Some(owner);
        tokens[closer].parenthesis_owner = Some(owner);
    }
}

fn takes_scope(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Class
            | TokenKind::AnonClass
            | TokenKind::Interface
            | TokenKind::Trait
            | TokenKind::Function
            | TokenKind::Closure
            | TokenKind::Namespace
            | TokenKind::Declare
            | TokenKind::If
            | TokenKind::ElseIf
            | TokenKind::Else
            | TokenKind::While
            | TokenKind::Do
            | TokenKind::For
            | TokenKind::Foreach
            | TokenKind::Switch
            | TokenKind::Try
            | TokenKind::Catch
            | TokenKind::Finally
            | TokenKind::Match
            | TokenKind::Use
    )
}

/// Link scope owners to their braces; returns the owner of every scope opener
fn link_scopes(tokens: &mut [Token]) -> Vec<Option<usize>> {
    let mut owner_of = vec![None; tokens.len()];
    // (owner, parenthesis depth at which it was seen)
    let mut pending: Vec<(usize, usize)> = Vec::new();
    let mut depth = 0usize;
    let mut links = Vec::new();

    for i in 0..tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenParenthesis => depth += 1,
            TokenKind::CloseParenthesis => {
                depth = depth.saturating_sub(1);
                while pending.last().is_some_and(|&(_, d)| d > depth) {
                    pending.pop();
                }
            }
            TokenKind::Semicolon | TokenKind::CloseCurlyBracket => {
                while pending.last().is_some_and(|&(_, d)| d >= depth) {
                    pending.pop();
                }
            }
            TokenKind::OpenCurlyBracket => {
                while pending.last().is_some_and(|&(_, d)| d > depth) {
                    pending.pop();
                }
                if let (Some(&(owner, _)), Some(closer)) = (pending.last(), tokens[i].bracket) {
                    links.push((owner, i, closer));
                    owner_of[i] = Some(owner);
                }
                while pending.last().is_some_and(|&(_, d)| d >= depth) {
                    pending.pop();
                }
            }
            TokenKind::Use
                if pending
                    .last()
                    .is_some_and(|&(owner, d)| d == depth && tokens[owner].kind == TokenKind::Closure) => {}
            kind if takes_scope(kind) => pending.push((i, depth)),
            _ => {}
        }
    }

    for (owner, opener, closer) in links {
        for index in [owner, opener, closer] {
            tokens[index].scope_opener = Some(opener);
            tokens[index].scope_closer = Some(closer);
        }
    }

    owner_of
}

fn assign_nesting(tokens: &mut [Token], scope_owners: &[Option<usize>]) {
    // (owner, closer)
    let mut conditions: Vec<(usize, usize)> = Vec::new();
    let mut parentheses: Vec<usize> = Vec::new();

    for i in 0..tokens.len() {
        let kind = tokens[i].kind;

        if kind == TokenKind::CloseCurlyBracket && conditions.last().is_some_and(|&(_, closer)| closer == i) {
            conditions.pop();
        }
        if kind == TokenKind::CloseParenthesis && parentheses.last().is_some_and(|&opener| tokens[opener].bracket == Some(i)) {
            parentheses.pop();
        }

        tokens[i].conditions = conditions.iter().map(|&(owner, _)| owner).collect();
        tokens[i].nested_parentheses = parentheses.clone();

        match kind {
            TokenKind::OpenCurlyBracket => {
                if let (Some(owner), Some(closer)) = (scope_owners[i], tokens[i].scope_closer) {
                    conditions.push((owner, closer));
                }
            }
            TokenKind::OpenParenthesis if tokens[i].bracket.is_some() => parentheses.push(i),
            _ => {}
        }
    }
}

fn index_lines(tokens: &[Token]) -> Vec<usize> {
    let mut starts = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        while starts.len() < token.line {
            starts.push(i);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(stream: &TokenStream, text: &str) -> usize {
        stream.tokens().iter().position(|t| t.text == text).unwrap()
    }

    #[test]
    fn test_brackets_are_matched() {
        let stream = TokenStream::from_source("<?php foo([1, (2)], '{');");
        let open = position(&stream, "(");
        let close = stream[open].bracket.unwrap();
        assert_eq!(stream[close].text, ")");
        assert_eq!(stream.kind(close + 1), TokenKind::Semicolon);
    }

    #[test]
    fn test_scope_links_and_conditions() {
        let stream = TokenStream::from_source("<?php\nclass A {\n    function f() { return 1; }\n}\n");
        let class = position(&stream, "class");
        let function = position(&stream, "function");
        let ret = position(&stream, "return");

        let opener = stream[class].scope_opener.unwrap();
        assert_eq!(stream[opener].text, "{");
        assert_eq!(stream[stream[class].scope_closer.unwrap()].text, "}");
        assert_eq!(stream[function].conditions, vec![class]);
        assert_eq!(stream[ret].conditions, vec![class, function]);
    }

    #[test]
    fn test_closure_use_does_not_steal_scope() {
        let stream = TokenStream::from_source("<?php $f = function () use ($a) { return $a; };");
        let closure = position(&stream, "function");
        let ret = position(&stream, "return");
        assert_eq!(stream[ret].conditions, vec![closure]);
        let use_kw = position(&stream, "use");
        assert!(stream[use_kw].scope_opener.is_none());
    }

    #[test]
    fn test_parenthesis_owner_for_declaration() {
        let stream = TokenStream::from_source("<?php function &foo($a) {} bar($b);");
        let function = position(&stream, "function");
        let first = position(&stream, "(");
        assert_eq!(stream[first].parenthesis_owner, Some(function));
        let call = stream.find_next(&[TokenKind::OpenParenthesis], first + 1, Search::new()).unwrap();
        assert_eq!(stream[call].parenthesis_owner, None);
        let a = position(&stream, "$a");
        assert_eq!(stream[a].nested_parentheses, vec![first]);
    }

    #[test]
    fn test_local_backward_search_jumps_over_groups() {
        let stream = TokenStream::from_source("<?php\n$x = 1;\nfor ($i = 0; $i < 2; $i++) { $y; }\n");
        let y = position(&stream, "$y");
        let semi = stream.find_next(&[TokenKind::Semicolon], y, Search::new()).unwrap();
        // Backward from after the loop body: the header semicolons are skipped
        let found = stream.find_previous(&[TokenKind::For], semi + 2, Search::new().local());
        assert_eq!(found, Some(position(&stream, "for")));
        // A plain search stops inside the body
        let plain = stream.find_previous(&[TokenKind::Semicolon], semi - 1, Search::new());
        assert!(plain.unwrap() < semi);
    }

    #[test]
    fn test_local_search_stops_at_statement_end() {
        let stream = TokenStream::from_source("<?php\nclass A {}\n$x = 1;\n$y = 2;");
        let y = position(&stream, "$y");
        assert_eq!(stream.find_previous(&[TokenKind::Class], y, Search::new().local()), None);
        assert!(stream.find_previous(&[TokenKind::Class], y, Search::new()).is_some());
    }

    #[test]
    fn test_line_queries() {
        let stream = TokenStream::from_source("<?php\n$a   = 1;\n$bb = 2; // note\n");
        let equal = stream.token_at(2, 6, Some(&[TokenKind::Equal]));
        assert!(equal.is_some());
        assert_eq!(stream.token_at(2, 6, Some(&[TokenKind::Variable])), None);

        let comment = position(&stream, "// note");
        let code = stream.find_previous_on_line_except(&[TokenKind::Whitespace], comment).unwrap();
        assert_eq!(stream[code].kind, TokenKind::Semicolon);
        assert_eq!(stream[stream.line_range(3).start].text, "$bb");
        assert_eq!(stream.line_range(99), stream.len()..stream.len());
    }

    #[test]
    fn test_doc_comment_pair() {
        let stream = TokenStream::from_source("<?php\n/** doc */\nclass A {}");
        let open = position(&stream, "/**");
        let close = stream[open].bracket.unwrap();
        assert_eq!(stream[close].kind, TokenKind::DocCommentCloseTag);
    }
}
