//! Reference PHP tokenizer
//!
//! Produces tokens in the PHP_CodeSniffer shape the sniffs expect: every token
//! lives on a single line (multi-line comments, strings and inline HTML are
//! split per line, each piece keeping its trailing newline), whitespace runs
//! end at a newline, and doc comments are broken into open tag, stars, tags,
//! strings and close tag.

use crate::token::{Token, TokenKind};

/// Tokenize PHP source into line-split, unlinked tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    let raw = Lexer::new(source).run();
    split_lines(source, raw)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Outside `<?php ... ?>`
    Initial,
    /// Inside PHP code
    InScripting,
}

#[derive(Debug, Clone, Copy)]
struct RawToken {
    kind: TokenKind,
    start: usize,
    end: usize,
}

/// Longest operators first
const OPERATORS: &[(&str, TokenKind)] = &[
    ("<=>", TokenKind::Spaceship),
    ("**=", TokenKind::PowEqual),
    ("...", TokenKind::Operator),
    ("<<=", TokenKind::SlEqual),
    (">>=", TokenKind::SrEqual),
    ("??=", TokenKind::CoalesceEqual),
    ("===", TokenKind::Operator),
    ("!==", TokenKind::Operator),
    ("?->", TokenKind::NullsafeObjectOperator),
    ("::", TokenKind::DoubleColon),
    ("->", TokenKind::ObjectOperator),
    ("=>", TokenKind::DoubleArrow),
    ("==", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("<>", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("&&", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("++", TokenKind::Operator),
    ("--", TokenKind::Operator),
    ("+=", TokenKind::PlusEqual),
    ("-=", TokenKind::MinusEqual),
    ("*=", TokenKind::MulEqual),
    ("/=", TokenKind::DivEqual),
    (".=", TokenKind::ConcatEqual),
    ("%=", TokenKind::ModEqual),
    ("&=", TokenKind::AndEqual),
    ("|=", TokenKind::OrEqual),
    ("^=", TokenKind::XorEqual),
    ("??", TokenKind::Coalesce),
    ("<<", TokenKind::Operator),
    (">>", TokenKind::Operator),
    ("**", TokenKind::Operator),
    ("#[", TokenKind::OpenSquareBracket),
    ("{", TokenKind::OpenCurlyBracket),
    ("}", TokenKind::CloseCurlyBracket),
    ("(", TokenKind::OpenParenthesis),
    (")", TokenKind::CloseParenthesis),
    ("[", TokenKind::OpenSquareBracket),
    ("]", TokenKind::CloseSquareBracket),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
    ("?", TokenKind::Question),
    ("&", TokenKind::Ampersand),
    ("|", TokenKind::BitwiseOr),
    ("=", TokenKind::Equal),
    ("+", TokenKind::Operator),
    ("-", TokenKind::Operator),
    ("*", TokenKind::Operator),
    ("/", TokenKind::Operator),
    ("%", TokenKind::Operator),
    (".", TokenKind::Operator),
    ("<", TokenKind::Operator),
    (">", TokenKind::Operator),
    ("!", TokenKind::Operator),
    ("~", TokenKind::Operator),
    ("^", TokenKind::Operator),
    ("@", TokenKind::Operator),
];

fn keyword_kind(lower: &str) -> Option<TokenKind> {
    let kind = match lower {
        "abstract" => TokenKind::Abstract,
        "final" => TokenKind::Final,
        "static" => TokenKind::Static,
        "public" => TokenKind::Public,
        "protected" => TokenKind::Protected,
        "private" => TokenKind::Private,
        "var" => TokenKind::Var,
        "readonly" => TokenKind::Readonly,
        "class" => TokenKind::Class,
        "interface" => TokenKind::Interface,
        "trait" => TokenKind::Trait,
        "function" => TokenKind::Function,
        "fn" => TokenKind::Fn,
        "const" => TokenKind::Const,
        "use" => TokenKind::Use,
        "namespace" => TokenKind::Namespace,
        "declare" => TokenKind::Declare,
        "extends" => TokenKind::Extends,
        "implements" => TokenKind::Implements,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::ElseIf,
        "while" => TokenKind::While,
        "do" => TokenKind::Do,
        "for" => TokenKind::For,
        "foreach" => TokenKind::Foreach,
        "as" => TokenKind::As,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "finally" => TokenKind::Finally,
        "match" => TokenKind::Match,
        "return" => TokenKind::Return,
        "yield" => TokenKind::Yield,
        "new" => TokenKind::New,
        "array" => TokenKind::Array,
        "list" => TokenKind::List,
        "isset" => TokenKind::Isset,
        "empty" => TokenKind::Empty,
        "unset" => TokenKind::Unset,
        "echo" => TokenKind::Echo,
        "print" => TokenKind::Print,
        "instanceof" => TokenKind::Instanceof,
        "self" => TokenKind::SelfKw,
        "parent" => TokenKind::Parent,
        "callable" => TokenKind::Callable,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "global" | "throw" | "break" | "continue" | "goto" | "clone" | "include"
        | "include_once" | "require" | "require_once" | "insteadof" | "endif" | "endwhile"
        | "endfor" | "endforeach" | "endswitch" | "enddeclare" | "exit" | "die" | "eval"
        | "and" | "or" | "xor" | "__halt_compiler" => TokenKind::Keyword,
        _ => return None,
    };
    Some(kind)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    state: State,
    tokens: Vec<RawToken>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            state: State::Initial,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<RawToken> {
        while self.pos < self.bytes.len() {
            match self.state {
                State::Initial => self.scan_initial(),
                State::InScripting => self.scan_scripting(),
            }
        }
        self.tokens
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(RawToken { kind, start, end: self.pos });
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        self.bytes[self.pos..].starts_with(pattern.as_bytes())
    }

    fn starts_with_ignore_case(&self, pattern: &str) -> bool {
        let end = self.pos + pattern.len();
        end <= self.bytes.len() && self.bytes[self.pos..end].eq_ignore_ascii_case(pattern.as_bytes())
    }

    /// Kind of the last token that is not whitespace or a comment
    fn previous_significant(&self) -> Option<TokenKind> {
        self.tokens.iter().rev().map(|t| t.kind).find(|kind| !kind.is_empty())
    }

    fn scan_initial(&mut self) {
        let start = self.pos;

        if self.starts_with_ignore_case("<?php") {
            self.pos += 5;
            self.consume_tag_newline(true);
            self.push(TokenKind::OpenTag, start);
            self.state = State::InScripting;
            return;
        }

        if self.starts_with("<?=") {
            self.pos += 3;
            self.push(TokenKind::OpenTagWithEcho, start);
            self.state = State::InScripting;
            return;
        }

        let rest = &self.source[self.pos..];
        let mut search_from = rest.chars().next().map_or(1, char::len_utf8);
        let end = loop {
            match rest[search_from..].find("<?") {
                Some(found) => {
                    let candidate = search_from + found;
                    let tail = &rest.as_bytes()[candidate..];
                    let is_php = tail.len() >= 5 && tail[..5].eq_ignore_ascii_case(b"<?php");
                    if is_php || tail.starts_with(b"<?=") {
                        break candidate;
                    }
                    search_from = candidate + 2;
                }
                None => break rest.len(),
            }
        };
        self.pos += end;
        self.push(TokenKind::InlineHtml, start);
    }

    /// Opening and closing tags swallow a single following line break (or a space after `<?php`)
    fn consume_tag_newline(&mut self, allow_space: bool) {
        match self.peek(0) {
            Some(b'\n') => self.pos += 1,
            Some(b'\r') if self.peek(1) == Some(b'\n') => self.pos += 2,
            Some(b' ') | Some(b'\t') if allow_space => self.pos += 1,
            _ => {}
        }
    }

    fn scan_scripting(&mut self) {
        let start = self.pos;
        let b = self.bytes[self.pos];

        match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                while let Some(c) = self.peek(0) {
                    if !matches!(c, b' ' | b'\t' | b'\r' | b'\n') {
                        break;
                    }
                    self.pos += 1;
                    if c == b'\n' {
                        break;
                    }
                }
                self.push(TokenKind::Whitespace, start);
            }
            b'#' if self.peek(1) != Some(b'[') => self.scan_line_comment(),
            b'/' if self.peek(1) == Some(b'/') => self.scan_line_comment(),
            b'/' if self.peek(1) == Some(b'*') => {
                let is_doc = self.peek(2) == Some(b'*')
                    && matches!(self.peek(3), Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n'));
                if is_doc {
                    self.scan_doc_comment();
                } else {
                    self.scan_block_comment();
                }
            }
            b'?' if self.peek(1) == Some(b'>') => {
                self.pos += 2;
                self.consume_tag_newline(false);
                self.push(TokenKind::CloseTag, start);
                self.state = State::Initial;
            }
            b'$' if self.peek(1).is_some_and(is_ident_start) => {
                self.pos += 1;
                while self.peek(0).is_some_and(is_ident_char) {
                    self.pos += 1;
                }
                self.push(TokenKind::Variable, start);
            }
            b'0'..=b'9' => self.scan_number(),
            b'.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            b'\'' | b'"' | b'`' => {
                self.scan_quoted(b);
                self.push(TokenKind::ConstantEncapsedString, start);
            }
            b'<' if self.starts_with("<<<") && self.scan_heredoc() => {
                self.push(TokenKind::ConstantEncapsedString, start);
            }
            b'\\' => {
                self.pos += 1;
                self.push(TokenKind::NsSeparator, start);
            }
            _ if is_ident_start(b) => self.scan_word(),
            _ => self.scan_operator(),
        }
    }

    fn scan_line_comment(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek(0) {
            if c == b'\n' || (c == b'\r' && self.peek(1) == Some(b'\n')) || self.starts_with("?>") {
                break;
            }
            self.pos += 1;
        }
        self.push(TokenKind::Comment, start);
    }

    fn scan_block_comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        match self.source[self.pos..].find("*/") {
            Some(end) => self.pos += end + 2,
            None => self.pos = self.bytes.len(),
        }
        self.push(TokenKind::Comment, start);
    }

    fn scan_doc_comment(&mut self) {
        let start = self.pos;
        self.pos += 3;
        self.push(TokenKind::DocCommentOpenTag, start);

        while self.pos < self.bytes.len() {
            let start = self.pos;
            if self.starts_with("*/") {
                self.pos += 2;
                self.push(TokenKind::DocCommentCloseTag, start);
                return;
            }

            match self.bytes[self.pos] {
                b'\n' => {
                    self.pos += 1;
                    self.push(TokenKind::DocCommentWhitespace, start);
                }
                b' ' | b'\t' | b'\r' => {
                    while matches!(self.peek(0), Some(b' ') | Some(b'\t') | Some(b'\r')) {
                        self.pos += 1;
                    }
                    self.push(TokenKind::DocCommentWhitespace, start);
                }
                b'*' => {
                    self.pos += 1;
                    self.push(TokenKind::DocCommentStar, start);
                }
                b'@' => {
                    self.pos += 1;
                    while self.peek(0).is_some_and(|c| is_ident_char(c) || c == b'-' || c == b'\\') {
                        self.pos += 1;
                    }
                    self.push(TokenKind::DocCommentTag, start);
                }
                _ => {
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' && !self.starts_with("*/") {
                        self.pos += 1;
                    }
                    while self.pos > start + 1 && matches!(self.bytes[self.pos - 1], b' ' | b'\t' | b'\r') {
                        self.pos -= 1;
                    }
                    self.push(TokenKind::DocCommentString, start);
                }
            }
        }
    }

    fn scan_number(&mut self) {
        let start = self.pos;
        let mut is_float = false;

        if self.peek(0) == Some(b'0') && matches!(self.peek(1), Some(b'x') | Some(b'X') | Some(b'b') | Some(b'B')) {
            self.pos += 2;
            while self.peek(0).is_some_and(|c| c.is_ascii_hexdigit() || c == b'_') {
                self.pos += 1;
            }
            self.push(TokenKind::LNumber, start);
            return;
        }

        while self.peek(0).is_some_and(|c| c.is_ascii_digit() || c == b'_') {
            self.pos += 1;
        }
        if self.peek(0) == Some(b'.') && self.peek(1) != Some(b'.') && self.peek(1) != Some(b'=') {
            is_float = true;
            self.pos += 1;
            while self.peek(0).is_some_and(|c| c.is_ascii_digit() || c == b'_') {
                self.pos += 1;
            }
        }
        if matches!(self.peek(0), Some(b'e') | Some(b'E')) {
            let digit_at = if matches!(self.peek(1), Some(b'+') | Some(b'-')) { 2 } else { 1 };
            if self.peek(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += digit_at;
                while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }

        let kind = if is_float { TokenKind::DNumber } else { TokenKind::LNumber };
        self.push(kind, start);
    }

    fn scan_quoted(&mut self, quote: u8) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            let c = self.bytes[self.pos];
            if c == b'\\' {
                self.pos = (self.pos + 2).min(self.bytes.len());
                continue;
            }
            self.pos += 1;
            if c == quote {
                break;
            }
        }
    }

    /// Consume a heredoc/nowdoc; returns false (consuming nothing) if the opener is malformed
    fn scan_heredoc(&mut self) -> bool {
        let mut cursor = self.pos + 3;
        while matches!(self.bytes.get(cursor), Some(b' ') | Some(b'\t')) {
            cursor += 1;
        }
        let quote = match self.bytes.get(cursor) {
            Some(&q @ (b'\'' | b'"')) => {
                cursor += 1;
                Some(q)
            }
            _ => None,
        };
        let label_start = cursor;
        while self.bytes.get(cursor).copied().is_some_and(is_ident_char) {
            cursor += 1;
        }
        if cursor == label_start {
            return false;
        }
        let label = &self.source[label_start..cursor];
        if let Some(q) = quote {
            if self.bytes.get(cursor) != Some(&q) {
                return false;
            }
            cursor += 1;
        }
        match self.bytes.get(cursor) {
            Some(b'\n') => cursor += 1,
            Some(b'\r') if self.bytes.get(cursor + 1) == Some(&b'\n') => cursor += 2,
            _ => return false,
        }

        let mut line_start = cursor;
        while line_start < self.bytes.len() {
            let line_end = self.source[line_start..]
                .find('\n')
                .map(|i| line_start + i)
                .unwrap_or(self.bytes.len());
            let line = &self.source[line_start..line_end];
            let trimmed = line.trim_start_matches([' ', '\t']);
            if let Some(after) = trimmed.strip_prefix(label) {
                if !after.bytes().next().is_some_and(is_ident_char) {
                    self.pos = line_start + (line.len() - trimmed.len()) + label.len();
                    return true;
                }
            }
            line_start = line_end + 1;
        }

        self.pos = self.bytes.len();
        true
    }

    fn scan_word(&mut self) {
        let start = self.pos;
        while self.peek(0).is_some_and(is_ident_char) {
            self.pos += 1;
        }
        let lower = self.source[start..self.pos].to_ascii_lowercase();
        let previous = self.previous_significant();

        let member_name = matches!(
            previous,
            Some(TokenKind::ObjectOperator)
                | Some(TokenKind::NullsafeObjectOperator)
                | Some(TokenKind::DoubleColon)
                | Some(TokenKind::Function)
                | Some(TokenKind::Const)
        );
        let kind = if member_name {
            TokenKind::Identifier
        } else {
            match keyword_kind(&lower) {
                Some(TokenKind::Function) if self.next_code_byte(&[b'&']) == Some(b'(') => TokenKind::Closure,
                Some(TokenKind::Class) if previous == Some(TokenKind::New) => TokenKind::AnonClass,
                Some(TokenKind::Yield) => {
                    if self.try_consume_from() {
                        TokenKind::YieldFrom
                    } else {
                        TokenKind::Yield
                    }
                }
                Some(kind) => kind,
                None => TokenKind::Identifier,
            }
        };
        self.push(kind, start);
    }

    /// Next byte that is neither whitespace nor one of `skip`
    fn next_code_byte(&self, skip: &[u8]) -> Option<u8> {
        self.bytes[self.pos..]
            .iter()
            .copied()
            .find(|c| !c.is_ascii_whitespace() && !skip.contains(c))
    }

    fn try_consume_from(&mut self) -> bool {
        let mut cursor = self.pos;
        while self.bytes.get(cursor).is_some_and(|c| c.is_ascii_whitespace()) {
            cursor += 1;
        }
        let end = cursor + 4;
        if cursor == self.pos || end > self.bytes.len() || !self.bytes[cursor..end].eq_ignore_ascii_case(b"from") {
            return false;
        }
        if self.bytes.get(end).copied().is_some_and(is_ident_char) {
            return false;
        }
        self.pos = end;
        true
    }

    fn scan_operator(&mut self) {
        let start = self.pos;
        for (text, kind) in OPERATORS {
            if self.starts_with(text) {
                self.pos += text.len();
                self.push(*kind, start);
                return;
            }
        }

        let width = self.source[self.pos..].chars().next().map_or(1, char::len_utf8);
        self.pos += width;
        self.push(TokenKind::Unknown, start);
    }
}

/// Split raw tokens at line breaks and assign lines and columns
fn split_lines(source: &str, raw: Vec<RawToken>) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(raw.len());
    let mut line = 1;
    let mut column = 1;

    for token in raw {
        let text = &source[token.start..token.end];
        let mut piece_start = 0;

        for (i, ch) in text.char_indices() {
            if ch == '\n' {
                let piece = &text[piece_start..=i];
                tokens.push(Token::new(token.kind, piece, line, column, token.start + piece_start));
                line += 1;
                column = 1;
                piece_start = i + 1;
            }
        }

        if piece_start < text.len() {
            let piece = &text[piece_start..];
            tokens.push(Token::new(token.kind, piece, line, column, token.start + piece_start));
            column += piece.chars().count();
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn significant(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_open_tag_swallows_newline() {
        let tokens = tokenize("<?php\n$a=1;");
        assert_eq!(tokens[0].kind, TokenKind::OpenTag);
        assert_eq!(tokens[0].text, "<?php\n");
        assert_eq!(tokens[1].kind, TokenKind::Variable);
        assert_eq!((tokens[1].line, tokens[1].column), (2, 1));
    }

    #[test]
    fn test_whitespace_split_per_line() {
        let tokens = tokenize("<?php\n$a;\n\n  $b;");
        let ws: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Whitespace)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(ws, vec!["\n", "\n", "  "]);
        let b = tokens.iter().find(|t| t.text == "$b").unwrap();
        assert_eq!((b.line, b.column), (4, 3));
    }

    #[test]
    fn test_block_comment_split_per_line() {
        let tokens = tokenize("<?php\n/* a\n   b */\n$x;");
        let comments: Vec<(usize, &str)> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Comment)
            .map(|t| (t.line, t.text.as_str()))
            .collect();
        assert_eq!(comments, vec![(2, "/* a\n"), (3, "   b */")]);
    }

    #[test]
    fn test_doc_comment_parts() {
        let parts = significant("<?php\n/**\n * @codingStandardsIgnoreRule RN.Spacing.Use\n */\n");
        let doc: Vec<TokenKind> = parts.iter().map(|(k, _)| *k).skip(1).collect();
        assert_eq!(
            doc,
            vec![
                TokenKind::DocCommentOpenTag,
                TokenKind::DocCommentWhitespace,
                TokenKind::DocCommentWhitespace,
                TokenKind::DocCommentStar,
                TokenKind::DocCommentWhitespace,
                TokenKind::DocCommentTag,
                TokenKind::DocCommentWhitespace,
                TokenKind::DocCommentString,
                TokenKind::DocCommentWhitespace,
                TokenKind::DocCommentWhitespace,
                TokenKind::DocCommentCloseTag,
            ]
        );
        assert!(parts.contains(&(TokenKind::DocCommentString, "RN.Spacing.Use".to_string())));
    }

    #[test]
    fn test_function_versus_closure() {
        let parts = significant("<?php function foo() {} $f = function () {}; $g = function&($x) {};");
        assert_eq!(parts[1].0, TokenKind::Function);
        assert!(parts.iter().filter(|(k, _)| *k == TokenKind::Closure).count() == 2);
    }

    #[test]
    fn test_keywords_after_object_operator_are_identifiers() {
        let parts = significant("<?php $a->list(); Foo::class; function print() {}");
        assert!(parts.contains(&(TokenKind::Identifier, "list".to_string())));
        assert!(parts.contains(&(TokenKind::Identifier, "class".to_string())));
        assert!(parts.contains(&(TokenKind::Identifier, "print".to_string())));
    }

    #[test]
    fn test_numbers() {
        let parts = significant("<?php 1; 1.5; .5; 0x1F; 1e3; 10_000;");
        let numbers: Vec<TokenKind> = parts
            .iter()
            .map(|(k, _)| *k)
            .filter(|k| matches!(k, TokenKind::LNumber | TokenKind::DNumber))
            .collect();
        assert_eq!(
            numbers,
            vec![
                TokenKind::LNumber,
                TokenKind::DNumber,
                TokenKind::DNumber,
                TokenKind::LNumber,
                TokenKind::DNumber,
                TokenKind::LNumber,
            ]
        );
    }

    #[test]
    fn test_operators_longest_match() {
        let parts = significant("<?php $a ??= $b <=> $c => $d .= 'x';");
        let ops: Vec<TokenKind> = parts.iter().map(|(k, _)| *k).collect();
        assert!(ops.contains(&TokenKind::CoalesceEqual));
        assert!(ops.contains(&TokenKind::Spaceship));
        assert!(ops.contains(&TokenKind::DoubleArrow));
        assert!(ops.contains(&TokenKind::ConcatEqual));
    }

    #[test]
    fn test_anonymous_class_and_yield_from() {
        let parts = significant("<?php $x = new class {}; function g() { yield from h(); }");
        assert!(parts.iter().any(|(k, _)| *k == TokenKind::AnonClass));
        assert!(parts.iter().any(|(k, t)| *k == TokenKind::YieldFrom && t == "yield from"));
    }

    #[test]
    fn test_inline_html_and_close_tag() {
        let all = kinds("<p>\n<?php echo 1; ?>\n<b>");
        assert_eq!(all[0], TokenKind::InlineHtml);
        assert!(all.contains(&TokenKind::CloseTag));
        assert_eq!(*all.last().unwrap(), TokenKind::InlineHtml);
    }

    #[test]
    fn test_heredoc_is_one_string_per_line() {
        let tokens = tokenize("<?php\n$a = <<<EOT\nline\nEOT;\n");
        let strings: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ConstantEncapsedString)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(strings, vec!["<<<EOT\n", "line\n", "EOT"]);
    }

    #[test]
    fn test_offsets_round_trip() {
        let source = "<?php\n/* ä\n */ $a = 'ü';\n";
        let rebuilt: String = tokenize(source).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, source);
        for token in tokenize(source) {
            assert_eq!(&source[token.offset..token.end_offset()], token.text);
        }
    }
}
