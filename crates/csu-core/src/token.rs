//! Token model shared by the lexer, the stream facade and the sniffs
//!
//! Token kinds follow the PHP_CodeSniffer token model: whitespace, comments and
//! strings never span lines, doc comments are split into their parts, and
//! `function` is split into named functions and closures.

use serde::Serialize;

/// Category of a lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TokenKind {
    // Tags and text outside PHP
    OpenTag,
    OpenTagWithEcho,
    CloseTag,
    InlineHtml,

    // Trivia
    Whitespace,
    Comment,
    DocCommentOpenTag,
    DocCommentCloseTag,
    DocCommentStar,
    DocCommentTag,
    DocCommentString,
    DocCommentWhitespace,

    // Names and literals
    Variable,
    Identifier,
    NsSeparator,
    ConstantEncapsedString,
    LNumber,
    DNumber,
    True,
    False,
    Null,

    // Declarations
    Class,
    AnonClass,
    Interface,
    Trait,
    Function,
    Closure,
    Fn,
    Const,
    Use,
    Namespace,
    Declare,
    Extends,
    Implements,

    // Modifiers
    Abstract,
    Final,
    Static,
    Public,
    Protected,
    Private,
    Var,
    Readonly,

    // Control flow and language constructs
    If,
    Else,
    ElseIf,
    While,
    Do,
    For,
    Foreach,
    As,
    Switch,
    Case,
    Default,
    Try,
    Catch,
    Finally,
    Match,
    Return,
    Yield,
    YieldFrom,
    New,
    Array,
    List,
    Isset,
    Empty,
    Unset,
    Echo,
    Print,
    Instanceof,
    SelfKw,
    Parent,
    Callable,
    /// Any other reserved word (`global`, `throw`, `break`, ...)
    Keyword,

    // Brackets
    OpenCurlyBracket,
    CloseCurlyBracket,
    OpenParenthesis,
    CloseParenthesis,
    OpenSquareBracket,
    CloseSquareBracket,

    // Punctuation
    Semicolon,
    Comma,
    Colon,
    DoubleColon,
    ObjectOperator,
    NullsafeObjectOperator,
    Question,
    Ampersand,
    BitwiseOr,

    // Assignment operators
    Equal,
    PlusEqual,
    MinusEqual,
    MulEqual,
    DivEqual,
    ConcatEqual,
    ModEqual,
    PowEqual,
    AndEqual,
    OrEqual,
    XorEqual,
    SlEqual,
    SrEqual,
    CoalesceEqual,
    DoubleArrow,

    // Other operators
    Coalesce,
    Spaceship,
    /// Any other operator (`+`, `===`, `&&`, `.`, ...)
    Operator,

    /// Anything the lexer could not classify
    Unknown,
}

impl TokenKind {
    /// PHP_CodeSniffer-style type name, used when no printable name exists
    pub fn type_name(&self) -> &'static str {
        match self {
            TokenKind::OpenTag => "T_OPEN_TAG",
            TokenKind::OpenTagWithEcho => "T_OPEN_TAG_WITH_ECHO",
            TokenKind::CloseTag => "T_CLOSE_TAG",
            TokenKind::InlineHtml => "T_INLINE_HTML",
            TokenKind::Whitespace => "T_WHITESPACE",
            TokenKind::Comment => "T_COMMENT",
            TokenKind::DocCommentOpenTag => "T_DOC_COMMENT_OPEN_TAG",
            TokenKind::DocCommentCloseTag => "T_DOC_COMMENT_CLOSE_TAG",
            TokenKind::DocCommentStar => "T_DOC_COMMENT_STAR",
            TokenKind::DocCommentTag => "T_DOC_COMMENT_TAG",
            TokenKind::DocCommentString => "T_DOC_COMMENT_STRING",
            TokenKind::DocCommentWhitespace => "T_DOC_COMMENT_WHITESPACE",
            TokenKind::Variable => "T_VARIABLE",
            TokenKind::Identifier => "T_STRING",
            TokenKind::NsSeparator => "T_NS_SEPARATOR",
            TokenKind::ConstantEncapsedString => "T_CONSTANT_ENCAPSED_STRING",
            TokenKind::LNumber => "T_LNUMBER",
            TokenKind::DNumber => "T_DNUMBER",
            TokenKind::True => "T_TRUE",
            TokenKind::False => "T_FALSE",
            TokenKind::Null => "T_NULL",
            TokenKind::Class => "T_CLASS",
            TokenKind::AnonClass => "T_ANON_CLASS",
            TokenKind::Interface => "T_INTERFACE",
            TokenKind::Trait => "T_TRAIT",
            TokenKind::Function => "T_FUNCTION",
            TokenKind::Closure => "T_CLOSURE",
            TokenKind::Fn => "T_FN",
            TokenKind::Const => "T_CONST",
            TokenKind::Use => "T_USE",
            TokenKind::Namespace => "T_NAMESPACE",
            TokenKind::Declare => "T_DECLARE",
            TokenKind::Extends => "T_EXTENDS",
            TokenKind::Implements => "T_IMPLEMENTS",
            TokenKind::Abstract => "T_ABSTRACT",
            TokenKind::Final => "T_FINAL",
            TokenKind::Static => "T_STATIC",
            TokenKind::Public => "T_PUBLIC",
            TokenKind::Protected => "T_PROTECTED",
            TokenKind::Private => "T_PRIVATE",
            TokenKind::Var => "T_VAR",
            TokenKind::Readonly => "T_READONLY",
            TokenKind::If => "T_IF",
            TokenKind::Else => "T_ELSE",
            TokenKind::ElseIf => "T_ELSEIF",
            TokenKind::While => "T_WHILE",
            TokenKind::Do => "T_DO",
            TokenKind::For => "T_FOR",
            TokenKind::Foreach => "T_FOREACH",
            TokenKind::As => "T_AS",
            TokenKind::Switch => "T_SWITCH",
            TokenKind::Case => "T_CASE",
            TokenKind::Default => "T_DEFAULT",
            TokenKind::Try => "T_TRY",
            TokenKind::Catch => "T_CATCH",
            TokenKind::Finally => "T_FINALLY",
            TokenKind::Match => "T_MATCH",
            TokenKind::Return => "T_RETURN",
            TokenKind::Yield => "T_YIELD",
            TokenKind::YieldFrom => "T_YIELD_FROM",
            TokenKind::New => "T_NEW",
            TokenKind::Array => "T_ARRAY",
            TokenKind::List => "T_LIST",
            TokenKind::Isset => "T_ISSET",
            TokenKind::Empty => "T_EMPTY",
            TokenKind::Unset => "T_UNSET",
            TokenKind::Echo => "T_ECHO",
            TokenKind::Print => "T_PRINT",
            TokenKind::Instanceof => "T_INSTANCEOF",
            TokenKind::SelfKw => "T_SELF",
            TokenKind::Parent => "T_PARENT",
            TokenKind::Callable => "T_CALLABLE",
            TokenKind::Keyword => "T_KEYWORD",
            TokenKind::OpenCurlyBracket => "T_OPEN_CURLY_BRACKET",
            TokenKind::CloseCurlyBracket => "T_CLOSE_CURLY_BRACKET",
            TokenKind::OpenParenthesis => "T_OPEN_PARENTHESIS",
            TokenKind::CloseParenthesis => "T_CLOSE_PARENTHESIS",
            TokenKind::OpenSquareBracket => "T_OPEN_SQUARE_BRACKET",
            TokenKind::CloseSquareBracket => "T_CLOSE_SQUARE_BRACKET",
            TokenKind::Semicolon => "T_SEMICOLON",
            TokenKind::Comma => "T_COMMA",
            TokenKind::Colon => "T_COLON",
            TokenKind::DoubleColon => "T_DOUBLE_COLON",
            TokenKind::ObjectOperator => "T_OBJECT_OPERATOR",
            TokenKind::NullsafeObjectOperator => "T_NULLSAFE_OBJECT_OPERATOR",
            TokenKind::Question => "T_INLINE_THEN",
            TokenKind::Ampersand => "T_BITWISE_AND",
            TokenKind::BitwiseOr => "T_BITWISE_OR",
            TokenKind::Equal => "T_EQUAL",
            TokenKind::PlusEqual => "T_PLUS_EQUAL",
            TokenKind::MinusEqual => "T_MINUS_EQUAL",
            TokenKind::MulEqual => "T_MUL_EQUAL",
            TokenKind::DivEqual => "T_DIV_EQUAL",
            TokenKind::ConcatEqual => "T_CONCAT_EQUAL",
            TokenKind::ModEqual => "T_MOD_EQUAL",
            TokenKind::PowEqual => "T_POW_EQUAL",
            TokenKind::AndEqual => "T_AND_EQUAL",
            TokenKind::OrEqual => "T_OR_EQUAL",
            TokenKind::XorEqual => "T_XOR_EQUAL",
            TokenKind::SlEqual => "T_SL_EQUAL",
            TokenKind::SrEqual => "T_SR_EQUAL",
            TokenKind::CoalesceEqual => "T_COALESCE_EQUAL",
            TokenKind::DoubleArrow => "T_DOUBLE_ARROW",
            TokenKind::Coalesce => "T_COALESCE",
            TokenKind::Spaceship => "T_SPACESHIP",
            TokenKind::Operator => "T_OPERATOR",
            TokenKind::Unknown => "T_UNKNOWN",
        }
    }

    /// Human-readable name for user output, falling back to the type name
    pub fn printable_name(&self) -> &'static str {
        match self {
            TokenKind::OpenTag => "PHP opening tag",
            TokenKind::CloseTag => "PHP closing tag",
            TokenKind::Declare => "declare statement",
            TokenKind::Namespace => "namespace declaration",
            TokenKind::Use => "use statement",
            TokenKind::CloseParenthesis => "closing parenthesis",
            TokenKind::DocCommentCloseTag => "docblock",
            TokenKind::Comment => "comment",
            TokenKind::Class => "class",
            TokenKind::OpenCurlyBracket => "opening curly bracket \"{\"",
            TokenKind::CloseCurlyBracket => "closing curly bracket \"}\"",
            TokenKind::OpenParenthesis => "opening parenthesis \"(\"",
            TokenKind::Variable => "variable or property",
            TokenKind::Function => "function",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Comma => "comma",
            TokenKind::Equal => "equal sign",
            TokenKind::Const => "constant",
            other => other.type_name(),
        }
    }

    /// Whitespace, comments and doc comment parts
    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::DocCommentOpenTag
                | TokenKind::DocCommentCloseTag
                | TokenKind::DocCommentStar
                | TokenKind::DocCommentTag
                | TokenKind::DocCommentString
                | TokenKind::DocCommentWhitespace
        )
    }

    /// Operators that assign to their left operand, including `=>`
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::PlusEqual
                | TokenKind::MinusEqual
                | TokenKind::MulEqual
                | TokenKind::DivEqual
                | TokenKind::ConcatEqual
                | TokenKind::ModEqual
                | TokenKind::PowEqual
                | TokenKind::AndEqual
                | TokenKind::OrEqual
                | TokenKind::XorEqual
                | TokenKind::SlEqual
                | TokenKind::SrEqual
                | TokenKind::CoalesceEqual
                | TokenKind::DoubleArrow
        )
    }

    /// Tokens that own a `{ ... }` scope
    pub fn is_scope_opener(&self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::AnonClass
                | TokenKind::Interface
                | TokenKind::Trait
                | TokenKind::Namespace
                | TokenKind::Function
                | TokenKind::Closure
                | TokenKind::If
                | TokenKind::Switch
                | TokenKind::Case
                | TokenKind::Declare
                | TokenKind::Default
                | TokenKind::While
                | TokenKind::Else
                | TokenKind::ElseIf
                | TokenKind::For
                | TokenKind::Foreach
                | TokenKind::Do
                | TokenKind::Try
                | TokenKind::Catch
                | TokenKind::Finally
                | TokenKind::Use
                | TokenKind::Match
        )
    }

    /// Visibility modifiers
    pub fn is_scope_modifier(&self) -> bool {
        matches!(self, TokenKind::Public | TokenKind::Protected | TokenKind::Private)
    }

    /// Class-like declarations whose body holds members
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            TokenKind::Class | TokenKind::AnonClass | TokenKind::Interface | TokenKind::Trait
        )
    }
}

/// A single lexical token with position and structural links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
    /// Byte offset of the token in the source
    pub offset: usize,
    /// Matching bracket, parenthesis or doc comment partner
    pub bracket: Option<usize>,
    /// Set on scope owners and on the braces delimiting their scope
    pub scope_opener: Option<usize>,
    pub scope_closer: Option<usize>,
    /// Owner of a parenthesis pair (`if`, `function`, `declare`, ...)
    pub parenthesis_owner: Option<usize>,
    /// Enclosing scope owners, outermost first
    pub conditions: Vec<usize>,
    /// Enclosing parenthesis openers, outermost first
    pub nested_parentheses: Vec<usize>,
}

impl Token {
    /// Create an unlinked token; links are computed by [`crate::TokenStream::new`]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
            offset,
            bracket: None,
            scope_opener: None,
            scope_closer: None,
            parenthesis_owner: None,
            conditions: Vec::new(),
            nested_parentheses: Vec::new(),
        }
    }

    /// Width in characters
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }

    /// Byte offset just past the token
    pub fn end_offset(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Whether this token is (part of) a line break
    pub fn ends_line(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// Whether the token contains anything but spaces and tabs
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(|c| c == ' ' || c == '\t')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_name_falls_back_to_type() {
        assert_eq!(TokenKind::Variable.printable_name(), "variable or property");
        assert_eq!(TokenKind::Identifier.printable_name(), "T_STRING");
    }

    #[test]
    fn test_assignment_kinds() {
        assert!(TokenKind::Equal.is_assignment());
        assert!(TokenKind::DoubleArrow.is_assignment());
        assert!(!TokenKind::Coalesce.is_assignment());
    }

    #[test]
    fn test_token_width_counts_chars() {
        let token = Token::new(TokenKind::ConstantEncapsedString, "'äb'", 1, 1, 0);
        assert_eq!(token.width(), 4);
        assert_eq!(token.end_offset(), 5);
    }
}
