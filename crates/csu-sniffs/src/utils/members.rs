//! Probes for class members and function signatures
//!
//! Every probe returns `None` when the token is not what it asks about, so
//! callers can skip non-members without any error handling.

use csu_core::{Search, TokenKind, TokenStream};

/// Modifiers of a member variable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberProperties {
    pub is_static: bool,
}

/// Modifiers of a function declaration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MethodProperties {
    pub is_static: bool,
    pub is_abstract: bool,
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// The parameter's variable token
    pub variable: usize,
    /// Type hint without the nullable marker, lowercased
    pub type_hint: Option<String>,
    pub nullable: bool,
}

/// Declared return type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnType {
    /// The `:` introducing the type
    pub colon: usize,
    /// Type without the nullable marker, lowercased
    pub name: String,
    pub nullable: bool,
}

/// Kinds that can make up a type declaration
pub const TYPE_KINDS: &[TokenKind] = &[
    TokenKind::Identifier,
    TokenKind::NsSeparator,
    TokenKind::Question,
    TokenKind::Array,
    TokenKind::Callable,
    TokenKind::SelfKw,
    TokenKind::Parent,
    TokenKind::Static,
    TokenKind::Null,
    TokenKind::False,
    TokenKind::True,
    TokenKind::BitwiseOr,
];

/// Owner of the innermost scope `ptr` is in
pub fn innermost_scope(stream: &TokenStream, ptr: usize) -> Option<usize> {
    stream[ptr].conditions.last().copied()
}

/// Whether `ptr` is a property declared directly in a class or trait body
pub fn is_member_var(stream: &TokenStream, ptr: usize) -> bool {
    let token = &stream[ptr];
    token.kind == TokenKind::Variable
        && token.nested_parentheses.is_empty()
        && innermost_scope(stream, ptr)
            .is_some_and(|owner| matches!(stream.kind(owner), TokenKind::Class | TokenKind::Trait))
}

pub fn member_properties(stream: &TokenStream, ptr: usize) -> Option<MemberProperties> {
    if !is_member_var(stream, ptr) {
        return None;
    }
    let statement_start = stream
        .find_previous(
            &[TokenKind::Semicolon, TokenKind::OpenCurlyBracket, TokenKind::CloseCurlyBracket],
            ptr.checked_sub(1)?,
            Search::new(),
        )
        .map_or(0, |found| found + 1);

    let mut properties = MemberProperties::default();
    for i in statement_start..ptr {
        match stream.kind(i) {
            TokenKind::Static => properties.is_static = true,
            _ => {}
        }
    }
    Some(properties)
}

pub fn method_properties(stream: &TokenStream, ptr: usize) -> Option<MethodProperties> {
    if stream.kind(ptr) != TokenKind::Function {
        return None;
    }
    let mut properties = MethodProperties::default();
    for i in (0..ptr).rev() {
        match stream.kind(i) {
            TokenKind::Static => properties.is_static = true,
            TokenKind::Abstract => properties.is_abstract = true,
            TokenKind::Final | TokenKind::Public | TokenKind::Protected | TokenKind::Private => {}
            TokenKind::Whitespace | TokenKind::Comment => {}
            _ => break,
        }
    }
    Some(properties)
}

/// Declared name of the function at `ptr`
pub fn method_name(stream: &TokenStream, ptr: usize) -> Option<&str> {
    let name = stream.find_next(
        &[TokenKind::Whitespace, TokenKind::Ampersand],
        ptr + 1,
        Search::excluding(),
    )?;
    (stream.kind(name) == TokenKind::Identifier).then(|| stream[name].text.as_str())
}

/// Opening parenthesis of the parameter list of a function, closure or arrow function
pub fn parameter_list(stream: &TokenStream, ptr: usize) -> Option<usize> {
    if !matches!(stream.kind(ptr), TokenKind::Function | TokenKind::Closure | TokenKind::Fn) {
        return None;
    }
    let opener = stream.find_next(&[TokenKind::OpenParenthesis], ptr + 1, Search::new())?;
    (stream[opener].parenthesis_owner == Some(ptr)).then_some(opener)
}

pub fn method_parameters(stream: &TokenStream, ptr: usize) -> Vec<Parameter> {
    let Some(opener) = parameter_list(stream, ptr) else {
        return Vec::new();
    };
    let Some(closer) = stream[opener].bracket else {
        return Vec::new();
    };

    let mut parameters = Vec::new();
    let mut type_hint = String::new();
    let mut nullable = false;
    let mut seen_variable = false;
    let mut i = opener + 1;

    while i < closer {
        let token = &stream[i];
        match token.kind {
            TokenKind::OpenParenthesis | TokenKind::OpenSquareBracket | TokenKind::OpenCurlyBracket => {
                i = token.bracket.unwrap_or(i);
            }
            TokenKind::Comma => {
                type_hint.clear();
                nullable = false;
                seen_variable = false;
            }
            TokenKind::Variable if !seen_variable => {
                seen_variable = true;
                parameters.push(Parameter {
                    variable: i,
                    type_hint: (!type_hint.is_empty()).then(|| type_hint.to_lowercase()),
                    nullable,
                });
            }
            TokenKind::Question if !seen_variable => nullable = true,
            kind if !seen_variable && TYPE_KINDS.contains(&kind) => type_hint.push_str(&token.text),
            _ => {}
        }
        i += 1;
    }
    parameters
}

/// Return type declared after the parameter list
pub fn return_type(stream: &TokenStream, ptr: usize) -> Option<ReturnType> {
    let opener = parameter_list(stream, ptr)?;
    let mut after = stream.next_non_empty(stream[opener].bracket?)?;

    // Closure imports come before the return type
    if stream.kind(after) == TokenKind::Use {
        let imports = stream.next_non_empty(after)?;
        after = stream.next_non_empty(stream[imports].bracket?)?;
    }
    if stream.kind(after) != TokenKind::Colon {
        return None;
    }

    let mut name = String::new();
    let mut nullable = false;
    let mut i = after + 1;
    while i < stream.len() {
        match stream.kind(i) {
            TokenKind::Question => nullable = true,
            kind if TYPE_KINDS.contains(&kind) => name.push_str(&stream[i].text),
            kind if kind.is_empty() => {}
            _ => break,
        }
        i += 1;
    }

    (!name.is_empty()).then(|| ReturnType {
        colon: after,
        name: name.to_lowercase(),
        nullable,
    })
}

/// Whether `ptr` is a `use` importing traits into a class body
pub fn is_trait_import(stream: &TokenStream, ptr: usize) -> bool {
    stream.kind(ptr) == TokenKind::Use
        && innermost_scope(stream, ptr).is_some_and(|owner| stream.kind(owner).is_class_like())
        && stream
            .next_non_empty(ptr)
            .is_some_and(|next| stream.kind(next) != TokenKind::OpenParenthesis)
}
