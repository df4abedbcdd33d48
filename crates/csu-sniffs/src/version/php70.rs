use csu_core::{Search, TokenKind, TokenStream};

use super::{contains_kind, has_array_literal, owned_parentheses, positions, starts_statement, VersionTier};
use crate::utils::members::{method_parameters, return_type};

pub(super) static TIER: VersionTier = VersionTier {
    version: "7.0",
    probes: &[
        ("strict_types declare", uses_declare_strict),
        ("scalar type hints", uses_scalar_type_hints),
        ("return types", uses_return_types),
        ("null coalescing", uses_null_coalescing),
        ("spaceship operator", uses_spaceship),
        ("constant array define", uses_array_defines),
        ("anonymous classes", uses_anonymous_classes),
        ("grouped imports", uses_grouped_imports),
        ("generator return", uses_generator_return),
        ("generator delegation", uses_generator_delegation),
    ],
};

const SCALAR_TYPES: &[&str] = &["string", "int", "float", "bool"];
const FUNCTIONS: &[TokenKind] = &[TokenKind::Function, TokenKind::Closure];

/// `declare(strict_types=1);`
fn uses_declare_strict(stream: &TokenStream) -> bool {
    positions(stream, &[TokenKind::Declare]).any(|declare| {
        owned_parentheses(stream, declare).is_some_and(|(opener, closer)| {
            stream
                .find_next(&[TokenKind::Identifier], opener, Search::new().until(closer))
                .is_some_and(|directive| stream[directive].text.eq_ignore_ascii_case("strict_types"))
        })
    })
}

/// `function (int $x) {}`
fn uses_scalar_type_hints(stream: &TokenStream) -> bool {
    positions(stream, FUNCTIONS).any(|function| {
        method_parameters(stream, function)
            .iter()
            .any(|parameter| parameter.type_hint.as_deref().is_some_and(|hint| SCALAR_TYPES.contains(&hint)))
    })
}

/// `function foo(): int {}`
fn uses_return_types(stream: &TokenStream) -> bool {
    positions(stream, FUNCTIONS).any(|function| return_type(stream, function).is_some())
}

fn uses_null_coalescing(stream: &TokenStream) -> bool {
    contains_kind(stream, TokenKind::Coalesce)
}

fn uses_spaceship(stream: &TokenStream) -> bool {
    contains_kind(stream, TokenKind::Spaceship)
}

/// `define('BITS', [0, 1]);`
fn uses_array_defines(stream: &TokenStream) -> bool {
    positions(stream, &[TokenKind::OpenParenthesis]).any(|opener| {
        let Some(name) = stream.previous_non_empty(opener) else {
            return false;
        };
        let Some(closer) = stream[opener].bracket else {
            return false;
        };
        stream.kind(name) == TokenKind::Identifier
            && stream[name].text == "define"
            && starts_statement(stream, name)
            && has_array_literal(stream, opener + 1, closer)
    })
}

/// `new class {}`
fn uses_anonymous_classes(stream: &TokenStream) -> bool {
    contains_kind(stream, TokenKind::AnonClass)
}

/// `use A\{B, C};`
fn uses_grouped_imports(stream: &TokenStream) -> bool {
    positions(stream, &[TokenKind::Use]).any(|import| {
        let closure_import = stream
            .next_non_empty(import)
            .is_some_and(|next| stream.kind(next) == TokenKind::OpenParenthesis);
        if !stream[import].conditions.is_empty() || closure_import {
            return false;
        }
        let Some(end) = stream.find_next(&[TokenKind::Semicolon], import, Search::new()) else {
            return false;
        };
        stream
            .find_next(&[TokenKind::OpenCurlyBracket], import, Search::new().until(end))
            .is_some()
    })
}

/// `return` in a function body that also yields
fn uses_generator_return(stream: &TokenStream) -> bool {
    positions(stream, &[TokenKind::Yield, TokenKind::YieldFrom]).any(|yield_ptr| {
        let Some(&function) = stream[yield_ptr]
            .conditions
            .iter()
            .rev()
            .find(|&&owner| FUNCTIONS.contains(&stream.kind(owner)))
        else {
            return false;
        };
        // Nested closures are not told apart from their enclosing function
        stream[function].scope_closer.is_some_and(|closer| {
            stream
                .find_next(&[TokenKind::Return], yield_ptr + 1, Search::new().until(closer))
                .is_some()
        })
    })
}

/// `yield from $other;`
fn uses_generator_delegation(stream: &TokenStream) -> bool {
    contains_kind(stream, TokenKind::YieldFrom)
}
