use csu_core::{Search, TokenKind, TokenStream};

use super::{is_short_array, owned_parentheses, positions, starts_statement, VersionTier};
use crate::utils::members::{method_parameters, return_type};

pub(super) static TIER: VersionTier = VersionTier {
    version: "7.1",
    probes: &[
        ("nullable or iterable type hints", uses_iterable_or_nullable_type_hint),
        ("void or iterable return types", uses_void_or_iterable_return_type),
        ("array destructuring", uses_array_destructuring),
        ("foreach destructuring", uses_foreach_destructuring),
        ("class constant visibility", uses_const_visibility),
        ("multi-catch", uses_multiple_exception_catch),
    ],
};

const FUNCTIONS: &[TokenKind] = &[TokenKind::Function, TokenKind::Closure];

fn uses_iterable_or_nullable_type_hint(stream: &TokenStream) -> bool {
    positions(stream, FUNCTIONS).any(|function| {
        method_parameters(stream, function)
            .iter()
            .any(|parameter| parameter.nullable || parameter.type_hint.as_deref() == Some("iterable"))
    })
}

fn uses_void_or_iterable_return_type(stream: &TokenStream) -> bool {
    positions(stream, FUNCTIONS)
        .filter_map(|function| return_type(stream, function))
        .any(|ty| ty.name == "void" || ty.name == "iterable")
}

/// `[$a, $b] = $pair;`
fn uses_array_destructuring(stream: &TokenStream) -> bool {
    positions(stream, &[TokenKind::CloseSquareBracket]).any(|closer| {
        let assigned = stream
            .next_non_empty(closer)
            .is_some_and(|next| stream.kind(next) == TokenKind::Equal);
        assigned && stream[closer].bracket.is_some_and(|opener| starts_statement(stream, opener))
    })
}

/// `foreach ($pairs as [$a, $b])`
fn uses_foreach_destructuring(stream: &TokenStream) -> bool {
    positions(stream, &[TokenKind::Foreach]).any(|foreach| {
        let Some((opener, closer)) = owned_parentheses(stream, foreach) else {
            return false;
        };
        let Some(as_ptr) = stream.find_next(&[TokenKind::As], opener, Search::new().until(closer)) else {
            return false;
        };
        (as_ptr..closer).any(|i| stream.kind(i) == TokenKind::List || is_short_array(stream, i))
    })
}

/// `protected const A = 1;`
fn uses_const_visibility(stream: &TokenStream) -> bool {
    positions(stream, &[TokenKind::Const]).any(|constant| {
        let mut ptr = constant;
        while let Some(prev) = stream.previous_non_empty(ptr) {
            match stream.kind(prev) {
                TokenKind::Public | TokenKind::Protected | TokenKind::Private => return true,
                TokenKind::Final | TokenKind::Abstract => ptr = prev,
                _ => break,
            }
        }
        false
    })
}

/// `catch (A | B $e)`
fn uses_multiple_exception_catch(stream: &TokenStream) -> bool {
    positions(stream, &[TokenKind::Catch]).any(|catch| {
        owned_parentheses(stream, catch).is_some_and(|(opener, closer)| {
            stream
                .find_next(&[TokenKind::BitwiseOr], opener, Search::new().until(closer))
                .is_some()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(source: &str) -> Option<&'static str> {
        TIER.used_feature(&TokenStream::from_source(source))
    }

    #[test]
    fn test_each_feature() {
        let cases = [
            ("<?php\nfunction foo(?string $x) {}\n", "nullable or iterable type hints"),
            ("<?php\nfunction foo(iterable $x) {}\n", "nullable or iterable type hints"),
            ("<?php\nfunction foo(): void {}\n", "void or iterable return types"),
            ("<?php\n[$a, $b] = $pair;\n", "array destructuring"),
            ("<?php\nforeach ($pairs as [$a, $b]) {}\n", "foreach destructuring"),
            ("<?php\nforeach ($pairs as list($a, $b)) {}\n", "foreach destructuring"),
            ("<?php\nclass A {\n    private const B = 1;\n}\n", "class constant visibility"),
            ("<?php\ntry {} catch (A | B $e) {}\n", "multi-catch"),
        ];
        for (source, expected) in cases {
            assert_eq!(feature(source), Some(expected), "{source}");
        }
    }

    #[test]
    fn test_older_code_is_not_detected() {
        let source = "<?php
class A {
    const B = 1;
    public function foo(string $x): int { return 1; }
}
$list[0] = 1;
foreach ($pairs as $key => $value) {}
try {} catch (A $e) {}
";
        assert_eq!(feature(source), None);
    }
}
