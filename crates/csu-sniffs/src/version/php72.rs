use csu_core::{TokenKind, TokenStream};

use super::{positions, VersionTier};
use crate::utils::members::method_parameters;

pub(super) static TIER: VersionTier = VersionTier {
    version: "7.2",
    probes: &[("object type hint", uses_object_type_hint)],
};

fn uses_object_type_hint(stream: &TokenStream) -> bool {
    positions(stream, &[TokenKind::Function, TokenKind::Closure]).any(|function| {
        method_parameters(stream, function)
            .iter()
            .any(|parameter| parameter.type_hint.as_deref() == Some("object"))
    })
}
