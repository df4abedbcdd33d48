//! Ordering of class members by category weight

use csu_core::{TokenKind, TokenStream};
use tracing::trace;

use crate::config::SniffProperties;
use crate::file::File;
use crate::utils::members::{innermost_scope, is_trait_import, member_properties, method_name, method_properties};
use crate::SniffError;

/// Kind of class member, as far as ordering is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberCategory {
    Constant,
    TraitUse,
    StaticProperty,
    StaticMethod,
    InstanceProperty,
    Constructor,
    InstanceMethod,
}

impl MemberCategory {
    pub const ALL: [MemberCategory; 7] = [
        MemberCategory::Constant,
        MemberCategory::TraitUse,
        MemberCategory::StaticProperty,
        MemberCategory::StaticMethod,
        MemberCategory::InstanceProperty,
        MemberCategory::Constructor,
        MemberCategory::InstanceMethod,
    ];

    /// Name used in messages
    pub fn plural(&self) -> &'static str {
        match self {
            MemberCategory::Constant => "constants",
            MemberCategory::TraitUse => "trait imports",
            MemberCategory::StaticProperty => "static properties",
            MemberCategory::StaticMethod => "static methods",
            MemberCategory::InstanceProperty => "instance properties",
            MemberCategory::Constructor => "constructor",
            MemberCategory::InstanceMethod => "instance methods",
        }
    }

    /// Prefix of the `...TooLate` diagnostic code
    pub fn code_prefix(&self) -> &'static str {
        match self {
            MemberCategory::Constant => "Const",
            MemberCategory::TraitUse => "TraitUse",
            MemberCategory::StaticProperty => "StaticProperty",
            MemberCategory::StaticMethod => "StaticMethod",
            MemberCategory::InstanceProperty => "InstanceProperty",
            MemberCategory::Constructor => "Constructor",
            MemberCategory::InstanceMethod => "InstanceMethod",
        }
    }

    /// Sniff property holding the weight
    pub fn property(&self) -> &'static str {
        match self {
            MemberCategory::Constant => "constOrder",
            MemberCategory::TraitUse => "traitUseOrder",
            MemberCategory::StaticProperty => "staticPropertyOrder",
            MemberCategory::StaticMethod => "staticMethodOrder",
            MemberCategory::InstanceProperty => "instancePropertyOrder",
            MemberCategory::Constructor => "constructorOrder",
            MemberCategory::InstanceMethod => "instanceMethodOrder",
        }
    }

    pub fn default_weight(&self) -> i64 {
        match self {
            MemberCategory::Constant => 10,
            MemberCategory::TraitUse => 15,
            MemberCategory::StaticProperty => 20,
            MemberCategory::StaticMethod => 30,
            MemberCategory::InstanceProperty => 40,
            MemberCategory::Constructor => 45,
            MemberCategory::InstanceMethod => 50,
        }
    }

    /// Category of the token at `ptr` if it declares a class or trait member
    pub fn of(stream: &TokenStream, ptr: usize) -> Option<MemberCategory> {
        let owner = innermost_scope(stream, ptr)?;
        if !matches!(stream.kind(owner), TokenKind::Class | TokenKind::Trait) {
            return None;
        }

        match stream.kind(ptr) {
            TokenKind::Const => Some(MemberCategory::Constant),
            TokenKind::Use if is_trait_import(stream, ptr) => Some(MemberCategory::TraitUse),
            TokenKind::Variable => member_properties(stream, ptr).map(|properties| {
                if properties.is_static {
                    MemberCategory::StaticProperty
                } else {
                    MemberCategory::InstanceProperty
                }
            }),
            TokenKind::Function => {
                let properties = method_properties(stream, ptr)?;
                Some(if properties.is_static {
                    MemberCategory::StaticMethod
                } else if method_name(stream, ptr) == Some("__construct") {
                    MemberCategory::Constructor
                } else {
                    MemberCategory::InstanceMethod
                })
            }
            _ => None,
        }
    }
}

/// Category weights, lowest first
#[derive(Debug, Clone)]
pub struct MemberOrdering {
    weights: Vec<(MemberCategory, i64)>,
}

impl Default for MemberOrdering {
    fn default() -> Self {
        Self::with_weights(MemberCategory::ALL.iter().map(|c| (*c, c.default_weight())).collect())
    }
}

impl MemberOrdering {
    /// Read and validate the `...Order` properties
    pub fn from_properties(properties: &SniffProperties) -> Result<Self, SniffError> {
        let weights = MemberCategory::ALL
            .iter()
            .map(|category| Ok((*category, properties.weight(category.property(), category.default_weight())?)))
            .collect::<Result<Vec<_>, SniffError>>()?;
        Ok(Self::with_weights(weights))
    }

    fn with_weights(mut weights: Vec<(MemberCategory, i64)>) -> Self {
        weights.sort_by_key(|&(_, weight)| weight);
        Self { weights }
    }

    pub fn weight(&self, category: MemberCategory) -> i64 {
        self.weights
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(category.default_weight(), |&(_, weight)| weight)
    }

    /// Report the member at `member` if a member that should follow it comes first
    pub fn check(&self, file: &mut File<'_>, member: usize) {
        let stream = file.stream;
        let Some(category) = MemberCategory::of(stream, member) else {
            return;
        };
        let weight = self.weight(category);

        let misplaced = self
            .weights
            .iter()
            .filter(|&&(_, other_weight)| other_weight > weight)
            .map(|&(other, _)| other)
            .find(|&other| has_preceding(stream, member, other));

        trace!(member, ?category, ?misplaced, "checked member ordering");

        if let Some(other) = misplaced {
            file.add_error(
                format!("{} must be declared before any {}", category.plural(), other.plural()),
                member,
                &format!("{}TooLate", category.code_prefix()),
                vec![category.plural().to_string(), other.plural().to_string()],
            );
        }
    }
}

/// Whether a member of `category` is declared before `member` in the same body
fn has_preceding(stream: &TokenStream, member: usize, category: MemberCategory) -> bool {
    let Some(owner) = innermost_scope(stream, member) else {
        return false;
    };
    let Some(opener) = stream[owner].scope_opener else {
        return false;
    };
    (opener + 1..member)
        .filter(|&i| innermost_scope(stream, i) == Some(owner))
        .any(|i| MemberCategory::of(stream, i) == Some(category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunContext;
    use csu_core::Report;
    use pretty_assertions::assert_eq;

    fn run(ordering: &MemberOrdering, source: &str) -> Vec<(String, String)> {
        let stream = TokenStream::from_source(source);
        let mut report = Report::new();
        let mut context = RunContext::default();
        let mut file = File::new("test.php", &stream, &mut report, &mut context);
        for i in 0..stream.len() {
            ordering.check(&mut file, i);
        }
        report
            .into_diagnostics()
            .into_iter()
            .map(|d| (d.code, d.message))
            .collect()
    }

    const ORDERED: &str = "<?php
class A {
    const X = 1;
    use T;
    public static $s;
    public static function make() {}
    public $i;
    public function __construct() {}
    public function run($arg) { $local = 1; }
}
";

    #[test]
    fn test_default_order_is_accepted() {
        assert!(run(&MemberOrdering::default(), ORDERED).is_empty());
    }

    #[test]
    fn test_swapped_members_report_once() {
        let source = "<?php
class A {
    const X = 1;
    public static $s;
    public $i;
    public static function make() {}
    public function run() {}
}
";
        assert_eq!(
            run(&MemberOrdering::default(), source),
            vec![(
                "StaticMethodTooLate".to_string(),
                "static methods must be declared before any instance properties".to_string()
            )]
        );
    }

    #[test]
    fn test_first_later_category_by_weight_is_named() {
        let source = "<?php
class A {
    public function run() {}
    public $i;
    const X = 1;
}
";
        let diagnostics = run(&MemberOrdering::default(), source);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].0, "InstancePropertyTooLate");
        assert_eq!(diagnostics[1].1, "constants must be declared before any instance properties");
    }

    #[test]
    fn test_custom_weights() {
        let properties = SniffProperties::new().with("constOrder", "60");
        let ordering = MemberOrdering::from_properties(&properties).unwrap();
        let source = "<?php\nclass A {\n    public function run() {}\n    const X = 1;\n}\n";
        assert!(run(&ordering, source).is_empty());

        let diagnostics = run(&ordering, ORDERED);
        assert!(diagnostics.iter().all(|(code, _)| code != "ConstTooLate"));
        assert!(diagnostics.iter().any(|(code, _)| code == "TraitUseTooLate"));
    }

    #[test]
    fn test_invalid_weight_is_fatal() {
        let properties = SniffProperties::new().with("staticMethodOrder", "soon");
        assert!(matches!(
            MemberOrdering::from_properties(&properties),
            Err(SniffError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_members_of_nested_classes_are_separate() {
        let source = "<?php
class A {
    public $i;
    public function make() {
        return new class {
            const X = 1;
        };
    }
}
class B {
    const Y = 2;
}
";
        assert!(run(&MemberOrdering::default(), source).is_empty());
    }

    #[test]
    fn test_categories() {
        let stream = TokenStream::from_source(ORDERED);
        let categories: Vec<MemberCategory> = (0..stream.len())
            .filter_map(|i| MemberCategory::of(&stream, i))
            .collect();
        assert_eq!(categories, MemberCategory::ALL.to_vec());
    }
}
