//! Casing of `true`, `false` and `null`

use csu_core::{Edit, TokenKind};

use crate::config::{to_choice, SniffProperties};
use crate::file::File;
use crate::sniffs::Sniff;
use crate::SniffError;

const CASE_MODES: &[&str] = &["upper", "ucfirst", "lower"];

/// Casing style of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Upper,
    Ucfirst,
    Lower,
}

impl Case {
    fn from_property(properties: &SniffProperties, name: &str, default: Case) -> Result<Case, SniffError> {
        let Some(raw) = properties.get(name) else {
            return Ok(default);
        };
        Ok(match to_choice(raw, name, CASE_MODES)? {
            0 => Case::Upper,
            1 => Case::Ucfirst,
            _ => Case::Lower,
        })
    }

    fn apply(&self, value: &str) -> String {
        let lower = value.to_lowercase();
        match self {
            Case::Upper => lower.to_uppercase(),
            Case::Lower => lower,
            Case::Ucfirst => {
                let mut chars = lower.chars();
                chars
                    .next()
                    .map(|first| first.to_uppercase().chain(chars).collect())
                    .unwrap_or_default()
            }
        }
    }
}

/// Enforces a consistent casing for boolean and null literals
pub struct BooleanNullSniff {
    boolean_case: Case,
    null_case: Case,
}

impl Default for BooleanNullSniff {
    fn default() -> Self {
        Self {
            boolean_case: Case::Lower,
            null_case: Case::Upper,
        }
    }
}

impl BooleanNullSniff {
    pub fn new(boolean_case: Case, null_case: Case) -> Self {
        Self {
            boolean_case,
            null_case,
        }
    }

    /// Configure from `booleanCase` and `nullCase`
    pub fn from_properties(properties: &SniffProperties) -> Result<Self, SniffError> {
        let defaults = Self::default();
        Ok(Self {
            boolean_case: Case::from_property(properties, "booleanCase", defaults.boolean_case)?,
            null_case: Case::from_property(properties, "nullCase", defaults.null_case)?,
        })
    }
}

impl Sniff for BooleanNullSniff {
    fn name(&self) -> &'static str {
        "RN.Capitalization.BooleanNULL"
    }

    fn description(&self) -> &'static str {
        "Consistent casing of true, false and null"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::True, TokenKind::False, TokenKind::Null]
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        let token = &file.stream[ptr];
        let (case, kind) = if token.kind == TokenKind::Null {
            (self.null_case, "Null")
        } else {
            (self.boolean_case, "Boolean")
        };

        let expected = case.apply(&token.text);
        if expected == token.text {
            return Ok(());
        }

        let actual = token.text.clone();
        let edit = Edit::new(token.offset, token.end_offset(), expected.clone());
        file.add_fixable_error(
            format!("Invalid boolean/null value: expected \"{expected}\", got \"{actual}\" instead."),
            ptr,
            &format!("{kind}Case"),
            vec![expected, actual],
            vec![edit],
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{codes, fix, messages};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_casing() {
        let sniff = BooleanNullSniff::default();
        let source = "<?php\n$a = [true, FALSE, null, NULL];\n";
        assert_eq!(codes(&sniff, source), vec!["BooleanCase", "NullCase"]);
        assert_eq!(
            messages(&sniff, source)[1],
            "Invalid boolean/null value: expected \"NULL\", got \"null\" instead."
        );
        assert_eq!(fix(&sniff, source), "<?php\n$a = [true, false, NULL, NULL];\n");
    }

    #[test]
    fn test_ucfirst() {
        let sniff = BooleanNullSniff::new(Case::Ucfirst, Case::Ucfirst);
        assert_eq!(fix(&sniff, "<?php\nf(TRUE, null);\n"), "<?php\nf(True, Null);\n");
    }

    #[test]
    fn test_invalid_mode() {
        let properties = SniffProperties::new().with("nullCase", "camel");
        let err = BooleanNullSniff::from_properties(&properties).err().unwrap();
        assert_eq!(
            err.to_string(),
            "invalid setting for property nullCase: expected one of upper|ucfirst|lower, got \"camel\" instead"
        );
    }

    #[test]
    fn test_member_names_are_not_literals() {
        let sniff = BooleanNullSniff::default();
        assert!(codes(&sniff, "<?php\n$a->null();\nFoo::TRUE;\n").is_empty());
    }
}
