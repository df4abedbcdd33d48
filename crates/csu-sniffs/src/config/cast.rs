//! Casting of string-valued sniff properties

use crate::SniffError;

const TRUE_VALUES: &[&str] = &["true", "yes", "1", "y"];
const FALSE_VALUES: &[&str] = &["false", "no", "0", "n"];

/// Parse a boolean property: `true|yes|1|y` or `false|no|0|n`, case-insensitive
pub fn to_bool(raw: &str, property: &str) -> Result<bool, SniffError> {
    let value = raw.trim().to_lowercase();
    if TRUE_VALUES.contains(&value.as_str()) {
        Ok(true)
    } else if FALSE_VALUES.contains(&value.as_str()) {
        Ok(false)
    } else {
        Err(SniffError::InvalidBoolean {
            property: property.to_string(),
            value: raw.to_string(),
        })
    }
}

/// Parse an integer ordering weight
pub fn to_weight(raw: &str, property: &str) -> Result<i64, SniffError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SniffError::invalid_property(property, raw, "a number"))
}

/// Validate one of a fixed set of keywords, returning its position in `allowed`
pub fn to_choice(raw: &str, property: &str, allowed: &[&str]) -> Result<usize, SniffError> {
    allowed
        .iter()
        .position(|candidate| *candidate == raw)
        .ok_or_else(|| SniffError::invalid_property(property, raw, &format!("one of {}", allowed.join("|"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bool_accepts_aliases() {
        for raw in ["true", "YES", " 1 ", "y"] {
            assert_eq!(to_bool(raw, "flag"), Ok(true), "{raw}");
        }
        for raw in ["false", "No", "0", "N "] {
            assert_eq!(to_bool(raw, "flag"), Ok(false), "{raw}");
        }
    }

    #[test]
    fn test_to_bool_rejects_other_values() {
        let err = to_bool("maybe", "requireAuthorEmail").unwrap_err();
        assert_eq!(err.to_string(), "invalid requireAuthorEmail property value \"maybe\"");
    }

    #[test]
    fn test_to_weight() {
        assert_eq!(to_weight(" 35 ", "constOrder"), Ok(35));
        assert!(matches!(
            to_weight("first", "constOrder"),
            Err(SniffError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_to_choice_message() {
        let err = to_choice("camel", "nullCase", &["upper", "ucfirst", "lower"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid setting for property nullCase: expected one of upper|ucfirst|lower, got \"camel\" instead"
        );
    }
}
