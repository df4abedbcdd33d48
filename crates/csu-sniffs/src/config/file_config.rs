//! Per-file sniff configuration read from doc comment annotations
//!
//! A file can switch sniffs off for itself:
//!
//! ```php
//! /**
//!  * @codingStandardsIgnoreRule RN.Spacing.Use, RN.Classes.MemberOrdering
//!  */
//! ```

use csu_core::{TokenKind, TokenStream};

/// Doc comment tag listing sniffs to disable
pub const IGNORE_RULE_TAG: &str = "@codingStandardsIgnoreRule";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub disabled_sniffs: Vec<String>,
}

impl FileConfig {
    /// Collect every sniff name listed after an ignore tag
    pub fn from_stream(stream: &TokenStream) -> Self {
        let mut config = FileConfig::default();

        for (tag, token) in stream.tokens().iter().enumerate() {
            if token.kind != TokenKind::DocCommentTag || token.text != IGNORE_RULE_TAG {
                continue;
            }
            for i in stream.line_range(token.line).filter(|&i| i > tag) {
                if stream[i].kind != TokenKind::DocCommentString {
                    continue;
                }
                config.disabled_sniffs.extend(
                    stream[i]
                        .text
                        .split([' ', ',', ';', '|'])
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                );
            }
        }

        config
    }

    /// Whether `sniff` is listed, with or without a `Sniff` suffix
    pub fn disables(&self, sniff: &str) -> bool {
        let other = match sniff.strip_suffix("Sniff") {
            Some(stripped) => stripped.to_string(),
            None => format!("{sniff}Sniff"),
        };
        self.disabled_sniffs.iter().any(|name| name == sniff || *name == other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_split_on_separators() {
        let stream = TokenStream::from_source(
            "<?php\n/**\n * @codingStandardsIgnoreRule RN.Spacing.Use,RN.Spacing.Class|RN.Spacing.ConstSniff\n */\n",
        );
        let config = FileConfig::from_stream(&stream);
        assert_eq!(
            config.disabled_sniffs,
            vec!["RN.Spacing.Use", "RN.Spacing.Class", "RN.Spacing.ConstSniff"]
        );
    }

    #[test]
    fn test_disables_matches_sniff_suffix() {
        let config = FileConfig {
            disabled_sniffs: vec!["RN.Spacing.ConstSniff".into(), "RN.Spacing.Use".into()],
        };
        assert!(config.disables("RN.Spacing.Const"));
        assert!(config.disables("RN.Spacing.Use"));
        assert!(config.disables("RN.Spacing.UseSniff"));
        assert!(!config.disables("RN.Spacing.Class"));
    }

    #[test]
    fn test_other_tags_are_ignored() {
        let stream = TokenStream::from_source("<?php\n/**\n * @author RN.Spacing.Use\n */\n");
        assert!(FileConfig::from_stream(&stream).disabled_sniffs.is_empty());
    }
}
