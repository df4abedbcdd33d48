//! Sniff configuration: string-valued properties, run options and the
//! per-run context that caches per-file state

mod cast;
mod file_config;

pub use cast::{to_bool, to_choice, to_weight};
pub use file_config::{FileConfig, IGNORE_RULE_TAG};

use std::collections::HashMap;

use csu_core::TokenStream;
use serde::Deserialize;
use tracing::debug;

use crate::version;
use crate::SniffError;

/// Properties of one sniff as they arrive from configuration: plain strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SniffProperties {
    values: HashMap<String, String>,
}

impl SniffProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Integer weight, or `default` when unset
    pub fn weight(&self, name: &str, default: i64) -> Result<i64, SniffError> {
        self.get(name).map_or(Ok(default), |raw| to_weight(raw, name))
    }

    /// Boolean flag, or `default` when unset
    pub fn boolean(&self, name: &str, default: bool) -> Result<bool, SniffError> {
        self.get(name).map_or(Ok(default), |raw| to_bool(raw, name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SniffProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Options that apply to every sniff of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Ignore `@codingStandardsIgnoreRule` annotations
    pub ignore_annotations: bool,
}

impl RunOptions {
    /// Read run options from string properties (`ignore_annotations`)
    pub fn from_properties(properties: &SniffProperties) -> Result<Self, SniffError> {
        Ok(Self {
            ignore_annotations: properties.boolean("ignore_annotations", false)?,
        })
    }
}

/// State that lives for one run and is keyed by file name
///
/// Each worker owns its own context; nothing here is shared across threads.
#[derive(Debug, Default)]
pub struct RunContext {
    options: RunOptions,
    file_configs: HashMap<String, FileConfig>,
    versions: HashMap<String, String>,
}

impl RunContext {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Annotation config of `path`, read on first access
    pub fn file_config(&mut self, path: &str, stream: &TokenStream) -> &FileConfig {
        self.file_configs.entry(path.to_string()).or_insert_with(|| {
            let config = FileConfig::from_stream(stream);
            if !config.disabled_sniffs.is_empty() {
                debug!(path, disabled = ?config.disabled_sniffs, "sniffs disabled by annotation");
            }
            config
        })
    }

    /// Whether `sniff` is switched off for `path`
    pub fn is_disabled(&mut self, path: &str, stream: &TokenStream, sniff: &str) -> bool {
        if self.options.ignore_annotations {
            return false;
        }
        self.file_config(path, stream).disables(sniff)
    }

    /// PHP version the file's features require, detected once per file
    pub fn detected_version(&mut self, path: &str, stream: &TokenStream) -> &str {
        self.versions
            .entry(path.to_string())
            .or_insert_with(|| version::detect_version(stream).to_string())
    }

    /// Drop cached state of a file whose content changed
    pub fn forget(&mut self, path: &str) {
        self.file_configs.remove(path);
        self.versions.remove(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_defaults_and_casting() {
        let props = SniffProperties::new().with("constOrder", "5").with("strict", "yes");
        assert_eq!(props.weight("constOrder", 10), Ok(5));
        assert_eq!(props.weight("staticPropertyOrder", 20), Ok(20));
        assert_eq!(props.boolean("strict", false), Ok(true));
        assert!(SniffProperties::new().with("constOrder", "x").weight("constOrder", 10).is_err());
    }

    #[test]
    fn test_run_options_from_properties() {
        assert_eq!(RunOptions::from_properties(&SniffProperties::new()), Ok(RunOptions::default()));
        let options = RunOptions::from_properties(&SniffProperties::new().with("ignore_annotations", " Y ")).unwrap();
        assert!(options.ignore_annotations);
        assert!(RunOptions::from_properties(&SniffProperties::new().with("ignore_annotations", "maybe")).is_err());
    }

    #[test]
    fn test_file_config_is_cached_per_path() {
        let disabled = TokenStream::from_source("<?php\n/**\n * @codingStandardsIgnoreRule RN.Spacing.Use\n */\n");
        let clean = TokenStream::from_source("<?php\n");
        let mut run = RunContext::default();

        assert!(run.is_disabled("a.php", &disabled, "RN.Spacing.Use"));
        // Cached: a different stream under the same name is not re-read
        assert!(run.is_disabled("a.php", &clean, "RN.Spacing.Use"));
        assert!(!run.is_disabled("b.php", &clean, "RN.Spacing.Use"));

        run.forget("a.php");
        assert!(!run.is_disabled("a.php", &clean, "RN.Spacing.Use"));
    }

    #[test]
    fn test_ignore_annotations_option() {
        let stream = TokenStream::from_source("<?php\n/**\n * @codingStandardsIgnoreRule RN.Spacing.Use\n */\n");
        let mut run = RunContext::new(RunOptions {
            ignore_annotations: true,
        });
        assert!(!run.is_disabled("a.php", &stream, "RN.Spacing.Use"));
    }
}
