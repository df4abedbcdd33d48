//! Configuration file support for csu
//!
//! Loads `.csu.toml` from current directory or parent directories.

use anyhow::{Context, Result};
use csu_sniffs::{RunOptions, SniffProperties, SniffRegistry};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".csu.toml";

const MAXIMUM_VERSION_SNIFF: &str = "RN.CodeAnalysis.MaximumPHPVersion";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sniffs: SniffsConfig,
    /// Sniff name -> property name -> value
    pub properties: HashMap<String, HashMap<String, toml::Value>>,
    pub paths: PathsConfig,
    pub php: PhpConfig,
    pub options: OptionsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SniffsConfig {
    /// If set, only these sniffs will run
    pub enabled: Option<Vec<String>>,
    /// Sniffs to exclude (applied after enabled)
    pub disabled: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhpConfig {
    /// Highest PHP version files may require, e.g. "7.1"
    pub version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Ignore `@codingStandardsIgnoreRule` annotations; any boolean spelling
    pub ignore_annotations: Option<toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "diff"
    pub format: Option<String>,
}

impl Config {
    /// Load config from `.csu.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return Ok(Some((Self::load_path(&config_path)?, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Sniff properties as the strings sniffs are configured with
    ///
    /// `[php] version` becomes the maximum version unless that sniff's
    /// `maximumVersion` is set explicitly.
    pub fn sniff_properties(&self, php_version: Option<&str>) -> HashMap<String, SniffProperties> {
        let mut properties: HashMap<String, SniffProperties> = self
            .properties
            .iter()
            .map(|(sniff, values)| {
                let values = values.iter().map(|(name, value)| (name.clone(), value_to_string(value)));
                (sniff.clone(), values.collect())
            })
            .collect();

        if let Some(version) = php_version.or(self.php.version.as_deref()) {
            let entry = properties.entry(MAXIMUM_VERSION_SNIFF.to_string()).or_default();
            if entry.get("maximumVersion").is_none() {
                entry.set("maximumVersion", version);
            }
        }
        properties
    }

    /// Options shared by every sniff of the run
    pub fn run_options(&self, cli_ignore_annotations: bool) -> Result<RunOptions> {
        let mut properties = SniffProperties::new();
        if let Some(value) = &self.options.ignore_annotations {
            properties.set("ignore_annotations", value_to_string(value));
        }
        let mut options = RunOptions::from_properties(&properties).context("Invalid [options] table")?;
        options.ignore_annotations |= cli_ignore_annotations;
        Ok(options)
    }

    /// Build the configured registry; CLI sniff names replace `[sniffs] enabled`
    pub fn registry(&self, cli_sniffs: &[String], php_version: Option<&str>) -> Result<SniffRegistry> {
        let mut registry = SniffRegistry::with_properties(&self.sniff_properties(php_version))
            .context("Invalid sniff configuration")?;

        let enabled = if cli_sniffs.is_empty() {
            self.sniffs.enabled.clone().unwrap_or_default()
        } else {
            cli_sniffs.to_vec()
        };
        registry
            .select(&enabled, &self.sniffs.disabled)
            .context("Invalid sniff selection")?;
        Ok(registry)
    }

    /// Check if a path should be excluded based on config patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.paths.exclude {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
                if let Some(file_name) = path.file_name() {
                    if glob_pattern.matches(&file_name.to_string_lossy()) {
                        return true;
                    }
                }
            }

            // Directory patterns match anywhere in the path
            if pattern.ends_with('/') {
                let dir_pattern = pattern.trim_end_matches('/');
                if path_str.contains(&format!("/{}/", dir_pattern))
                    || path_str.starts_with(&format!("{}/", dir_pattern))
                {
                    return true;
                }
            }
        }

        false
    }
}

fn value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn test_load_basic_config() {
        let temp = TempDir::new().unwrap();
        create_config(
            temp.path(),
            r#"
[sniffs]
enabled = ["RN.Spacing.Use", "RN.Spacing.Class"]
disabled = ["RN.Spacing.Class"]

[properties."RN.Classes.MemberOrdering"]
constOrder = 5
staticMethodOrder = "35"

[paths]
exclude = ["vendor/", "*.generated.php"]

[php]
version = "7.1"

[options]
ignore_annotations = "yes"
"#,
        );

        let (config, path) = Config::load_from(temp.path().to_path_buf()).unwrap().unwrap();

        assert_eq!(path, temp.path().join(CONFIG_FILE));
        assert_eq!(
            config.sniffs.enabled,
            Some(vec!["RN.Spacing.Use".to_string(), "RN.Spacing.Class".to_string()])
        );
        assert_eq!(config.sniffs.disabled, vec!["RN.Spacing.Class".to_string()]);
        assert_eq!(config.php.version.as_deref(), Some("7.1"));
        assert!(config.run_options(false).unwrap().ignore_annotations);

        let properties = config.sniff_properties(None);
        let ordering = &properties["RN.Classes.MemberOrdering"];
        assert_eq!(ordering.get("constOrder"), Some("5"));
        assert_eq!(ordering.get("staticMethodOrder"), Some("35"));
        assert_eq!(properties[MAXIMUM_VERSION_SNIFF].get("maximumVersion"), Some("7.1"));

        let registry = config.registry(&[], None).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("RN.Spacing.Use").is_some());
    }

    #[test]
    fn test_config_found_in_parent() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[output]\nformat = \"json\"\n");
        let nested = temp.path().join("src").join("Model");
        fs::create_dir_all(&nested).unwrap();

        let (config, path) = Config::load_from(nested).unwrap().unwrap();
        assert_eq!(path, temp.path().join(CONFIG_FILE));
        assert_eq!(config.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_no_config_found() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(temp.path().to_path_buf()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default();
        let registry = config.registry(&["RN.Spacing.Property".to_string()], Some("7.0")).unwrap();
        assert_eq!(registry.len(), 1);

        let properties = config.sniff_properties(Some("7.0"));
        assert_eq!(properties[MAXIMUM_VERSION_SNIFF].get("maximumVersion"), Some("7.0"));
        assert!(config.run_options(true).unwrap().ignore_annotations);
    }

    #[test]
    fn test_invalid_settings_are_errors() {
        let config: Config = toml::from_str("[options]\nignore_annotations = \"maybe\"\n").unwrap();
        assert!(config.run_options(false).is_err());

        let config: Config = toml::from_str("[properties.\"RN.Capitalization.BooleanNULL\"]\nnullCase = \"loud\"\n").unwrap();
        assert!(config.registry(&[], None).is_err());

        assert!(Config::default().registry(&["RN.Nope".to_string()], None).is_err());
    }

    #[test]
    fn test_should_exclude() {
        let config = Config {
            paths: PathsConfig {
                exclude: vec!["vendor/".to_string(), "*.generated.php".to_string()],
            },
            ..Default::default()
        };

        assert!(config.should_exclude(Path::new("project/vendor/autoload.php")));
        assert!(config.should_exclude(Path::new("foo.generated.php")));
        assert!(!config.should_exclude(Path::new("src/vendor.php")));
    }
}
