//! Sniff registry for managing available sniffs
//!
//! The registry holds one configured instance of every sniff and runs them
//! over a file's token stream, dispatching each token to the sniffs that
//! registered for its kind.

use std::collections::HashMap;
use std::sync::Arc;

use csu_core::{Report, TokenStream};
use serde::Serialize;
use tracing::debug;

use crate::config::{RunContext, SniffProperties};
use crate::file::File;
use crate::sniffs::analysis::MaximumPhpVersionSniff;
use crate::sniffs::capitalization::BooleanNullSniff;
use crate::sniffs::classes::MemberOrderingSniff;
use crate::sniffs::spacing::{
    AssignmentOperatorsSniff, ClassSpacingSniff, ConstSpacingSniff, FunctionCallParametersSniff,
    FunctionSpacingSniff, NamespaceSpacingSniff, PropertySpacingSniff, UseSpacingSniff,
};
use crate::sniffs::Sniff;
use crate::SniffError;

/// Information about a registered sniff
#[derive(Debug, Clone, Serialize)]
pub struct SniffInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Whether the sniff listens for any token with its current configuration
    pub active: bool,
}

/// Registry of all available sniffs
pub struct SniffRegistry {
    sniffs: Vec<Arc<dyn Sniff>>,
    by_name: HashMap<&'static str, usize>,
}

impl SniffRegistry {
    /// Create a registry with every built-in sniff in its default configuration
    pub fn new() -> Self {
        let mut registry = Self {
            sniffs: Vec::new(),
            by_name: HashMap::new(),
        };

        // Vertical spacing
        registry.register(Arc::new(NamespaceSpacingSniff::new()));
        registry.register(Arc::new(UseSpacingSniff::new()));
        registry.register(Arc::new(ClassSpacingSniff::new()));
        registry.register(Arc::new(ConstSpacingSniff::new()));
        registry.register(Arc::new(PropertySpacingSniff::new()));
        registry.register(Arc::new(FunctionSpacingSniff::new()));

        // Horizontal spacing
        registry.register(Arc::new(AssignmentOperatorsSniff));
        registry.register(Arc::new(FunctionCallParametersSniff));

        registry.register(Arc::new(MemberOrderingSniff::new()));
        registry.register(Arc::new(BooleanNullSniff::default()));
        registry.register(Arc::new(MaximumPhpVersionSniff::default()));

        registry
    }

    /// Create a registry whose configurable sniffs take their properties from
    /// `properties`, keyed by sniff name
    pub fn with_properties(properties: &HashMap<String, SniffProperties>) -> Result<Self, SniffError> {
        let mut registry = Self::new();
        for name in properties.keys() {
            if !registry.by_name.contains_key(name.as_str()) {
                return Err(SniffError::UnknownSniff(name.clone()));
            }
        }

        let empty = SniffProperties::default();
        let of = |name: &str| properties.get(name).unwrap_or(&empty);

        registry.replace(Arc::new(MemberOrderingSniff::from_properties(of("RN.Classes.MemberOrdering"))?));
        registry.replace(Arc::new(BooleanNullSniff::from_properties(of("RN.Capitalization.BooleanNULL"))?));
        registry.replace(Arc::new(MaximumPhpVersionSniff::from_properties(of(
            "RN.CodeAnalysis.MaximumPHPVersion",
        ))?));

        Ok(registry)
    }

    /// Register a sniff
    fn register(&mut self, sniff: Arc<dyn Sniff>) {
        let idx = self.sniffs.len();
        self.by_name.insert(sniff.name(), idx);
        self.sniffs.push(sniff);
    }

    /// Swap in a differently configured instance of a registered sniff
    fn replace(&mut self, sniff: Arc<dyn Sniff>) {
        match self.by_name.get(sniff.name()) {
            Some(&idx) => self.sniffs[idx] = sniff,
            None => self.register(sniff),
        }
    }

    /// Get a sniff by its qualified name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Sniff>> {
        self.by_name.get(name).map(|&idx| &self.sniffs[idx])
    }

    /// Get all sniffs in registration order
    pub fn all(&self) -> &[Arc<dyn Sniff>] {
        &self.sniffs
    }

    /// Get information about all sniffs
    pub fn list(&self) -> Vec<SniffInfo> {
        self.sniffs
            .iter()
            .map(|s| SniffInfo {
                name: s.name(),
                description: s.description(),
                active: !s.register().is_empty(),
            })
            .collect()
    }

    /// Keep only the `enabled` sniffs (all when empty), minus the `disabled` ones
    pub fn select(&mut self, enabled: &[String], disabled: &[String]) -> Result<(), SniffError> {
        for name in enabled.iter().chain(disabled) {
            if !self.by_name.contains_key(name.as_str()) {
                return Err(SniffError::UnknownSniff(name.clone()));
            }
        }

        self.sniffs.retain(|sniff| {
            let name = sniff.name();
            (enabled.is_empty() || enabled.iter().any(|e| e == name)) && !disabled.iter().any(|d| d == name)
        });
        self.by_name = self.sniffs.iter().enumerate().map(|(idx, s)| (s.name(), idx)).collect();
        Ok(())
    }

    /// Run every sniff over `stream`
    ///
    /// Sniffs switched off for the file by annotation are skipped. The
    /// returned report is sorted by position.
    pub fn check(&self, path: &str, stream: &TokenStream, run: &mut RunContext) -> Result<Report, SniffError> {
        let mut report = Report::new();

        for sniff in &self.sniffs {
            let kinds = sniff.register();
            if kinds.is_empty() {
                continue;
            }
            if run.is_disabled(path, stream, sniff.name()) {
                debug!(sniff = sniff.name(), path, "skipped, disabled for file");
                continue;
            }

            report.set_source(sniff.name());
            let mut file = File::new(path, stream, &mut report, run);
            let mut dispatched = 0usize;
            for ptr in 0..stream.len() {
                if kinds.contains(&stream.kind(ptr)) {
                    sniff.process(&mut file, ptr)?;
                    dispatched += 1;
                }
            }
            debug!(sniff = sniff.name(), path, tokens = dispatched, "sniff finished");
        }

        report.sort();
        Ok(report)
    }

    /// Tokenize `source` and run every sniff over it
    pub fn check_source(&self, path: &str, source: &str, run: &mut RunContext) -> Result<Report, SniffError> {
        let stream = TokenStream::from_source(source);
        self.check(path, &stream, run)
    }

    /// Number of registered sniffs
    pub fn len(&self) -> usize {
        self.sniffs.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.sniffs.is_empty()
    }
}

impl Default for SniffRegistry {
    fn default() -> Self {
        Self::new()
    }
}
