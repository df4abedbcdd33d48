//! Warns when a file uses language features newer than the configured
//! maximum PHP version

use std::cmp::Ordering;

use csu_core::TokenKind;

use crate::config::SniffProperties;
use crate::file::File;
use crate::sniffs::Sniff;
use crate::version::{compare_versions, is_valid_version};
use crate::SniffError;

#[derive(Debug, Default)]
pub struct MaximumPhpVersionSniff {
    maximum: Option<String>,
}

impl MaximumPhpVersionSniff {
    /// Sniff limited to `maximum`; inactive for an empty version
    pub fn new(maximum: &str) -> Result<Self, SniffError> {
        if maximum.is_empty() {
            return Ok(Self::default());
        }
        if !is_valid_version(maximum) {
            return Err(SniffError::InvalidVersion(maximum.to_string()));
        }
        Ok(Self {
            maximum: Some(maximum.to_string()),
        })
    }

    /// Configure from `maximumVersion`
    pub fn from_properties(properties: &SniffProperties) -> Result<Self, SniffError> {
        Self::new(properties.get("maximumVersion").unwrap_or_default())
    }
}

impl Sniff for MaximumPhpVersionSniff {
    fn name(&self) -> &'static str {
        "RN.CodeAnalysis.MaximumPHPVersion"
    }

    fn description(&self) -> &'static str {
        "Files do not use features beyond the configured PHP version"
    }

    fn register(&self) -> &'static [TokenKind] {
        match self.maximum {
            Some(_) => &[TokenKind::OpenTag],
            None => &[],
        }
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        let Some(maximum) = &self.maximum else {
            return Ok(());
        };
        // Only the first open tag speaks for the file
        if file.stream.tokens()[..ptr].iter().any(|t| t.kind == TokenKind::OpenTag) {
            return Ok(());
        }

        let found = file.run.detected_version(file.path, file.stream).to_string();
        if compare_versions(maximum, &found) != Ordering::Less {
            return Ok(());
        }

        file.add_warning(
            format!(
                "File seems to use PHP features beyond configured maximum version: \
                 highest version allowed is {maximum} but file requires {found}"
            ),
            ptr,
            "MaximumExceeded",
            vec![maximum.clone(), found],
        );
        Ok(())
    }
}
