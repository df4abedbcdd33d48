//! File processing logic for csu

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use csu_core::{apply_edit_groups, Diagnostic};
use csu_sniffs::{RunContext, RunOptions, SniffRegistry};

/// Upper bound on check/fix rounds for one file
///
/// Fixes from one round can expose new violations; conflicting fixes are
/// deferred to the next round.
pub const MAX_FIX_PASSES: usize = 10;

/// Result of processing a single file
pub struct ProcessResult {
    /// Diagnostics of the first check
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics still present after fixing (equal to `diagnostics` without fixing)
    pub remaining: Vec<Diagnostic>,
    /// Number of fixes applied across all rounds
    pub fixed: usize,
    /// Original source code
    pub old_source: String,
    /// Source after fixes (only if something changed)
    pub new_source: Option<String>,
}

/// Check a single PHP file, applying fixes when `fix` is set
///
/// The file on disk is left untouched; see [`write_file`].
pub fn process_file(
    path: &Path,
    registry: &SniffRegistry,
    options: &RunOptions,
    fix: bool,
) -> Result<ProcessResult> {
    let source_code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    process_source(&path.to_string_lossy(), source_code, registry, options, fix)
}

/// Check (and optionally fix) already loaded source
pub fn process_source(
    name: &str,
    source_code: String,
    registry: &SniffRegistry,
    options: &RunOptions,
    fix: bool,
) -> Result<ProcessResult> {
    let mut run = RunContext::new(options.clone());
    let diagnostics = registry
        .check_source(name, &source_code, &mut run)
        .with_context(|| format!("Failed to check {}", name))?
        .into_diagnostics();

    if !fix || !diagnostics.iter().any(Diagnostic::is_fixable) {
        return Ok(ProcessResult {
            remaining: diagnostics.clone(),
            diagnostics,
            fixed: 0,
            old_source: source_code,
            new_source: None,
        });
    }

    let mut current = source_code.clone();
    let mut remaining = diagnostics.clone();
    let mut fixed = 0;

    for pass in 1..=MAX_FIX_PASSES {
        let groups: Vec<_> = remaining.iter().filter_map(|d| d.fix.clone()).collect();
        if groups.is_empty() {
            break;
        }

        let (next, applied) = apply_edit_groups(&current, &groups)
            .with_context(|| format!("Failed to apply fixes to {}", name))?;
        debug!(file = name, pass, applied, "applied fixes");
        if applied == 0 {
            break;
        }
        fixed += applied;
        current = next;

        // Annotations and the detected version may have changed with the source
        run.forget(name);
        remaining = registry
            .check_source(name, &current, &mut run)
            .with_context(|| format!("Failed to check {}", name))?
            .into_diagnostics();

        if pass == MAX_FIX_PASSES && remaining.iter().any(Diagnostic::is_fixable) {
            debug!(file = name, "fix passes exhausted");
        }
    }

    let new_source = (current != source_code).then_some(current);
    Ok(ProcessResult {
        diagnostics,
        remaining,
        fixed,
        old_source: source_code,
        new_source,
    })
}

/// Write the processed result to the file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SOURCE: &str = "<?php\n$a = TRUE;\n";

    #[test]
    fn test_check_only() {
        let registry = SniffRegistry::new();
        let result = process_source("a.php", SOURCE.to_string(), &registry, &RunOptions::default(), false).unwrap();

        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(result.remaining, result.diagnostics);
        assert_eq!(result.fixed, 0);
        assert!(result.new_source.is_none());
    }

    #[test]
    fn test_fix() {
        let registry = SniffRegistry::new();
        let result = process_source("a.php", SOURCE.to_string(), &registry, &RunOptions::default(), true).unwrap();

        assert_eq!(result.diagnostics.len(), 2);
        assert!(result.remaining.is_empty());
        assert_eq!(result.fixed, 2);
        assert_eq!(result.new_source.as_deref(), Some("<?php\n$a=true;\n"));
    }

    #[test]
    fn test_clean_file_is_unchanged() {
        let registry = SniffRegistry::new();
        let result =
            process_source("a.php", "<?php\n$a=true;\n".to_string(), &registry, &RunOptions::default(), true).unwrap();
        assert!(result.diagnostics.is_empty());
        assert!(result.new_source.is_none());
    }

    #[test]
    fn test_process_and_write_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        std::fs::write(&path, SOURCE).unwrap();

        let registry = SniffRegistry::new();
        let result = process_file(&path, &registry, &RunOptions::default(), true).unwrap();
        write_file(&path, result.new_source.as_deref().unwrap()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<?php\n$a=true;\n");
    }

    #[test]
    fn test_missing_file() {
        let registry = SniffRegistry::new();
        let err = process_file(Path::new("/nonexistent/a.php"), &registry, &RunOptions::default(), false)
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
