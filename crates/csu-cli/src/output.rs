//! Output formatting for csu
//!
//! Supports text (colored terminal), JSON and unified diff output.

use colored::*;
use csu_core::{Diagnostic, Severity};
use serde::Serialize;
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Diff,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "diff" => Some(OutputFormat::Diff),
            _ => None,
        }
    }
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "is_zero")]
    pub fixed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl FileResult {
    pub fn success(path: &Path, diagnostics: Vec<Diagnostic>, fixed: usize) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics,
            fixed,
            error: None,
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: Vec::new(),
            fixed: 0,
            error: Some(error),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_violations: usize,
    pub errors: usize,
    pub warnings: usize,
    pub fixable: usize,
    pub fixed: usize,
    pub failures: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report the diagnostics of a checked file
    ///
    /// `new_source` is the fixed source when fixes were computed; the diff
    /// format prints it against `old_source`.
    pub fn report_file(
        &mut self,
        path: &Path,
        diagnostics: Vec<Diagnostic>,
        fixed: usize,
        old_source: &str,
        new_source: Option<&str>,
    ) {
        self.summary.files_processed += 1;
        self.summary.fixed += fixed;

        if diagnostics.is_empty() {
            if fixed > 0 && self.format == OutputFormat::Text {
                println!("{}", path.display().to_string().bold());
                println!("  {} Fixed {} violation(s)", "OK".green(), fixed);
                println!();
            } else if self.verbose && self.format == OutputFormat::Text {
                println!("{}: No violations", path.display());
            }
        } else {
            self.summary.files_with_violations += 1;
            for diagnostic in &diagnostics {
                match diagnostic.severity {
                    Severity::Error => self.summary.errors += 1,
                    Severity::Warning => self.summary.warnings += 1,
                }
                if diagnostic.is_fixable() {
                    self.summary.fixable += 1;
                }
            }
            if self.format == OutputFormat::Text {
                println!("{}", path.display().to_string().bold());
                if fixed > 0 {
                    println!("  {} Fixed {} violation(s)", "OK".green(), fixed);
                }
                for diagnostic in &diagnostics {
                    println!("{}", format_diagnostic(diagnostic));
                }
                println!();
            }
        }

        if self.format == OutputFormat::Diff {
            if let Some(new_source) = new_source {
                print_unified_diff(path, old_source, new_source);
            }
        }

        self.results.push(FileResult::success(path, diagnostics, fixed));
    }

    /// Report an error processing a file
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.failures += 1;

        if self.format == OutputFormat::Text {
            eprintln!("{}: {} - {}", "Error".red(), path.display(), error);
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    /// Print final summary/output
    pub fn finish(self, fix_mode: bool) -> serde_json::Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!("{}", "Summary".bold().underline());
                println!("  Files processed: {}", self.summary.files_processed);
                println!("  Files with violations: {}", self.summary.files_with_violations);
                println!("  Errors: {}", self.summary.errors);
                println!("  Warnings: {}", self.summary.warnings);
                if self.summary.fixed > 0 {
                    println!("  Fixed: {}", self.summary.fixed);
                }
                if self.summary.failures > 0 {
                    println!("  Failed files: {}", self.summary.failures);
                }

                if !fix_mode && self.summary.fixable > 0 {
                    println!();
                    println!(
                        "{}",
                        format!("{} violation(s) can be fixed with --fix", self.summary.fixable).yellow()
                    );
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    summary: self.summary,
                    files: self.results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Diff => {
                // Patch-compatible output has no summary
            }
        }
        Ok(())
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

/// One diagnostic as a text line: `line:col SEVERITY message (Sniff.Code)`
fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let severity = match diagnostic.severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warning => "WARNING".yellow().bold(),
    };
    let marker = if diagnostic.is_fixable() { "[x] " } else { "[ ] " };
    format!(
        "  {:>4}:{:<3} {} {}{} {}",
        diagnostic.line,
        diagnostic.column,
        severity,
        marker,
        diagnostic.message,
        format!("({})", diagnostic.full_code()).dimmed()
    )
}

/// Print unified diff format (standard diff -u compatible)
fn print_unified_diff(path: &Path, old: &str, new: &str) {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(old, new);
    let path_str = path.display().to_string();

    println!("--- a/{}", path_str);
    println!("+++ b/{}", path_str);

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        println!("{}", hunk.header());
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            print!("{}{}", sign, change);
            if change.missing_newline() {
                println!();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csu_sniffs::{RunContext, SniffRegistry};

    fn diagnostics(source: &str) -> Vec<Diagnostic> {
        let mut run = RunContext::default();
        SniffRegistry::new()
            .check_source("test.php", source, &mut run)
            .unwrap()
            .into_diagnostics()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("Diff"), Some(OutputFormat::Diff));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    #[test]
    fn test_format_diagnostic() {
        colored::control::set_override(false);
        let found = diagnostics("<?php\n$a=TRUE;\n");
        assert_eq!(found.len(), 1);
        assert_eq!(
            format_diagnostic(&found[0]),
            "     2:4   ERROR [x] Invalid boolean/null value: expected \"true\", got \"TRUE\" instead. \
             (RN.Capitalization.BooleanNULL.BooleanCase)"
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut reporter = Reporter::new(OutputFormat::Json, false);
        reporter.report_file(Path::new("a.php"), diagnostics("<?php\n$a = TRUE;\n"), 0, "", None);
        reporter.report_file(Path::new("b.php"), vec![], 3, "", None);
        reporter.report_error(Path::new("c.php"), "unreadable");

        let summary = reporter.summary();
        assert_eq!(summary.files_processed, 3);
        assert_eq!(summary.files_with_violations, 1);
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.warnings, 0);
        assert_eq!(summary.fixable, 2);
        assert_eq!(summary.fixed, 3);
        assert_eq!(summary.failures, 1);
    }

    #[test]
    fn test_json_serialization() {
        let output = JsonOutput {
            version: "0.1.0".to_string(),
            summary: Summary {
                files_processed: 1,
                files_with_violations: 1,
                errors: 1,
                ..Default::default()
            },
            files: vec![
                FileResult::success(Path::new("test.php"), diagnostics("<?php\n$a=TRUE;\n"), 0),
                FileResult::error(Path::new("bad.php"), "unreadable".to_string()),
            ],
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"version\":\"0.1.0\""));
        assert!(json.contains("\"files_processed\":1"));
        assert!(json.contains("\"severity\":\"error\""));
        assert!(json.contains("\"code\":\"BooleanCase\""));
        assert!(json.contains("\"error\":\"unreadable\""));

        let clean = serde_json::to_string(&FileResult::success(Path::new("ok.php"), vec![], 0)).unwrap();
        assert_eq!(clean, "{\"path\":\"ok.php\"}");
    }
}
