//! Diagnostics and the per-file report they are collected in

use serde::Serialize;

use crate::edit::{Edit, EditGroup};
use crate::stream::TokenStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single reported violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Sniff that raised it, e.g. `RN.Spacing.Property`
    pub sniff: String,
    /// Stable machine-readable code, e.g. `PrecedingNewlines`
    pub code: String,
    pub message: String,
    /// Values substituted into the message
    pub data: Vec<String>,
    /// Token index the diagnostic points at
    pub token: usize,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<EditGroup>,
}

impl Diagnostic {
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// `Sniff.Code`, the form used to filter and display diagnostics
    pub fn full_code(&self) -> String {
        format!("{}.{}", self.sniff, self.code)
    }
}

/// Diagnostic sink for one file
///
/// The registry sets the source sniff before dispatching, so sniffs only
/// pass the code, message and location.
#[derive(Debug, Default)]
pub struct Report {
    source: String,
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute subsequent diagnostics to `sniff`
    pub fn set_source(&mut self, sniff: impl Into<String>) {
        self.source = sniff.into();
    }

    pub fn error(&mut self, stream: &TokenStream, token: usize, code: &str, message: String, data: Vec<String>) {
        self.push(stream, Severity::Error, token, code, message, data, None);
    }

    pub fn warning(&mut self, stream: &TokenStream, token: usize, code: &str, message: String, data: Vec<String>) {
        self.push(stream, Severity::Warning, token, code, message, data, None);
    }

    /// Error carrying an atomic fix
    pub fn fixable_error(
        &mut self,
        stream: &TokenStream,
        token: usize,
        code: &str,
        message: String,
        data: Vec<String>,
        edits: Vec<Edit>,
    ) {
        let fix = (!edits.is_empty()).then(|| EditGroup::new(format!("{}.{}", self.source, code), edits));
        self.push(stream, Severity::Error, token, code, message, data, fix);
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        stream: &TokenStream,
        severity: Severity,
        token: usize,
        code: &str,
        message: String,
        data: Vec<String>,
        fix: Option<EditGroup>,
    ) {
        let (line, column) = stream.get(token).map_or((0, 0), |t| (t.line, t.column));
        self.diagnostics.push(Diagnostic {
            severity,
            sniff: self.source.clone(),
            code: code.to_string(),
            message,
            data,
            token,
            line,
            column,
            fix,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    /// Fix groups of all fixable diagnostics
    pub fn fixes(&self) -> Vec<EditGroup> {
        self.diagnostics.iter().filter_map(|d| d.fix.clone()).collect()
    }

    /// Order by position, then severity
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| (a.line, a.column, b.severity).cmp(&(b.line, b.column, a.severity)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_attributes_source_and_position() {
        let stream = TokenStream::from_source("<?php\n$a  = 1;");
        let mut report = Report::new();
        report.set_source("RN.Spacing.AssignmentOperators");
        report.fixable_error(&stream, 3, "SpaceBefore", "msg".into(), vec![], vec![Edit::delete(8, 10)]);
        report.warning(&stream, 1, "Unhandled", "warn".into(), vec![]);

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);

        let first = &report.diagnostics()[0];
        assert_eq!(first.full_code(), "RN.Spacing.AssignmentOperators.SpaceBefore");
        assert_eq!((first.line, first.column), (2, 5));
        assert!(first.is_fixable());
        assert_eq!(report.fixes().len(), 1);
    }

    #[test]
    fn test_empty_fix_is_not_fixable() {
        let stream = TokenStream::from_source("<?php\n$a = 1;");
        let mut report = Report::new();
        report.fixable_error(&stream, 1, "Code", "msg".into(), vec![], vec![]);
        assert!(!report.diagnostics()[0].is_fixable());
    }

    #[test]
    fn test_sort_by_position() {
        let stream = TokenStream::from_source("<?php\n$a = 1;\n$b = 2;");
        let mut report = Report::new();
        report.error(&stream, 7, "Late", "b".into(), vec![]);
        report.error(&stream, 1, "Early", "a".into(), vec![]);
        report.sort();
        assert_eq!(report.diagnostics()[0].code, "Early");
    }
}
