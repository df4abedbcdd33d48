//! Helpers for sniff unit tests

use csu_core::{apply_edit_groups, Diagnostic, Report, TokenStream};

use crate::config::RunContext;
use crate::file::File;
use crate::sniffs::Sniff;

/// Run `sniff` over every token it registers for
pub fn check(sniff: &dyn Sniff, source: &str) -> Vec<Diagnostic> {
    let stream = TokenStream::from_source(source);
    let mut report = Report::new();
    report.set_source(sniff.name());
    let mut context = RunContext::default();
    let mut file = File::new("test.php", &stream, &mut report, &mut context);

    for ptr in 0..stream.len() {
        if sniff.register().contains(&stream.kind(ptr)) {
            sniff.process(&mut file, ptr).unwrap();
        }
    }
    report.into_diagnostics()
}

/// Codes of the diagnostics `sniff` reports for `source`
pub fn codes(sniff: &dyn Sniff, source: &str) -> Vec<String> {
    check(sniff, source).into_iter().map(|d| d.code).collect()
}

/// Messages of the diagnostics `sniff` reports for `source`
pub fn messages(sniff: &dyn Sniff, source: &str) -> Vec<String> {
    check(sniff, source).into_iter().map(|d| d.message).collect()
}

/// Apply every fix `sniff` offers for `source` once
pub fn fix(sniff: &dyn Sniff, source: &str) -> String {
    let groups: Vec<_> = check(sniff, source).into_iter().filter_map(|d| d.fix).collect();
    apply_edit_groups(source, &groups).unwrap().0
}
