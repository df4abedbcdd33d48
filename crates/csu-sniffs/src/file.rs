//! The handle a sniff receives for the file being checked

use csu_core::{Edit, Report, TokenStream};

use crate::config::RunContext;

/// One file under inspection: its tokens, its report and the run state
pub struct File<'a> {
    pub path: &'a str,
    pub stream: &'a TokenStream,
    pub report: &'a mut Report,
    pub run: &'a mut RunContext,
}

impl<'a> File<'a> {
    pub fn new(path: &'a str, stream: &'a TokenStream, report: &'a mut Report, run: &'a mut RunContext) -> Self {
        Self {
            path,
            stream,
            report,
            run,
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>, ptr: usize, code: &str, data: Vec<String>) {
        self.report.error(self.stream, ptr, code, message.into(), data);
    }

    pub fn add_warning(&mut self, message: impl Into<String>, ptr: usize, code: &str, data: Vec<String>) {
        self.report.warning(self.stream, ptr, code, message.into(), data);
    }

    pub fn add_fixable_error(
        &mut self,
        message: impl Into<String>,
        ptr: usize,
        code: &str,
        data: Vec<String>,
        edits: Vec<Edit>,
    ) {
        self.report.fixable_error(self.stream, ptr, code, message.into(), data, edits);
    }
}
