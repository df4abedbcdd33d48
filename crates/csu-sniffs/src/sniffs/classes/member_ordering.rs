//! Class member ordering
//!
//! By default members are expected in this order:
//!   1. constants
//!   2. trait imports
//!   3. static properties
//!   4. static methods
//!   5. instance properties
//!   6. constructor
//!   7. instance methods

use csu_core::TokenKind;

use crate::config::SniffProperties;
use crate::engine::MemberOrdering;
use crate::file::File;
use crate::sniffs::Sniff;
use crate::SniffError;

#[derive(Default)]
pub struct MemberOrderingSniff {
    ordering: MemberOrdering,
}

impl MemberOrderingSniff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure weights from `constOrder`, `staticMethodOrder`, ...
    pub fn from_properties(properties: &SniffProperties) -> Result<Self, SniffError> {
        Ok(Self {
            ordering: MemberOrdering::from_properties(properties)?,
        })
    }
}

impl Sniff for MemberOrderingSniff {
    fn name(&self) -> &'static str {
        "RN.Classes.MemberOrdering"
    }

    fn description(&self) -> &'static str {
        "Class members are declared in a configurable order"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Const, TokenKind::Use, TokenKind::Variable, TokenKind::Function]
    }

    fn process(&self, file: &mut File<'_>, ptr: usize) -> Result<(), SniffError> {
        self.ordering.check(file, ptr);
        Ok(())
    }
}
