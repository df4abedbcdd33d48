//! Analysis engines the concrete sniffs are built from

pub mod alignment;
pub mod expectation;
pub mod ordering;
pub mod preceding;

pub use alignment::{find_vertical_alignment, AlignmentGroup};
pub use expectation::{AfterHook, BeforeHook, Expectation, ExpectationTable};
pub use ordering::{MemberCategory, MemberOrdering};
pub use preceding::{ContextAwareChecker, PrecedingLinesChecker};
