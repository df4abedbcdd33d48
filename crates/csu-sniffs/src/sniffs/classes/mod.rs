//! Class structure sniffs

mod member_ordering;

pub use member_ordering::MemberOrderingSniff;
