//! Whole-file analysis sniffs

mod maximum_php_version;

pub use maximum_php_version::MaximumPhpVersionSniff;
