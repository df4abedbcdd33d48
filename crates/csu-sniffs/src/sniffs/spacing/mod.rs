//! Blank-line and whitespace sniffs

mod assignment;
mod call_arguments;
mod class;
mod constant;
mod function;
mod namespace;
mod property;
mod use_import;

pub use assignment::AssignmentOperatorsSniff;
pub use call_arguments::FunctionCallParametersSniff;
pub use class::ClassSpacingSniff;
pub use constant::ConstSpacingSniff;
pub use function::FunctionSpacingSniff;
pub use namespace::NamespaceSpacingSniff;
pub use property::PropertySpacingSniff;
pub use use_import::UseSpacingSniff;
