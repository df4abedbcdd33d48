mod boolean_null;

pub use boolean_null::BooleanNullSniff;
