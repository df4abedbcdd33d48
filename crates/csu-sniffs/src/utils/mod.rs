//! Token-level probes shared by several sniffs

pub mod calls;
pub mod members;
