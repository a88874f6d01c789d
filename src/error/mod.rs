//! Error handling module
//!
//! Defines the publish error taxonomy and its exit codes

pub mod types;

pub use types::*;
