//! Record layer diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the value
//! model, the textual codec and the path resolver: error codes, source
//! locations inside literals and path expressions, and diagnostic reporting.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for record layer operations
pub type Result<T> = std::result::Result<T, RecordError>;
