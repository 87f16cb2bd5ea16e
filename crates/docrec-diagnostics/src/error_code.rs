//! Record layer error codes following a structured numbering system
//!
//! Error code ranges:
//! - DR0001-DR0099: Codec errors (literals, wire text)
//! - DR0100-DR0199: Coercion errors (type conversion, dates)
//! - DR0200-DR0299: Path errors (syntax, indexing, attributes)
//! - DR0300-DR0399: Storage errors (record loading)
//! - DR0400-DR0499: System errors (I/O, configuration)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a codec error (0001-0099)
    pub const fn is_codec_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a coercion error (0100-0199)
    pub const fn is_coercion_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a path error (0200-0299)
    pub const fn is_path_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a storage error (0300-0399)
    pub const fn is_storage_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DR{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Codec errors (0001-0099)
    map.insert(1, ErrorInfo::new("Malformed literal"));
    map.insert(
        2,
        ErrorInfo::new("Unsupported type")
            .with_help("The value kind has no textual form for the declared type tag"),
    );

    // Coercion errors (0100-0199)
    map.insert(100, ErrorInfo::new("Type mismatch"));
    map.insert(
        101,
        ErrorInfo::new("Date parse error")
            .with_help("Check the configured date and date-time patterns"),
    );

    // Path errors (0200-0299)
    map.insert(200, ErrorInfo::new("Malformed path"));
    map.insert(201, ErrorInfo::new("Index out of range"));
    map.insert(
        202,
        ErrorInfo::new("Unknown attribute").with_help(
            "Supported attributes: @this, @rid, @version, @class, @type, @size, @fields",
        ),
    );

    // Storage errors (0300-0399)
    map.insert(300, ErrorInfo::new("Record not found"));

    // System errors (0400-0499)
    map.insert(400, ErrorInfo::new("Internal error"));
    map.insert(401, ErrorInfo::new("Configuration error"));

    map
});

// Codec errors
pub const DR0001: ErrorCode = ErrorCode::new(1);
pub const DR0002: ErrorCode = ErrorCode::new(2);

// Coercion errors
pub const DR0100: ErrorCode = ErrorCode::new(100);
pub const DR0101: ErrorCode = ErrorCode::new(101);

// Path errors
pub const DR0200: ErrorCode = ErrorCode::new(200);
pub const DR0201: ErrorCode = ErrorCode::new(201);
pub const DR0202: ErrorCode = ErrorCode::new(202);

// Storage errors
pub const DR0300: ErrorCode = ErrorCode::new(300);

// System errors
pub const DR0400: ErrorCode = ErrorCode::new(400);
pub const DR0401: ErrorCode = ErrorCode::new(401);
