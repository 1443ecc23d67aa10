//! Error types for the control core.
//!
//! Almost nothing in the core can fail: missing sensor data and denied
//! permissions degrade to defaults. Errors are reserved for invalid scene
//! descriptions and configuration input.

use std::fmt;

/// Errors raised while building a scene or loading its description.
#[derive(Debug)]
pub enum ToyError {
    /// A ring was described with no segments, which would yield an empty body.
    InvalidRing { id: u32, segment_count: u32 },
    /// A configuration value is out of its usable range.
    InvalidConfig(String),
    /// A JSON scene or config document could not be parsed.
    Parse(serde_json::Error),
}

impl fmt::Display for ToyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToyError::InvalidRing { id, segment_count } => write!(
                f,
                "Ring {} has {} segments; at least one segment is required",
                id, segment_count
            ),
            ToyError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ToyError::Parse(e) => write!(f, "Failed to parse scene description: {}", e),
        }
    }
}

impl std::error::Error for ToyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToyError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ToyError {
    fn from(e: serde_json::Error) -> Self {
        ToyError::Parse(e)
    }
}
