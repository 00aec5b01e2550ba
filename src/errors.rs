//! Error codes and error type.
//!
//! Only configuration and input-shape problems are errors.  Oversized
//! strings never are: the engine reshapes them silently.

use thiserror::Error;

// ── Error codes ──────────────────────────────────────────────

/// MaxLength cannot hold the ellipsis marker.
pub const ERR_CONFIG: &str = "ERR_CONFIG";
/// Process-wide configuration was already installed.
pub const ERR_ALREADY_CONFIGURED: &str = "ERR_ALREADY_CONFIGURED";
/// Malformed JSON Pointer in a document exemption list.
pub const ERR_POINTER: &str = "ERR_POINTER";
/// The underlying serializer failed.
pub const ERR_SERIALIZE: &str = "ERR_SERIALIZE";

/// Truncation policy error.
///
/// `code` is one of the `ERR_*` constants and is what callers should
/// match on.  `message` is human-readable context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct PolicyError {
    pub code: &'static str,
    pub message: String,
}

impl PolicyError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::new(ERR_SERIALIZE, err.to_string())
    }
}
