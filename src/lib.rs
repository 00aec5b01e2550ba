//! # fieldcap — field-aware string truncation for serde
//!
//! Bound the length of every string a value serializes to, except in
//! fields that have been explicitly exempted.
//!
//! ```
//! use fieldcap::{exempt_fields, ExemptionRegistry, TruncationConfig, TruncationPolicy};
//!
//! #[derive(serde::Serialize)]
//! struct Transaction {
//!     name: String,
//!     request_body: String,
//! }
//! exempt_fields!(Transaction => [request_body]);
//!
//! let policy = TruncationPolicy::new(
//!     TruncationConfig::with_max_length(8).unwrap(),
//!     ExemptionRegistry::new().register::<Transaction>(),
//! );
//! let txn = Transaction {
//!     name: "GET /orders/12345".into(),
//!     request_body: "kept in full, however long".into(),
//! };
//! let json = fieldcap::to_string(&txn, &policy).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"name":"GET /...","request_body":"kept in full, however long"}"#
//! );
//! ```
//!
//! Oversized strings are never an error.  The only failures are a
//! misconfigured bound (`ERR_CONFIG`, at construction time) and whatever
//! the underlying serializer reports.

pub mod config;
pub mod constants;
pub mod document;
pub mod engine;
pub mod errors;
pub mod registry;
pub mod ser;
pub mod wrappers;

use std::io;

use serde::Serialize;

pub use config::{install, TruncationConfig};
pub use constants::{DEFAULT_MAX_LENGTH, ELLIPSIS};
pub use document::truncate_document;
pub use engine::truncate;
pub use errors::{PolicyError, ERR_ALREADY_CONFIGURED, ERR_CONFIG, ERR_POINTER, ERR_SERIALIZE};
pub use registry::{ExemptFields, ExemptionRegistry};
pub use ser::{Truncated, TruncatingSerializer, TruncationPolicy};
pub use wrappers::Untruncated;

// ── JSON entry points ────────────────────────────────────────

/// Serialize `value` to a JSON string under `policy`.
pub fn to_string<T: ?Sized + Serialize>(
    value: &T,
    policy: &TruncationPolicy,
) -> Result<String, PolicyError> {
    Ok(serde_json::to_string(&policy.apply(value))?)
}

/// Pretty-printed variant of [`to_string`].
pub fn to_string_pretty<T: ?Sized + Serialize>(
    value: &T,
    policy: &TruncationPolicy,
) -> Result<String, PolicyError> {
    Ok(serde_json::to_string_pretty(&policy.apply(value))?)
}

/// Serialize `value` to JSON bytes under `policy`.
pub fn to_vec<T: ?Sized + Serialize>(
    value: &T,
    policy: &TruncationPolicy,
) -> Result<Vec<u8>, PolicyError> {
    Ok(serde_json::to_vec(&policy.apply(value))?)
}

/// Stream `value` as JSON into `writer` under `policy`.
pub fn to_writer<W: io::Write, T: ?Sized + Serialize>(
    writer: W,
    value: &T,
    policy: &TruncationPolicy,
) -> Result<(), PolicyError> {
    Ok(serde_json::to_writer(writer, &policy.apply(value))?)
}

/// Build a `serde_json::Value` tree from `value` under `policy`.
pub fn to_value<T: ?Sized + Serialize>(
    value: &T,
    policy: &TruncationPolicy,
) -> Result<serde_json::Value, PolicyError> {
    Ok(serde_json::to_value(policy.apply(value))?)
}
