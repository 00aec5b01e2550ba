//! Truncation over an already-built JSON document.
//!
//! For documents that never were typed Rust values (proxied payloads,
//! stored events) there is no struct declaration to hang an exemption
//! on.  Exemption is instead declared by RFC 6901 JSON Pointer: the value
//! at the pointer and everything below it is left alone.  Every other
//! string value in the document goes through the engine; object keys are
//! never rewritten.

use serde_json::Value;

use crate::config::TruncationConfig;
use crate::errors::*;

// ── RFC 6901 JSON Pointer parsing ─────────────────────────────
// "~0" → "~" and "~1" → "/".  Decoded character by character so that
// "~01" yields "~1", not "/".

fn parse_pointer(ptr: &str) -> Result<Vec<String>, PolicyError> {
    if ptr.is_empty() {
        return Ok(Vec::new()); // whole document
    }
    let Some(rest) = ptr.strip_prefix('/') else {
        return Err(PolicyError::new(
            ERR_POINTER,
            format!("pointer {:?} must start with '/'", ptr),
        ));
    };

    let mut tokens = Vec::new();
    for raw in rest.split('/') {
        let mut decoded = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c != '~' {
                decoded.push(c);
                continue;
            }
            match chars.next() {
                Some('0') => decoded.push('~'),
                Some('1') => decoded.push('/'),
                Some(other) => {
                    return Err(PolicyError::new(
                        ERR_POINTER,
                        format!("bad ~{} escape in pointer {:?}", other, ptr),
                    ));
                }
                None => {
                    return Err(PolicyError::new(
                        ERR_POINTER,
                        format!("dangling ~ in pointer {:?}", ptr),
                    ));
                }
            }
        }
        tokens.push(decoded);
    }
    Ok(tokens)
}

/// Truncate every string in `doc` except those under `exempt` pointers.
///
/// All pointers are parsed before the document is touched, so a malformed
/// pointer (`ERR_POINTER`) leaves `doc` unchanged.  A pointer that matches
/// nothing is not an error.  Array elements are addressed by decimal
/// index, as in RFC 6901.
pub fn truncate_document(
    doc: &mut Value,
    config: &TruncationConfig,
    exempt: &[&str],
) -> Result<(), PolicyError> {
    let parsed = exempt
        .iter()
        .map(|ptr| parse_pointer(ptr))
        .collect::<Result<Vec<_>, PolicyError>>()?;
    let live: Vec<&[String]> = parsed.iter().map(Vec::as_slice).collect();
    walk(doc, config, &live);
    Ok(())
}

/// `live` holds the unconsumed remainder of every pointer that still
/// matches the path to `value`.  An empty remainder means `value` itself
/// is exempt.
fn walk(value: &mut Value, config: &TruncationConfig, live: &[&[String]]) {
    if live.iter().any(|rest| rest.is_empty()) {
        return;
    }
    match value {
        Value::String(s) => {
            if !config.fits(s) {
                let truncated = config.truncate(s, false).into_owned();
                *s = truncated;
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter_mut().enumerate() {
                let token = idx.to_string();
                let next = descend(live, &token);
                walk(item, config, &next);
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                let next = descend(live, key);
                walk(item, config, &next);
            }
        }
        _ => {}
    }
}

fn descend<'a>(live: &[&'a [String]], token: &str) -> Vec<&'a [String]> {
    live.iter()
        .filter(|rest| rest[0] == token)
        .map(|rest| &rest[1..])
        .collect()
}
