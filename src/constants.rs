//! Truncation constants — default bound, ellipsis marker, and the reserved
//! serde token used by the exemption wrapper.

/// Default maximum string length after truncation, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 1024;

/// Suffix appended to every truncated string.  Counts against the
/// maximum length.
pub const ELLIPSIS: &str = "...";

/// Newtype-struct name emitted by [`Untruncated`](crate::Untruncated).
///
/// The truncating serializer recognises this name and exempts the wrapped
/// value.  Every other serializer treats it like any newtype struct, so
/// the wrapper stays invisible in the produced document.
pub const UNTRUNCATED_TOKEN: &str = "$fieldcap::private::Untruncated";
