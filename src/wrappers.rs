//! `Untruncated<T>` — a field wrapper that is always exempt.
//!
//! The alternative to registering a field: wrap its type instead.  The
//! exemption then travels with the field declaration wherever the type is
//! used, without touching the registry.

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::UNTRUNCATED_TOKEN;

/// Wrapped value is emitted verbatim by the truncating serializer,
/// including every string nested below it.
///
/// Serializes as a newtype struct under a reserved name, which is
/// transparent for JSON and most other formats.  Deserializes as `T`.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Untruncated<T>(pub T);

impl<T> Untruncated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Untruncated<T> {
    fn from(value: T) -> Self {
        Untruncated(value)
    }
}

impl<T> Deref for Untruncated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Untruncated<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Untruncated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: Serialize> Serialize for Untruncated<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(UNTRUNCATED_TOKEN, &self.0)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Untruncated<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Untruncated)
    }
}
