//! Exemption registry — which fields of which types are never truncated.
//!
//! Exemption is a property of a field declaration, never of a value: the
//! registry is keyed by the serde container name and the field name, and
//! is complete before any value is serialized.  Anything not registered
//! is non-exempt, so an omission truncates rather than leaks.
//!
//! Types declare their exempt fields through [`ExemptFields`], usually via
//! the [`exempt_fields!`](crate::exempt_fields) macro, and are added with
//! [`ExemptionRegistry::register`].  Registrations can also come from a
//! config document:
//!
//! ```
//! let registry: fieldcap::ExemptionRegistry =
//!     serde_json::from_str(r#"{"Transaction": ["request_body"]}"#).unwrap();
//! assert!(registry.is_exempt("Transaction", "request_body"));
//! ```
//!
//! ## Enum fields
//!
//! Which key applies depends on the serde enum representation, because
//! each one reports the variant to the serializer differently:
//!
//!   externally tagged (default)     → `"Enum::Variant"` or `"Enum"`
//!   `tag = "...", content = "..."`  → `"Enum::Variant"`
//!   `tag = "..."`, `untagged`       → `"Enum"`
//!
//! An `"Enum"` registration covers that field name in every struct variant
//! of the enum.
//!
//! ## Flattened structs
//!
//! A struct with a `#[serde(flatten)]` field is serialized as an anonymous
//! map, so its own registrations can not be found and its fields are
//! truncated.  Wrap exempt fields of such types in
//! [`Untruncated`](crate::Untruncated) instead.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use serde::{Deserialize, Serialize};

/// Static declaration of a type's exempt fields.
///
/// `TYPE_NAME` must equal the name serde sees for the type, which is the
/// Rust identifier unless `#[serde(rename = "...")]` is applied to the
/// container.
///
/// The name is not module-qualified: `a::Context` and `b::Context` share
/// one set of exemptions.  Give colliding types distinct serde names
/// (`exempt_fields!(Context as "audit.Context" => [...])` together with
/// `#[serde(rename = "audit.Context")]`), or mark the fields with
/// [`Untruncated`](crate::Untruncated) rather than registering them.
pub trait ExemptFields {
    const TYPE_NAME: &'static str;
    const FIELDS: &'static [&'static str];
}

/// Implement [`ExemptFields`] for a struct.
///
/// Field names are checked against the struct at compile time:
///
/// ```
/// #[derive(serde::Serialize)]
/// struct Transaction {
///     name: String,
///     request_body: String,
/// }
///
/// fieldcap::exempt_fields!(Transaction => [request_body]);
/// ```
///
/// Use `Type as "Name"` when the container is renamed for serde.
#[macro_export]
macro_rules! exempt_fields {
    ($ty:ident => [$($field:ident),* $(,)?]) => {
        $crate::exempt_fields!($ty as stringify!($ty) => [$($field),*]);
    };
    ($ty:ident as $name:expr => [$($field:ident),* $(,)?]) => {
        impl $crate::ExemptFields for $ty {
            const TYPE_NAME: &'static str = $name;
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
        }

        const _: () = {
            #[allow(dead_code)]
            fn assert_fields_exist(value: &$ty) {
                $(let _ = &value.$field;)*
            }
        };
    };
}

/// Type name → exempt field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExemptionRegistry {
    types: BTreeMap<String, BTreeSet<String>>,
}

impl ExemptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every exempt field declared by `T`.
    pub fn register<T: ExemptFields>(mut self) -> Self {
        let fields = self.types.entry(T::TYPE_NAME.to_string()).or_default();
        fields.extend(T::FIELDS.iter().map(|f| f.to_string()));
        self
    }

    /// Exempt a single field by name.
    ///
    /// For enum struct variants, `type_name` is `"Enum::Variant"` or
    /// `"Enum"`; see the module docs for which one each serde enum
    /// representation honours.
    pub fn exempt(mut self, type_name: impl Into<String>, field: impl Into<String>) -> Self {
        self.types
            .entry(type_name.into())
            .or_default()
            .insert(field.into());
        self
    }

    /// Whether `field` of `type_name` is exempt.  Unknown → `false`.
    pub fn is_exempt(&self, type_name: &str, field: &str) -> bool {
        self.types
            .get(type_name)
            .is_some_and(|fields| fields.contains(field))
    }

    /// Lookup for a field of an externally tagged struct variant: exempt
    /// under `"Enum::Variant"` or under `"Enum"`.
    pub fn is_variant_exempt(&self, enum_name: &str, variant: &str, field: &str) -> bool {
        self.is_exempt(enum_name, field) || self.is_qualified_exempt(enum_name, variant, field)
    }

    /// Lookup under the exact key `"outer::inner"`.  Empty `outer` → `false`.
    pub fn is_qualified_exempt(&self, outer: &str, inner: &str, field: &str) -> bool {
        if outer.is_empty() {
            return false;
        }
        // Keys sharing the `outer` prefix are contiguous from `outer`.
        self.types
            .range::<str, _>((Bound::Included(outer), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(outer))
            .find(|(key, _)| key[outer.len()..].strip_prefix("::") == Some(inner))
            .is_some_and(|(_, fields)| fields.contains(field))
    }

    /// Number of exempt (type, field) pairs.
    pub fn len(&self) -> usize {
        self.types.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
