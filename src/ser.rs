//! Graph-walk integration — a serde `Serializer` adapter that applies the
//! truncation engine while another serializer writes the document.
//!
//! [`TruncationPolicy::apply`] wraps a value in [`Truncated`].  Serializing
//! that wrapper runs the value's own `Serialize` impl against a
//! [`TruncatingSerializer`], which forwards every call to the real
//! serializer and only intercepts three things:
//!
//!   struct fields   → exemption resolved against the registry
//!   string scalars  → rewritten by the engine unless exempt
//!   Untruncated<T>  → everything below is exempt
//!
//! Exemption only ever widens while descending: once a field is exempt,
//! every string reachable through it (sequence elements, map values,
//! nested structs, options, newtypes) is emitted verbatim.  Map keys are
//! never rewritten.  Field order, `None`, skipped fields and non-string
//! values reach the inner serializer untouched.

use std::borrow::Cow;

use serde::ser::{
    Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};

use crate::config::TruncationConfig;
use crate::constants::UNTRUNCATED_TOKEN;
use crate::registry::ExemptionRegistry;

// ── Policy ───────────────────────────────────────────────────

/// Configuration plus exemption registry: everything a serialization pass
/// needs.  Immutable once built, so one policy can be shared by any number
/// of concurrent serializations.
#[derive(Debug, Clone)]
pub struct TruncationPolicy {
    config: TruncationConfig,
    registry: ExemptionRegistry,
}

impl TruncationPolicy {
    pub fn new(config: TruncationConfig, registry: ExemptionRegistry) -> Self {
        tracing::debug!(
            max_length = config.max_length(),
            exempt_fields = registry.len(),
            "built truncation policy"
        );
        Self { config, registry }
    }

    /// Policy over the process-wide configuration.
    pub fn with_registry(registry: ExemptionRegistry) -> Self {
        Self::new(TruncationConfig::global().clone(), registry)
    }

    pub fn config(&self) -> &TruncationConfig {
        &self.config
    }

    pub fn registry(&self) -> &ExemptionRegistry {
        &self.registry
    }

    /// Wrap `value` so that serializing it applies this policy.
    pub fn apply<'a, T: ?Sized + Serialize>(&'a self, value: &'a T) -> Truncated<'a, T> {
        Truncated {
            value,
            policy: self,
        }
    }
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        Self::with_registry(ExemptionRegistry::new())
    }
}

/// A value paired with the policy to serialize it under.
pub struct Truncated<'a, T: ?Sized> {
    value: &'a T,
    policy: &'a TruncationPolicy,
}

impl<T: ?Sized + Serialize> Serialize for Truncated<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value
            .serialize(TruncatingSerializer::new(serializer, self.policy))
    }
}

// ── Scope ────────────────────────────────────────────────────
// What the walk knows about the value being serialized: the policy, the
// exemption inherited from the enclosing field, and the owning type and
// field for log output.

#[derive(Clone, Copy)]
struct Scope<'p> {
    policy: &'p TruncationPolicy,
    exempt: bool,
    owner: &'static str,
    field: &'static str,
}

impl<'p> Scope<'p> {
    fn root(policy: &'p TruncationPolicy) -> Self {
        Scope {
            policy,
            exempt: false,
            owner: "",
            field: "",
        }
    }

    /// `parent` is the type whose field holds the `owner` struct.  An
    /// adjacently tagged variant arrives as a struct named after the
    /// variant inside a struct named after the enum, so `"Parent::Owner"`
    /// is consulted as well.
    fn enter_field(
        self,
        owner: &'static str,
        variant: Option<&'static str>,
        parent: &'static str,
        field: &'static str,
    ) -> Self {
        let registry = &self.policy.registry;
        let exempt = self.exempt
            || match variant {
                Some(variant) => registry.is_variant_exempt(owner, variant, field),
                None => {
                    registry.is_exempt(owner, field)
                        || registry.is_qualified_exempt(parent, owner, field)
                }
            };
        Scope {
            exempt,
            owner,
            field,
            ..self
        }
    }

    fn exempted(self) -> Self {
        Scope {
            exempt: true,
            ..self
        }
    }

    fn rewrite<'v>(&self, value: &'v str) -> Cow<'v, str> {
        let out = self.policy.config.truncate(value, self.exempt);
        if matches!(out, Cow::Owned(_)) {
            tracing::trace!(
                owner = self.owner,
                field = self.field,
                original_bytes = value.len(),
                "truncated string value"
            );
        }
        out
    }
}

/// A child value carrying the scope it is serialized under.
struct Scoped<'p, 'v, T: ?Sized> {
    value: &'v T,
    scope: Scope<'p>,
}

impl<'p, 'v, T: ?Sized> Scoped<'p, 'v, T> {
    fn new(value: &'v T, scope: Scope<'p>) -> Self {
        Scoped { value, scope }
    }
}

impl<T: ?Sized + Serialize> Serialize for Scoped<'_, '_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(TruncatingSerializer {
            inner: serializer,
            scope: self.scope,
        })
    }
}

// ── Serializer adapter ───────────────────────────────────────

/// Forwards to `S`, rewriting string values under the policy.
pub struct TruncatingSerializer<'p, S> {
    inner: S,
    scope: Scope<'p>,
}

impl<'p, S: Serializer> TruncatingSerializer<'p, S> {
    pub fn new(inner: S, policy: &'p TruncationPolicy) -> Self {
        TruncatingSerializer {
            inner,
            scope: Scope::root(policy),
        }
    }
}

macro_rules! forward_scalars {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<S::Ok, S::Error> {
                self.inner.$method(v)
            }
        )*
    };
}

impl<'p, S: Serializer> Serializer for TruncatingSerializer<'p, S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = Compound<'p, S::SerializeSeq>;
    type SerializeTuple = Compound<'p, S::SerializeTuple>;
    type SerializeTupleStruct = Compound<'p, S::SerializeTupleStruct>;
    type SerializeTupleVariant = Compound<'p, S::SerializeTupleVariant>;
    type SerializeMap = Compound<'p, S::SerializeMap>;
    type SerializeStruct = Compound<'p, S::SerializeStruct>;
    type SerializeStructVariant = Compound<'p, S::SerializeStructVariant>;

    forward_scalars! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_f32: f32,
        serialize_f64: f64,
        serialize_char: char,
        serialize_bytes: &[u8],
    }

    fn serialize_str(self, v: &str) -> Result<S::Ok, S::Error> {
        let out = self.scope.rewrite(v);
        self.inner.serialize_str(&out)
    }

    fn serialize_none(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_none()
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<S::Ok, S::Error> {
        self.inner.serialize_some(&Scoped::new(value, self.scope))
    }

    fn serialize_unit(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit()
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<S::Ok, S::Error> {
        self.inner
            .serialize_unit_variant(name, variant_index, variant)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        let scope = if name == UNTRUNCATED_TOKEN {
            self.scope.exempted()
        } else {
            self.scope
        };
        self.inner
            .serialize_newtype_struct(name, &Scoped::new(value, scope))
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        self.inner.serialize_newtype_variant(
            name,
            variant_index,
            variant,
            &Scoped::new(value, self.scope),
        )
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, S::Error> {
        let inner = self.inner.serialize_seq(len)?;
        Ok(Compound::new(inner, self.scope))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, S::Error> {
        let inner = self.inner.serialize_tuple(len)?;
        Ok(Compound::new(inner, self.scope))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, S::Error> {
        let inner = self.inner.serialize_tuple_struct(name, len)?;
        Ok(Compound::new(inner, self.scope))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, S::Error> {
        let inner = self
            .inner
            .serialize_tuple_variant(name, variant_index, variant, len)?;
        Ok(Compound::new(inner, self.scope))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, S::Error> {
        let inner = self.inner.serialize_map(len)?;
        Ok(Compound::new(inner, self.scope))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, S::Error> {
        let inner = self.inner.serialize_struct(name, len)?;
        Ok(Compound::with_owner(inner, self.scope, name, None))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, S::Error> {
        let inner = self
            .inner
            .serialize_struct_variant(name, variant_index, variant, len)?;
        Ok(Compound::with_owner(inner, self.scope, name, Some(variant)))
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

// ── Compound adapters ────────────────────────────────────────
// One wrapper for every compound kind.  Sequences, tuples and maps hand
// their scope to each element unchanged; structs resolve a new scope per
// field.

/// In-progress compound value under a truncation scope.
pub struct Compound<'p, C> {
    inner: C,
    scope: Scope<'p>,
    owner: &'static str,
    variant: Option<&'static str>,
    parent: &'static str,
}

impl<'p, C> Compound<'p, C> {
    fn new(inner: C, scope: Scope<'p>) -> Self {
        Compound {
            inner,
            scope,
            owner: scope.owner,
            variant: None,
            parent: "",
        }
    }

    fn with_owner(
        inner: C,
        scope: Scope<'p>,
        owner: &'static str,
        variant: Option<&'static str>,
    ) -> Self {
        Compound {
            inner,
            scope,
            owner,
            variant,
            parent: scope.owner,
        }
    }

    fn field_scope(&self, field: &'static str) -> Scope<'p> {
        self.scope
            .enter_field(self.owner, self.variant, self.parent, field)
    }
}

impl<C: SerializeSeq> SerializeSeq for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_element(&Scoped::new(value, self.scope))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTuple> SerializeTuple for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_element(&Scoped::new(value, self.scope))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleStruct> SerializeTupleStruct for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_field(&Scoped::new(value, self.scope))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleVariant> SerializeTupleVariant for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_field(&Scoped::new(value, self.scope))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeMap> SerializeMap for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    // Keys go straight to the inner serializer: never truncated.
    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), C::Error> {
        self.inner.serialize_key(key)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), C::Error> {
        self.inner.serialize_value(&Scoped::new(value, self.scope))
    }

    fn serialize_entry<K: ?Sized + Serialize, V: ?Sized + Serialize>(
        &mut self,
        key: &K,
        value: &V,
    ) -> Result<(), C::Error> {
        self.inner
            .serialize_entry(key, &Scoped::new(value, self.scope))
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeStruct> SerializeStruct for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        let scope = self.field_scope(key);
        self.inner.serialize_field(key, &Scoped::new(value, scope))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}

impl<C: SerializeStructVariant> SerializeStructVariant for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), C::Error> {
        let scope = self.field_scope(key);
        self.inner.serialize_field(key, &Scoped::new(value, scope))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), C::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<C::Ok, C::Error> {
        self.inner.end()
    }
}
