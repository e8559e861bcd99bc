//! Validated immutable value objects.
//!
//! A concrete kind is a zero-sized type implementing [`ValueObjectKind`]:
//! it names itself and supplies the [`ValidationSpec`] its payloads must
//! satisfy. [`ValueObject<K>`] can only be obtained through the validating
//! factories — there is no constructor that accepts unvalidated input, so
//! an instance is proof its payload passed the kind's spec.
//!
//! Kinds are distinct generic parameters: comparing value objects of
//! different kinds is a compile error rather than a runtime check.
//!
//! # Example
//!
//! ```rust
//! use keel_core::{Schema, Transform, ValidationSpec, ValueObject, ValueObjectKind};
//!
//! struct UserName;
//!
//! impl ValueObjectKind for UserName {
//!     const KIND: &'static str = "user-name";
//!
//!     fn spec() -> ValidationSpec {
//!         ValidationSpec::new(Schema::string().min_length(3)).transform(Transform::Trim)
//!     }
//! }
//!
//! let name = ValueObject::<UserName>::create("  ada  ")?;
//! assert_eq!(name.value().as_str(), Some("ada"));
//! # Ok::<(), keel_core::DomainError>(())
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DomainError, DomainResult};
use crate::invariant;
use crate::validation::ValidationSpec;
use crate::value::DomainValue;

/// One kind of value object: a name plus the spec its payloads satisfy.
///
/// The spec is fetched without instantiating anything, so rejection paths
/// allocate no value object.
pub trait ValueObjectKind {
    /// Stable name of this kind, used in diagnostics and hashing.
    const KIND: &'static str;

    /// The validation spec every payload of this kind must satisfy.
    fn spec() -> ValidationSpec;
}

/// An immutable, validated value container.
///
/// Equality, hashing, and ordering delegate to the payload
/// ([`DomainValue`] semantics: `NaN == NaN`, `+0 == -0`, structural
/// comparison for containers).
pub struct ValueObject<K: ValueObjectKind> {
    value: DomainValue,
    _kind: PhantomData<K>,
}

impl<K: ValueObjectKind> ValueObject<K> {
    /// Validate a raw value and construct on success.
    ///
    /// The payload stored is the *normalized* output of the kind's spec,
    /// not the raw input.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` with the ordered message list when the
    /// spec rejects the input; `DomainError::Construction` if the
    /// normalized value fails the defensive post-validation check.
    pub fn create(raw: impl Into<DomainValue>) -> DomainResult<Self> {
        let raw = raw.into();
        let spec = K::spec();
        let outcome = spec.validate(&raw);
        if !outcome.valid {
            debug!(kind = K::KIND, errors = ?outcome.errors, "value object rejected");
            return Err(DomainError::validation(outcome.errors));
        }
        Self::from_normalized(outcome.value, &spec)
    }

    /// Async variant of [`ValueObject::create`] with identical semantics,
    /// for callers in an event loop that must not block.
    ///
    /// # Errors
    ///
    /// See [`ValueObject::create`].
    pub async fn create_async(raw: impl Into<DomainValue>) -> DomainResult<Self> {
        Self::create(raw)
    }

    fn from_normalized(value: DomainValue, spec: &ValidationSpec) -> DomainResult<Self> {
        invariant!(
            spec.schema().accepts(&value),
            DomainError::construction(format!(
                "normalized {} payload has kind {}, which its own schema rejects",
                K::KIND,
                value.kind()
            ))
        );
        Ok(Self {
            value,
            _kind: PhantomData,
        })
    }

    /// The validated payload.
    #[must_use]
    pub const fn value(&self) -> &DomainValue {
        &self.value
    }

    /// Consume self, returning the payload.
    #[must_use]
    pub fn into_value(self) -> DomainValue {
        self.value
    }

    /// Plain string rendering of the payload, used for aggregate ids and
    /// log fields. Strings render without quotes.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        self.value.to_string()
    }

    /// Build a new instance of the same kind from a transformed payload.
    ///
    /// The transform result is **not** re-validated: the caller either
    /// supplies a validity-preserving function or re-validates downstream
    /// with `K::spec().validate(..)`.
    #[must_use]
    pub fn map(&self, transform: impl FnOnce(&DomainValue) -> DomainValue) -> Self {
        Self {
            value: transform(&self.value),
            _kind: PhantomData,
        }
    }

    /// Keep this instance if the predicate holds.
    ///
    /// # Errors
    ///
    /// `DomainError::RuleViolation` when the predicate rejects the payload.
    pub fn filter(&self, predicate: impl FnOnce(&DomainValue) -> bool) -> DomainResult<Self> {
        if predicate(&self.value) {
            Ok(self.clone())
        } else {
            Err(DomainError::rule_violation(format!(
                "{} value rejected by filter",
                K::KIND
            )))
        }
    }

    /// Fold [`ValueObject::map`] over an ordered function list, left to
    /// right. An empty list returns `self` unchanged.
    #[must_use]
    pub fn pipe(&self, transforms: &[fn(&DomainValue) -> DomainValue]) -> Self {
        transforms
            .iter()
            .fold(self.clone(), |current, transform| current.map(*transform))
    }
}

impl<K: ValueObjectKind> Clone for ValueObject<K> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: ValueObjectKind> fmt::Debug for ValueObject<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueObject")
            .field("kind", &K::KIND)
            .field("value", &self.value)
            .finish()
    }
}

impl<K: ValueObjectKind> fmt::Display for ValueObject<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<K: ValueObjectKind> PartialEq for ValueObject<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K: ValueObjectKind> Eq for ValueObject<K> {}

impl<K: ValueObjectKind> Hash for ValueObject<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        K::KIND.hash(state);
        self.value.hash(state);
    }
}

impl<K: ValueObjectKind> PartialOrd for ValueObject<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: ValueObjectKind> Ord for ValueObject<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<K: ValueObjectKind> Serialize for ValueObject<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, K: ValueObjectKind> Deserialize<'de> for ValueObject<K> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = DomainValue::deserialize(deserializer)?;
        Self::create(raw).map_err(serde::de::Error::custom)
    }
}
