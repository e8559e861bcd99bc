//! Dynamic domain values with total equality, hashing, and ordering.
//!
//! [`DomainValue`] is the payload representation for the schema-driven
//! validation pipeline. Structured variants use persistent containers from
//! `im`, so every value is immutable by construction: `clone` is O(1)
//! structural sharing and no post-hoc freezing is needed.
//!
//! # Semantics
//!
//! - **Equality** is total: `NaN == NaN`, `+0 == -0`, structures compare
//!   deep structurally
//! - **Hashing** is consistent with equality via a `type:value` tagged
//!   canonical key; structured values hash their canonical JSON and fall
//!   back to a recursive tagged key when a non-finite number makes
//!   canonical JSON impossible
//! - **Ordering** is total: type rank first (null < string < number <
//!   boolean, then array < object), value order within a type; NaN sorts
//!   as the greatest number, +∞ above any finite number, -∞ below

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use im::{OrdMap, Vector};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Bit pattern all NaNs collapse to for equality and hashing.
const CANONICAL_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

/// Type tag of a [`DomainValue`].
///
/// The derived `Ord` is the cross-type rank used by [`DomainValue`]'s total
/// order; the declaration order is load-bearing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// The null value
    Null,
    /// UTF-8 text
    String,
    /// IEEE-754 double, including NaN and infinities
    Number,
    /// true or false
    Boolean,
    /// Ordered sequence of values
    Array,
    /// String-keyed map of values
    Object,
}

/// An immutable domain value.
///
/// See the module docs for equality/hash/ordering semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomainValue {
    /// The null value
    Null,
    /// UTF-8 text
    String(String),
    /// IEEE-754 double, including NaN and infinities
    Number(f64),
    /// true or false
    Bool(bool),
    /// Ordered sequence; persistent, structurally shared
    Array(Vector<DomainValue>),
    /// Sorted string-keyed map; persistent, structurally shared
    Object(OrdMap<String, DomainValue>),
}

fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        CANONICAL_NAN_BITS
    } else if n == 0.0 {
        // +0 and -0 collapse
        0
    } else {
        n.to_bits()
    }
}

fn cmp_number(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl DomainValue {
    /// The type tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::String(_) => ValueKind::String,
            Self::Number(_) => ValueKind::Number,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// Build an array value from any iterable of values.
    #[must_use]
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self::Array(items.into_iter().collect())
    }

    /// Build an object value from any iterable of entries.
    #[must_use]
    pub fn object<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Self)>,
        S: Into<String>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Check if this is the null value
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric payload, if this is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The element sequence, if this is an array.
    #[must_use]
    pub const fn as_array(&self) -> Option<&Vector<Self>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entry map, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&OrdMap<String, Self>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a field on an object value.
    ///
    /// Returns `None` for non-objects and missing fields alike.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(field))
    }

    /// The `type:value` tagged key that equality-consistent hashing uses.
    ///
    /// Structured values key on their canonical JSON; when a non-finite
    /// number makes canonical JSON impossible the recursive fallback key is
    /// used instead. Equal values always produce equal keys.
    #[must_use]
    pub fn hash_key(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::String(s) => format!("string:{s}"),
            Self::Number(n) => format!("number:{:016x}", canonical_bits(*n)),
            Self::Bool(b) => format!("boolean:{b}"),
            Self::Array(_) | Self::Object(_) => self.canonical_json().map_or_else(
                || format!("{}:{}", self.kind(), self.fallback_key()),
                |json| format!("{}:{json}", self.kind()),
            ),
        }
    }

    /// Canonical JSON rendering: sorted object keys, `-0` collapsed to `0`.
    ///
    /// Returns `None` when the value contains a non-finite number, which
    /// JSON cannot represent.
    #[must_use]
    pub fn canonical_json(&self) -> Option<String> {
        let strict = self.to_json_strict()?;
        serde_json::to_string(&strict).ok()
    }

    /// Strict JSON conversion: `None` on any non-finite number.
    fn to_json_strict(&self) -> Option<serde_json::Value> {
        match self {
            Self::Null => Some(serde_json::Value::Null),
            Self::String(s) => Some(serde_json::Value::String(s.clone())),
            Self::Number(n) => {
                let normalized = if *n == 0.0 { 0.0 } else { *n };
                serde_json::Number::from_f64(normalized).map(serde_json::Value::Number)
            }
            Self::Bool(b) => Some(serde_json::Value::Bool(*b)),
            Self::Array(items) => items
                .iter()
                .map(Self::to_json_strict)
                .collect::<Option<Vec<_>>>()
                .map(serde_json::Value::Array),
            Self::Object(map) => map
                .iter()
                .map(|(key, value)| value.to_json_strict().map(|v| (key.clone(), v)))
                .collect::<Option<serde_json::Map<_, _>>>()
                .map(serde_json::Value::Object),
        }
    }

    /// Recursive tagged key for values canonical JSON cannot represent.
    fn fallback_key(&self) -> String {
        match self {
            Self::Array(items) => {
                format!("[{}]", items.iter().map(Self::hash_key).join(","))
            }
            Self::Object(map) => format!(
                "{{{}}}",
                map.iter()
                    .map(|(key, value)| format!("{key}={}", value.hash_key()))
                    .join(",")
            ),
            other => other.hash_key(),
        }
    }
}

impl PartialEq for DomainValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for DomainValue {}

impl Hash for DomainValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_key().hash(state);
    }
}

impl PartialOrd for DomainValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DomainValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => cmp_number(*a, *b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Array(a), Self::Array(b)) => a.cmp(b),
            (Self::Object(a), Self::Object(b)) => a.cmp(b),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

/// Quotes strings; used below every top-level position.
fn write_nested(value: &DomainValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        DomainValue::String(s) => write!(f, "\"{s}\""),
        other => write!(f, "{other}"),
    }
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::String(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write_nested(item, f)?;
                }
                write!(f, "]")
            }
            Self::Object(map) => {
                write!(f, "{{")?;
                for (index, (key, value)) in map.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{key}\": ")?;
                    write_nested(value, f)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for DomainValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DomainValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for DomainValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for DomainValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for DomainValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for DomainValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<DomainValue>> for DomainValue {
    fn from(items: Vec<DomainValue>) -> Self {
        Self::array(items)
    }
}

impl From<Vector<DomainValue>> for DomainValue {
    fn from(items: Vector<DomainValue>) -> Self {
        Self::Array(items)
    }
}

impl From<OrdMap<String, DomainValue>> for DomainValue {
    fn from(map: OrdMap<String, DomainValue>) -> Self {
        Self::Object(map)
    }
}

impl From<serde_json::Value> for DomainValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::array(items.into_iter().map(Self::from)),
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<DomainValue> for serde_json::Value {
    fn from(value: DomainValue) -> Self {
        match value {
            DomainValue::Null => Self::Null,
            DomainValue::String(s) => Self::String(s),
            // Non-finite numbers have no JSON representation and map to null
            DomainValue::Number(n) => {
                serde_json::Number::from_f64(n).map_or(Self::Null, Self::Number)
            }
            DomainValue::Bool(b) => Self::Bool(b),
            DomainValue::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            DomainValue::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
