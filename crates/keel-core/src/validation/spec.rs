//! Declarative validation specs: structural schemas, transform lists, and
//! message overrides.
//!
//! A [`Schema`] is built fluently and never compiled: constraints that need
//! compilation (the `pattern` keyword) are checked lazily by the engine so
//! a malformed spec is an error result, not a construction panic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::validation::transforms::Transform;
use crate::value::{DomainValue, ValueKind};

// ============================================================================
// SCHEMA
// ============================================================================

/// Expected type of a value under validation.
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
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SchemaType {
    /// Only the null value
    Null,
    /// Any string
    String,
    /// Any number, including NaN and infinities
    Number,
    /// A finite number with no fractional part
    Integer,
    /// true or false
    Boolean,
    /// An array
    Array,
    /// An object
    Object,
    /// Any value; type checking is skipped
    Any,
}

/// Well-known string formats checked by the `format` keyword.
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
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// local@domain with a dotted domain part
    Email,
    /// RFC 4122 textual UUID
    Uuid,
    /// ISO calendar date, `YYYY-MM-DD`
    Date,
    /// RFC 3339 timestamp
    DateTime,
}

/// Constraint keyword behind a violation; custom messages are keyed on it.
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
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Keyword {
    /// Value has the wrong type
    Type,
    /// A required object field is missing
    Required,
    /// String shorter than `min_length`
    MinLength,
    /// String longer than `max_length`
    MaxLength,
    /// Number below `minimum`
    Minimum,
    /// Number above `maximum`
    Maximum,
    /// String does not match `pattern`
    Pattern,
    /// String does not match the declared `format`
    Format,
    /// Array shorter than `min_items`
    MinItems,
    /// Array longer than `max_items`
    MaxItems,
    /// Array contains duplicate items
    UniqueItems,
    /// Object carries a field the schema does not declare
    UnexpectedField,
}

/// Structural schema for a single value.
///
/// Built fluently:
///
/// ```rust
/// use keel_core::{Schema, Format};
///
/// let schema = Schema::object()
///     .require("email")
///     .property("email", Schema::string().format(Format::Email))
///     .property("age", Schema::integer().minimum(0.0))
///     .closed();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(crate) kind: SchemaType,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) pattern: Option<String>,
    pub(crate) format: Option<Format>,
    pub(crate) minimum: Option<f64>,
    pub(crate) maximum: Option<f64>,
    pub(crate) required: Vec<String>,
    // Declared order drives deterministic violation ordering
    pub(crate) properties: Vec<(String, Schema)>,
    pub(crate) additional_properties: bool,
    pub(crate) items: Option<Box<Schema>>,
    pub(crate) min_items: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) unique_items: bool,
}

impl Schema {
    fn of(kind: SchemaType) -> Self {
        Self {
            kind,
            min_length: None,
            max_length: None,
            pattern: None,
            format: None,
            minimum: None,
            maximum: None,
            required: Vec::new(),
            properties: Vec::new(),
            additional_properties: true,
            items: None,
            min_items: None,
            max_items: None,
            unique_items: false,
        }
    }

    /// A schema matching only null.
    #[must_use]
    pub fn null() -> Self {
        Self::of(SchemaType::Null)
    }

    /// A schema matching any string.
    #[must_use]
    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    /// A schema matching any number.
    #[must_use]
    pub fn number() -> Self {
        Self::of(SchemaType::Number)
    }

    /// A schema matching finite numbers with no fractional part.
    #[must_use]
    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    /// A schema matching booleans.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of(SchemaType::Boolean)
    }

    /// A schema matching arrays.
    #[must_use]
    pub fn array() -> Self {
        Self::of(SchemaType::Array)
    }

    /// A schema matching objects.
    #[must_use]
    pub fn object() -> Self {
        Self::of(SchemaType::Object)
    }

    /// A schema matching any value.
    #[must_use]
    pub fn any() -> Self {
        Self::of(SchemaType::Any)
    }

    /// The expected type.
    #[must_use]
    pub const fn kind(&self) -> SchemaType {
        self.kind
    }

    /// Whether a value's runtime type satisfies this schema's type keyword.
    #[must_use]
    pub fn accepts(&self, value: &DomainValue) -> bool {
        match self.kind {
            SchemaType::Any => true,
            SchemaType::Null => value.kind() == ValueKind::Null,
            SchemaType::String => value.kind() == ValueKind::String,
            SchemaType::Number => value.kind() == ValueKind::Number,
            SchemaType::Integer => value
                .as_number()
                .is_some_and(|n| n.is_finite() && n.fract() == 0.0),
            SchemaType::Boolean => value.kind() == ValueKind::Boolean,
            SchemaType::Array => value.kind() == ValueKind::Array,
            SchemaType::Object => value.kind() == ValueKind::Object,
        }
    }

    /// Set the minimum string length (in characters).
    #[must_use]
    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set the maximum string length (in characters).
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Require the string to match a regular expression.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Require the string to match a well-known format.
    #[must_use]
    pub const fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the inclusive numeric lower bound.
    #[must_use]
    pub const fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    /// Set the inclusive numeric upper bound.
    #[must_use]
    pub const fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }

    /// Mark an object field as required.
    #[must_use]
    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required.push(field.into());
        self
    }

    /// Declare an object field's schema. Declaration order is preserved.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Self) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    /// Reject object fields not declared via [`Schema::property`].
    #[must_use]
    pub const fn closed(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    /// Set the schema every array element must satisfy.
    #[must_use]
    pub fn items(mut self, schema: Self) -> Self {
        self.items = Some(Box::new(schema));
        self
    }

    /// Set the minimum array length.
    #[must_use]
    pub const fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    /// Set the maximum array length.
    #[must_use]
    pub const fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Reject arrays with duplicate items.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique_items = true;
        self
    }
}

// ============================================================================
// MESSAGE OVERRIDES
// ============================================================================

/// Custom error messages, resolved per violation in precedence order:
/// exact path + keyword first, then keyword-global.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOverrides {
    by_path: BTreeMap<(String, Keyword), String>,
    by_keyword: BTreeMap<Keyword, String>,
}

impl MessageOverrides {
    /// Create an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the message for one keyword at one exact path.
    #[must_use]
    pub fn at_path(
        mut self,
        path: impl Into<String>,
        keyword: Keyword,
        message: impl Into<String>,
    ) -> Self {
        self.by_path.insert((path.into(), keyword), message.into());
        self
    }

    /// Override the message for a keyword wherever it fires.
    #[must_use]
    pub fn for_keyword(mut self, keyword: Keyword, message: impl Into<String>) -> Self {
        self.by_keyword.insert(keyword, message.into());
        self
    }

    pub(crate) fn lookup(&self, path: &str, keyword: Keyword) -> Option<&String> {
        self.by_path
            .get(&(path.to_string(), keyword))
            .or_else(|| self.by_keyword.get(&keyword))
    }
}

// ============================================================================
// VALIDATION SPEC
// ============================================================================

/// The full declarative description one kind of value validates against.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSpec {
    pub(crate) schema: Schema,
    pub(crate) transforms: Vec<Transform>,
    pub(crate) messages: MessageOverrides,
}

impl ValidationSpec {
    /// Create a spec with no transforms and no message overrides.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            transforms: Vec::new(),
            messages: MessageOverrides::default(),
        }
    }

    /// Append a transform. Declaration order is application order.
    #[must_use]
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Override a keyword's message wherever it fires.
    #[must_use]
    pub fn message(mut self, keyword: Keyword, message: impl Into<String>) -> Self {
        self.messages = self.messages.for_keyword(keyword, message);
        self
    }

    /// Override a keyword's message at one exact path.
    #[must_use]
    pub fn message_at(
        mut self,
        path: impl Into<String>,
        keyword: Keyword,
        message: impl Into<String>,
    ) -> Self {
        self.messages = self.messages.at_path(path, keyword, message);
        self
    }

    /// The structural schema.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The ordered transform list.
    #[must_use]
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_accepts_integer_rejects_fractions() {
        let schema = Schema::integer();
        assert!(schema.accepts(&DomainValue::from(4.0)));
        assert!(!schema.accepts(&DomainValue::from(4.5)));
        assert!(!schema.accepts(&DomainValue::Number(f64::NAN)));
        assert!(!schema.accepts(&DomainValue::from("4")));
    }

    #[test]
    fn test_accepts_any() {
        let schema = Schema::any();
        assert!(schema.accepts(&DomainValue::Null));
        assert!(schema.accepts(&DomainValue::from(true)));
    }

    #[test]
    fn test_property_order_is_declaration_order() {
        let schema = Schema::object()
            .property("z", Schema::string())
            .property("a", Schema::number());
        let names: Vec<&str> = schema
            .properties
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, ["z", "a"]);
    }

    #[test]
    fn test_override_precedence_lookup() {
        let overrides = MessageOverrides::new()
            .for_keyword(Keyword::MinLength, "global")
            .at_path("name", Keyword::MinLength, "exact");

        assert_eq!(
            overrides.lookup("name", Keyword::MinLength),
            Some(&"exact".to_string())
        );
        assert_eq!(
            overrides.lookup("other", Keyword::MinLength),
            Some(&"global".to_string())
        );
        assert_eq!(overrides.lookup("name", Keyword::Pattern), None);
    }
}
