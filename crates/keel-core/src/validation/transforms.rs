//! Named normalization transforms.
//!
//! Transforms run before the structural check, left to right. Each step
//! fires only when the current value's runtime shape matches what the
//! transform expects; an inapplicable or failing step passes the value
//! through unchanged, which keeps normalization total and idempotent.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::value::DomainValue;

/// A single normalization step.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Transform {
    /// Strip leading and trailing whitespace from a string
    Trim,
    /// Case-fold a string to lowercase
    Lowercase,
    /// Case-fold a string to uppercase
    Uppercase,
    /// Parse a string as a number; unparseable input passes through
    ParseNumber,
    /// Reformat an RFC 3339 timestamp string with a strftime format
    FormatDate {
        /// strftime format string, e.g. `%Y-%m-%d`
        format: String,
    },
}

impl Transform {
    /// Apply this transform to a value.
    ///
    /// A shape mismatch or an unusable step (unparseable number, malformed
    /// format string) returns the value unchanged.
    #[must_use]
    pub fn apply(&self, value: DomainValue) -> DomainValue {
        match (self, value) {
            (Self::Trim, DomainValue::String(s)) => DomainValue::String(s.trim().to_string()),
            (Self::Lowercase, DomainValue::String(s)) => DomainValue::String(s.to_lowercase()),
            (Self::Uppercase, DomainValue::String(s)) => DomainValue::String(s.to_uppercase()),
            (Self::ParseNumber, DomainValue::String(s)) => match s.trim().parse::<f64>() {
                Ok(n) => DomainValue::Number(n),
                Err(_) => DomainValue::String(s),
            },
            (Self::FormatDate { format }, DomainValue::String(s)) => format_date(format, s),
            (_, other) => other,
        }
    }
}

/// Reformat an RFC 3339 timestamp; any parse or format problem is a no-op.
fn format_date(format: &str, input: String) -> DomainValue {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return DomainValue::String(input);
    }
    match DateTime::parse_from_rfc3339(&input) {
        Ok(timestamp) => {
            DomainValue::String(timestamp.format_with_items(items.into_iter()).to_string())
        }
        Err(_) => DomainValue::String(input),
    }
}

/// Fold a transform list over a value, left to right.
///
/// Total: never fails, never panics. Idempotent for the defined transform
/// kinds: `normalize(normalize(v, ts), ts) == normalize(v, ts)`.
#[must_use]
pub fn normalize(value: &DomainValue, transforms: &[Transform]) -> DomainValue {
    transforms.iter().fold(value.clone(), |current, transform| {
        let next = transform.apply(current);
        trace!(%transform, "transform applied");
        next
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_trim() {
        let out = Transform::Trim.apply(DomainValue::from("  abcd  "));
        assert_eq!(out, DomainValue::from("abcd"));
    }

    #[test]
    fn test_case_fold_is_noop_on_non_string() {
        let out = Transform::Lowercase.apply(DomainValue::from(3.0));
        assert_eq!(out, DomainValue::from(3.0));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(
            Transform::ParseNumber.apply(DomainValue::from(" 42.5 ")),
            DomainValue::from(42.5)
        );
        // Unparseable input passes through
        assert_eq!(
            Transform::ParseNumber.apply(DomainValue::from("forty-two")),
            DomainValue::from("forty-two")
        );
    }

    #[test]
    fn test_format_date() {
        let out = Transform::FormatDate {
            format: "%Y-%m-%d".to_string(),
        }
        .apply(DomainValue::from("2026-08-06T12:30:00Z"));
        assert_eq!(out, DomainValue::from("2026-08-06"));
    }

    #[test]
    fn test_malformed_format_string_is_noop() {
        let out = Transform::FormatDate {
            format: "%Q".to_string(),
        }
        .apply(DomainValue::from("2026-08-06T12:30:00Z"));
        assert_eq!(out, DomainValue::from("2026-08-06T12:30:00Z"));
    }

    #[test]
    fn test_normalize_order_and_idempotence() {
        let transforms = vec![Transform::Trim, Transform::Uppercase];
        let once = normalize(&DomainValue::from("  keel  "), &transforms);
        assert_eq!(once, DomainValue::from("KEEL"));
        assert_eq!(normalize(&once, &transforms), once);
    }

    #[test]
    fn test_empty_transform_list_returns_input() {
        let input = DomainValue::from("  raw  ");
        assert_eq!(normalize(&input, &[]), input);
    }
}
