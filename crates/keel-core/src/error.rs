//! Domain error taxonomy.
//!
//! Every expected failure in the kernel is one of a small, closed set of
//! variants. All public operations that can fail return
//! [`DomainResult`] — no panic crosses an API boundary.
//!
//! # Error Categories
//!
//! 1. **`Validation`**: schema or transform rejection; carries the ordered,
//!    non-empty message list produced by the validation engine
//! 2. **`Construction`**: an invariant check inside a constructor failed
//!    after validation nominally passed
//! 3. **`UnhandledEvent`**: an aggregate's dispatch table has no arm for the
//!    event's type tag
//! 4. **`RuleViolation`**: an aggregate-level business rule rejected an
//!    operation

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by every fallible kernel operation.
pub type DomainResult<T> = Result<T, DomainError>;

/// Unified error type for all domain failures.
///
/// Expected failures are data, not exceptions: callers match on the variant
/// and recover. Internal failures (a malformed schema, a transform that
/// cannot run) are converted into one of these variants at the nearest
/// boundary rather than propagating.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainError {
    /// Input was rejected by a validation spec.
    ///
    /// The message list is ordered (one message per violated constraint)
    /// and never empty.
    #[error("validation failed: {}", .messages.join("; "))]
    Validation {
        /// Human-readable messages, one per violation, in check order
        messages: Vec<String>,
    },

    /// A constructor invariant failed after validation passed.
    #[error("construction failed: {reason}")]
    Construction {
        /// What the defensive check found
        reason: String,
    },

    /// An event carried a type tag the aggregate does not dispatch on.
    #[error("unhandled event type '{event_type}'")]
    UnhandledEvent {
        /// The event's declared type tag
        event_type: String,
    },

    /// A business rule rejected the operation.
    #[error("domain rule violated: {rule}")]
    RuleViolation {
        /// Which rule was violated
        rule: String,
    },
}

impl DomainError {
    /// Create a `Validation` error from an ordered message list.
    #[must_use]
    pub fn validation<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a `Validation` error carrying a single message.
    #[must_use]
    pub fn validation_message(message: impl Into<String>) -> Self {
        Self::Validation {
            messages: vec![message.into()],
        }
    }

    /// Create a `Construction` error.
    #[must_use]
    pub fn construction(reason: impl Into<String>) -> Self {
        Self::Construction {
            reason: reason.into(),
        }
    }

    /// Create an `UnhandledEvent` error.
    #[must_use]
    pub fn unhandled_event(event_type: impl Into<String>) -> Self {
        Self::UnhandledEvent {
            event_type: event_type.into(),
        }
    }

    /// Create a `RuleViolation` error.
    #[must_use]
    pub fn rule_violation(rule: impl Into<String>) -> Self {
        Self::RuleViolation { rule: rule.into() }
    }

    /// Check if this is a `Validation` error
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a `Construction` error
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(self, Self::Construction { .. })
    }

    /// Check if this is an `UnhandledEvent` error
    #[must_use]
    pub const fn is_unhandled_event(&self) -> bool {
        matches!(self, Self::UnhandledEvent { .. })
    }

    /// Check if this is a `RuleViolation` error
    #[must_use]
    pub const fn is_rule_violation(&self) -> bool {
        matches!(self, Self::RuleViolation { .. })
    }

    /// The ordered validation messages, or an empty slice for other variants.
    #[must_use]
    pub fn validation_messages(&self) -> &[String] {
        match self {
            Self::Validation { messages } => messages,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_validation_display_joins_messages() {
        let error = DomainError::validation(["too short", "bad pattern"]);
        assert_eq!(
            error.to_string(),
            "validation failed: too short; bad pattern"
        );
    }

    #[test]
    fn test_predicates_match_variants() {
        assert!(DomainError::validation_message("nope").is_validation());
        assert!(DomainError::construction("bad kind").is_construction());
        assert!(DomainError::unhandled_event("audited").is_unhandled_event());
        assert!(DomainError::rule_violation("overdraft").is_rule_violation());
        assert!(!DomainError::rule_violation("overdraft").is_validation());
    }

    #[test]
    fn test_validation_messages_accessor() {
        let error = DomainError::validation(["a", "b"]);
        assert_eq!(error.validation_messages(), ["a", "b"]);
        assert!(DomainError::construction("x").validation_messages().is_empty());
    }

    #[test]
    fn test_error_serialization_roundtrip() {
        let error = DomainError::unhandled_event("renamed");
        let json = serde_json::to_string(&error).expect("serialization failed");
        let back: DomainError = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(error, back);
    }
}
