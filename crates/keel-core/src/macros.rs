//! Invariant checking macro for the domain layer.
//!
//! Invariant violations are returned as errors, never panics. The macro is
//! used for the defensive checks that run after validation nominally
//! passed, e.g. confirming a normalized value still matches its schema
//! before a value object is constructed.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

/// Runtime invariant check with custom error.
///
/// Returns early with the provided error if the condition is false. The
/// enclosing function must return a `Result` whose error type matches.
///
/// # Example
///
/// ```rust
/// use keel_core::{invariant, DomainError, DomainResult};
///
/// fn non_negative(balance: f64) -> DomainResult<f64> {
///     invariant!(
///         balance >= 0.0,
///         DomainError::construction(format!("negative balance: {balance}"))
///     );
///     Ok(balance)
/// }
///
/// assert!(non_negative(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! invariant {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}
