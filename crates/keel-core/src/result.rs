//! Lifting helpers for the `Result` discipline.
//!
//! The kernel's fallible-computation type is `std::result::Result` itself,
//! aliased as [`DomainResult`]. The inherent combinators cover most of the
//! surface (`map`, `map_err`, `and_then`, `unwrap_or`); this module adds
//! what the standard library does not:
//!
//! - [`try_catch`] / [`try_catch_async`] lift an operation whose error
//!   converts `Into<DomainError>` into a `DomainResult`
//! - [`ResultExt::trace_err`] logs a failure at the boundary without
//!   consuming it

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::future::Future;

use tracing::debug;

use crate::error::{DomainError, DomainResult};

/// Run a fallible operation and fold its error into the domain taxonomy.
///
/// # Errors
///
/// Returns the operation's error converted via `Into<DomainError>`.
pub fn try_catch<T, E, F>(operation: F) -> DomainResult<T>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<DomainError>,
{
    operation().map_err(Into::into)
}

/// Await a fallible operation and fold its error into the domain taxonomy.
///
/// Identical semantics to [`try_catch`]; offered for callers in an event
/// loop that must not block.
///
/// # Errors
///
/// Returns the operation's error converted via `Into<DomainError>`.
pub async fn try_catch_async<T, E, Fut>(operation: Fut) -> DomainResult<T>
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<DomainError>,
{
    operation.await.map_err(Into::into)
}

/// Boundary-logging extension for [`DomainResult`].
pub trait ResultExt<T> {
    /// Log the contained error at debug level, passing the result through.
    #[must_use]
    fn trace_err(self, context: &str) -> Self;
}

impl<T> ResultExt<T> for DomainResult<T> {
    fn trace_err(self, context: &str) -> Self {
        if let Err(error) = &self {
            debug!(%error, context, "domain operation failed");
        }
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn parse_digit(input: &str) -> Result<u32, DomainError> {
        input
            .parse()
            .map_err(|_| DomainError::validation_message("not a digit"))
    }

    #[test]
    fn test_try_catch_success() {
        let result = try_catch(|| parse_digit("7"));
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn test_try_catch_failure_converts_error() {
        let result: DomainResult<u32> = try_catch(|| parse_digit("x"));
        assert!(result.expect_err("must fail").is_validation());
    }

    #[test]
    fn test_try_catch_async_matches_sync_path() {
        let outcome = tokio_test::block_on(try_catch_async(async { parse_digit("4") }));
        assert_eq!(outcome, try_catch(|| parse_digit("4")));
    }

    #[test]
    fn test_trace_err_passes_value_through() {
        let ok: DomainResult<u32> = Ok(1);
        assert_eq!(ok.trace_err("ctx"), Ok(1));

        let err: DomainResult<u32> = Err(DomainError::rule_violation("no"));
        assert!(err.trace_err("ctx").is_err());
    }
}
