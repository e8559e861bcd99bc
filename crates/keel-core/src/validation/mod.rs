//! Schema-driven validation and normalization.
//!
//! A [`ValidationSpec`] is plain data owned by each value-object or entity
//! kind: a structural [`Schema`], an ordered list of [`Transform`]s, and
//! optional [`MessageOverrides`]. Validation compiles nothing at runtime
//! and is total — malformed specs surface as an error result, never a
//! panic.
//!
//! # Pipeline
//!
//! 1. Apply the transforms left to right (skipped when disabled or empty);
//!    a transform only fires when the value's runtime shape matches, and a
//!    failing step passes the value through unchanged
//! 2. Check the structural schema against the normalized value in
//!    deterministic traversal order
//! 3. Success returns the normalized value; failure returns one message
//!    per violated constraint, resolved with the override precedence
//!    (exact path + keyword, then keyword-global, then the built-in
//!    template)
//! 4. An internal engine failure (e.g. a malformed pattern) is reported as
//!    the single generic [`PROCESS_FAILED_MESSAGE`]

pub mod engine;
pub mod spec;
pub mod transforms;

pub use engine::{ValidateOptions, ValidationResult, PROCESS_FAILED_MESSAGE};
pub use spec::{Format, Keyword, MessageOverrides, Schema, SchemaType, ValidationSpec};
pub use transforms::{normalize, Transform};
