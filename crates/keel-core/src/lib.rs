//! # Keel Core
//!
//! A domain-modeling kernel: composable primitives for building consistent
//! business models with explicit, total error handling.
//!
//! ## Primitives
//!
//! - **[`DomainResult`]** — every fallible operation returns a `Result`;
//!   no exception crosses an API boundary
//! - **[`ValidationSpec`]** — a declarative schema + transform pipeline
//!   producing a normalized value or an ordered list of human-readable
//!   errors
//! - **[`ValueObject`]** — an immutable container whose construction is
//!   gated by its kind's spec; value equality with pinned NaN/±0
//!   semantics
//! - **[`Entity`]** — identity plus state; equality is identity equality
//! - **[`AggregateRoot`]** — an entity with a monotonic version counter
//!   and an event-sourcing protocol (apply one event, replay a history,
//!   accumulate pending events for publication)
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Design Principles
//!
//! ### Parse at Boundaries, Validate Once
//!
//! ```rust
//! use keel_core::{Schema, Transform, ValidationSpec, ValueObject, ValueObjectKind};
//!
//! struct Email;
//!
//! impl ValueObjectKind for Email {
//!     const KIND: &'static str = "email";
//!
//!     fn spec() -> ValidationSpec {
//!         ValidationSpec::new(Schema::string().format(keel_core::Format::Email))
//!             .transform(Transform::Trim)
//!             .transform(Transform::Lowercase)
//!     }
//! }
//!
//! let email = ValueObject::<Email>::create("  Ada@Example.COM ")?;
//! assert_eq!(email.value().as_str(), Some("ada@example.com"));
//! # Ok::<(), keel_core::DomainError>(())
//! ```
//!
//! ### Make Illegal States Unrepresentable
//!
//! A value object exists only if its payload passed its spec; an
//! aggregate's state changes only through its closed event dispatch
//! table. There is no invalid or inert instance to guard against.
//!
//! ### Functional Core, Imperative Shell
//!
//! The kernel performs no I/O and takes no locks. Persistence and event
//! publication are trait ports ([`Repository`], [`EventPublisher`])
//! implemented by the infrastructure layer, which also owns the
//! optimistic-concurrency check ([`RepositoryError::StaleVersion`]).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod crypto;
pub mod entity;
pub mod error;
pub mod events;
pub mod macros;
pub mod repository;
pub mod result;
pub mod validation;
pub mod value;
pub mod value_object;

pub use aggregate::{AggregateKind, AggregateRoot, Versioned};
pub use crypto::{CryptoError, PasswordDigest, PasswordHasher};
pub use entity::{Entity, EntityKind, Identifiable};
pub use error::{DomainError, DomainResult};
pub use events::{
    deserialize_event, deserialize_event_bytes, serialize_event, serialize_event_bytes,
    DomainEvent, EventId, EventPayload,
};
pub use repository::{
    publish_pending, EventPublisher, PublishError, Repository, RepositoryError, RepositoryResult,
};
pub use result::{try_catch, try_catch_async, ResultExt};
pub use validation::{
    normalize, Format, Keyword, MessageOverrides, Schema, SchemaType, Transform, ValidateOptions,
    ValidationResult, ValidationSpec, PROCESS_FAILED_MESSAGE,
};
pub use value::{DomainValue, ValueKind};
pub use value_object::{ValueObject, ValueObjectKind};
