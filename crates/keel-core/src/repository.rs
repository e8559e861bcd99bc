//! Persistence and publication ports.
//!
//! The kernel performs no I/O. Collaborators implement these traits in the
//! infrastructure layer; business logic depends on the traits only, which
//! keeps it testable with in-memory mocks.
//!
//! # Optimistic Concurrency
//!
//! `save` implementations are expected to compare the aggregate's version
//! at load time against the stored version at save time and reject stale
//! writes with [`RepositoryError::StaleVersion`]. The kernel itself takes
//! no locks.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use thiserror::Error;

use crate::aggregate::{AggregateKind, AggregateRoot};
use crate::events::{DomainEvent, EventPayload};
use crate::value_object::ValueObject;

// ============================================================================
// REPOSITORY
// ============================================================================

/// Result alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Common errors across all repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Entity not found in repository
    #[error("entity not found: {0}")]
    NotFound(String),

    /// Conflict with existing data (duplicate, constraint violation)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Optimistic-concurrency check failed: the stored version moved on
    #[error("stale version: expected {expected}, found {actual}")]
    StaleVersion {
        /// Version the caller loaded
        expected: u64,
        /// Version currently stored
        actual: u64,
    },

    /// Invalid input for a repository operation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Underlying storage failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Create a not found error
    #[must_use]
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} '{id}'"))
    }

    /// Create a conflict error
    #[must_use]
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }

    /// Create a stale version error
    #[must_use]
    pub const fn stale_version(expected: u64, actual: u64) -> Self {
        Self::StaleVersion { expected, actual }
    }

    /// Create an invalid input error
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Create a storage error
    #[must_use]
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage(reason.into())
    }

    /// Check if this is a `NotFound` error
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a `StaleVersion` error
    #[must_use]
    pub const fn is_stale_version(&self) -> bool {
        matches!(self, Self::StaleVersion { .. })
    }
}

/// Aggregate persistence port.
///
/// Implementations load by replaying the stored event stream (clearing the
/// pending list before handing the aggregate out) or from a snapshot.
pub trait Repository<K: AggregateKind> {
    /// Load an aggregate by id; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Storage` on backend failure.
    fn load(&self, id: &ValueObject<K::Id>) -> RepositoryResult<Option<AggregateRoot<K>>>;

    /// Persist an aggregate, enforcing the optimistic-concurrency check.
    ///
    /// # Errors
    ///
    /// `RepositoryError::StaleVersion` when the stored version does not
    /// match the version this aggregate was loaded at.
    fn save(&mut self, aggregate: &AggregateRoot<K>) -> RepositoryResult<()>;

    /// Whether an aggregate with this id exists.
    ///
    /// # Errors
    ///
    /// `RepositoryError::Storage` on backend failure.
    fn exists(&self, id: &ValueObject<K::Id>) -> RepositoryResult<bool>;

    /// Delete an aggregate by id.
    ///
    /// # Errors
    ///
    /// `RepositoryError::NotFound` when no such aggregate exists.
    fn delete(&mut self, id: &ValueObject<K::Id>) -> RepositoryResult<()>;
}

// ============================================================================
// EVENT PUBLICATION
// ============================================================================

/// Errors publishing events to the message-bus collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// Transport-level failure
    #[error("transport failure: {0}")]
    Transport(String),

    /// Event could not be serialized for the wire
    #[error("serialization failure: {0}")]
    Serialization(String),
}

/// Message-bus port for pending domain events.
pub trait EventPublisher<P: EventPayload> {
    /// Durably publish a batch of events, in order.
    ///
    /// # Errors
    ///
    /// `PublishError` when publication did not durably complete; callers
    /// must then leave the pending list intact.
    fn publish(&mut self, events: &[DomainEvent<P>]) -> Result<(), PublishError>;
}

/// Publish an aggregate's pending events, clearing them only after the
/// publisher reports durable success. Returns how many events went out.
///
/// # Errors
///
/// The publisher's error, with the pending list left intact.
pub fn publish_pending<K, Pub>(
    aggregate: &mut AggregateRoot<K>,
    publisher: &mut Pub,
) -> Result<usize, PublishError>
where
    K: AggregateKind,
    Pub: EventPublisher<K::Event> + ?Sized,
{
    let count = aggregate.pending_events().len();
    if count == 0 {
        return Ok(0);
    }
    publisher.publish(aggregate.pending_events())?;
    aggregate.clear_events();
    Ok(count)
}
