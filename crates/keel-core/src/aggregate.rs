//! Event-sourced aggregate roots.
//!
//! An [`AggregateRoot<K>`] extends an entity with a monotonic version
//! counter and an append-only list of pending events. State never changes
//! except through event application:
//!
//! - [`AggregateRoot::apply`] dispatches one event through the kind's
//!   closed dispatch table; on success the event lands in the pending list
//!   and the version increments by exactly one. Failure — an unhandled
//!   variant, a rejected business rule, or state re-validation — leaves
//!   state, version, and the pending list untouched.
//! - [`AggregateRoot::replay`] rebuilds an aggregate from version 0 by
//!   folding `apply` over an ordered event list, short-circuiting on the
//!   first failure so no partial aggregate is ever exposed.
//!
//! Replay is deterministic: the same id and the same ordered event list
//! always produce the same state and version. Replayed events accumulate
//! in the pending list exactly as live-applied events do; a loading
//! repository clears them after a successful load.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::entity::{Entity, EntityKind, Identifiable};
use crate::error::DomainResult;
use crate::events::{DomainEvent, EventPayload};
use crate::result::ResultExt;
use crate::value::DomainValue;
use crate::value_object::ValueObject;

/// Anything that carries a monotonic version counter.
pub trait Versioned {
    /// Number of events applied since creation or the last full replay.
    fn version(&self) -> u64;
}

/// One kind of aggregate: entity identity plus the event-sourcing pieces.
pub trait AggregateKind: EntityKind {
    /// The closed union of event variants this aggregate dispatches on.
    type Event: EventPayload;

    /// State of a fresh aggregate at version 0.
    #[must_use]
    fn initial_state() -> DomainValue;

    /// The dispatch table: fold one event into the current state.
    ///
    /// Implementations match on the event union exhaustively. A variant
    /// the aggregate cannot handle returns
    /// `DomainError::UnhandledEvent`; a business rule rejection returns
    /// `DomainError::RuleViolation`. Pure: no I/O, no mutation.
    ///
    /// # Errors
    ///
    /// See above; any error leaves the aggregate untouched.
    fn apply(state: &DomainValue, event: &Self::Event) -> DomainResult<DomainValue>;
}

/// An event-sourced aggregate root.
pub struct AggregateRoot<K: AggregateKind> {
    entity: Entity<K>,
    version: u64,
    pending: Vec<DomainEvent<K::Event>>,
}

impl<K: AggregateKind> AggregateRoot<K> {
    /// Validate a raw id and construct a fresh aggregate at version 0.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` from the id kind's spec or the state
    /// spec rejecting [`AggregateKind::initial_state`].
    pub fn create(raw_id: impl Into<DomainValue>) -> DomainResult<Self> {
        let id = ValueObject::create(raw_id)?;
        Self::from_id(id)
    }

    /// Construct a fresh aggregate at version 0 from a validated id.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` when the state spec rejects the initial
    /// state.
    pub fn from_id(id: ValueObject<K::Id>) -> DomainResult<Self> {
        let entity = Entity::new(id, K::initial_state())?;
        Ok(Self {
            entity,
            version: 0,
            pending: Vec::new(),
        })
    }

    /// Rebuild an aggregate by folding `apply` over an ordered event list.
    ///
    /// Short-circuits at the first failing application; the partially
    /// built aggregate is dropped, never returned.
    ///
    /// # Errors
    ///
    /// The first application failure, unchanged.
    pub fn replay<I>(id: ValueObject<K::Id>, events: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = DomainEvent<K::Event>>,
    {
        let mut aggregate = Self::from_id(id)?;
        for event in events {
            aggregate.apply(event)?;
        }
        debug!(
            kind = K::KIND,
            version = aggregate.version,
            "replay complete"
        );
        Ok(aggregate)
    }

    /// Apply one event: dispatch, commit state, append to pending,
    /// increment version. All-or-nothing.
    ///
    /// # Errors
    ///
    /// `DomainError::UnhandledEvent` when the dispatch table has no arm
    /// for the event; the handler's own error, unchanged, when it rejects
    /// the event; `DomainError::Validation` when the produced state fails
    /// the state spec. On any error the aggregate is untouched.
    pub fn apply(&mut self, event: DomainEvent<K::Event>) -> DomainResult<()> {
        let next_state =
            K::apply(self.entity.state(), event.payload()).trace_err("event application rejected")?;
        let entity = self.entity.transition(next_state)?;

        self.entity = entity;
        self.version += 1;
        debug!(
            kind = K::KIND,
            event_type = event.event_type(),
            version = self.version,
            "event applied"
        );
        self.pending.push(event);
        Ok(())
    }

    /// Record a business operation's outcome: wrap the payload in a fresh
    /// event stamped with this aggregate's id and apply it.
    ///
    /// # Errors
    ///
    /// See [`AggregateRoot::apply`].
    pub fn record(&mut self, payload: K::Event) -> DomainResult<()> {
        let event = DomainEvent::record(self.id().to_canonical_string(), payload);
        self.apply(event)
    }

    /// The identity value object.
    #[must_use]
    pub const fn id(&self) -> &ValueObject<K::Id> {
        self.entity.id()
    }

    /// The current state payload.
    #[must_use]
    pub const fn state(&self) -> &DomainValue {
        self.entity.state()
    }

    /// The underlying entity.
    #[must_use]
    pub const fn entity(&self) -> &Entity<K> {
        &self.entity
    }

    /// Number of events applied since creation or the last full replay.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Applied-but-not-yet-committed events, in application order.
    #[must_use]
    pub fn pending_events(&self) -> &[DomainEvent<K::Event>] {
        &self.pending
    }

    /// Whether any events await publication.
    #[must_use]
    pub fn has_pending_events(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop all pending events. The version is untouched.
    ///
    /// The only operation permitted to empty the pending list; called by
    /// the publishing collaborator after durable publication, and by a
    /// loading repository after a successful replay.
    pub fn clear_events(&mut self) {
        self.pending.clear();
    }
}

impl<K: AggregateKind> Identifiable for AggregateRoot<K> {
    type Id = ValueObject<K::Id>;

    fn id(&self) -> &Self::Id {
        self.entity.id()
    }
}

impl<K: AggregateKind> Versioned for AggregateRoot<K> {
    fn version(&self) -> u64 {
        self.version
    }
}

impl<K: AggregateKind> Clone for AggregateRoot<K> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            version: self.version,
            pending: self.pending.clone(),
        }
    }
}

impl<K: AggregateKind> fmt::Debug for AggregateRoot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateRoot")
            .field("kind", &K::KIND)
            .field("id", self.entity.id())
            .field("version", &self.version)
            .field("pending", &self.pending.len())
            .finish()
    }
}

// Entity contract: identity equality, version and pending events ignored
impl<K: AggregateKind> PartialEq for AggregateRoot<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
    }
}

impl<K: AggregateKind> Eq for AggregateRoot<K> {}

impl<K: AggregateKind> Hash for AggregateRoot<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity.hash(state);
    }
}
