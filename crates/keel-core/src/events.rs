//! Domain events.
//!
//! A domain event is an immutable record of a state change that occurred on
//! a specific aggregate: a generated identifier, the origin aggregate id,
//! an occurrence timestamp, the payload's declared type tag, and the
//! payload itself.
//!
//! Ordering among one aggregate's events is application order, never the
//! timestamp — timestamps may collide.
//!
//! Payloads are closed tagged unions per aggregate kind: the
//! [`EventPayload`] trait supplies the type tag, and the aggregate's
//! dispatch table matches on the variants exhaustively.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

// ============================================================================
// EVENT ID
// ============================================================================

/// Generated identifier of a single domain event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a textual identifier.
    ///
    /// # Errors
    ///
    /// `DomainError::Construction` when the input is not a valid UUID.
    pub fn parse(s: &str) -> DomainResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|error| DomainError::construction(format!("invalid event id '{s}': {error}")))
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// EVENT PAYLOAD
// ============================================================================

/// A closed union of event variants for one aggregate kind.
///
/// The type tag is the event's declared name and drives dispatch; it must
/// be stable across versions of the model.
pub trait EventPayload: Clone + fmt::Debug {
    /// The declared type tag of this variant.
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// DOMAIN EVENT
// ============================================================================

/// An immutable event record.
///
/// Constructed once, never mutated; all access is through references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent<P> {
    event_id: EventId,
    aggregate_id: String,
    occurred_at: DateTime<Utc>,
    payload: P,
}

impl<P: EventPayload> DomainEvent<P> {
    /// Record a fresh event: generated id, current timestamp.
    #[must_use]
    pub fn record(aggregate_id: impl Into<String>, payload: P) -> Self {
        Self {
            event_id: EventId::generate(),
            aggregate_id: aggregate_id.into(),
            occurred_at: Utc::now(),
            payload,
        }
    }

    /// Rebuild a historical event from stored fields.
    #[must_use]
    pub fn reconstruct(
        event_id: EventId,
        aggregate_id: impl Into<String>,
        occurred_at: DateTime<Utc>,
        payload: P,
    ) -> Self {
        Self {
            event_id,
            aggregate_id: aggregate_id.into(),
            occurred_at,
            payload,
        }
    }

    /// The event's generated identifier.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// The id of the aggregate this event originated from.
    #[must_use]
    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    /// When the event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }

    /// The payload's declared type tag.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }

    /// The payload.
    #[must_use]
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// Consume self, returning the payload.
    #[must_use]
    pub fn into_payload(self) -> P {
        self.payload
    }
}

// ============================================================================
// EVENT SERIALIZATION
// ============================================================================

/// Serialize an event to JSON
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn serialize_event<P>(event: &DomainEvent<P>) -> Result<String, serde_json::Error>
where
    P: EventPayload + Serialize,
{
    serde_json::to_string(event)
}

/// Deserialize an event from JSON
///
/// # Errors
///
/// Returns an error if deserialization fails
pub fn deserialize_event<P>(json: &str) -> Result<DomainEvent<P>, serde_json::Error>
where
    P: EventPayload + DeserializeOwned,
{
    serde_json::from_str(json)
}

/// Serialize an event to JSON bytes
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn serialize_event_bytes<P>(event: &DomainEvent<P>) -> Result<Vec<u8>, serde_json::Error>
where
    P: EventPayload + Serialize,
{
    serde_json::to_vec(event)
}

/// Deserialize an event from JSON bytes
///
/// # Errors
///
/// Returns an error if deserialization fails
pub fn deserialize_event_bytes<P>(bytes: &[u8]) -> Result<DomainEvent<P>, serde_json::Error>
where
    P: EventPayload + DeserializeOwned,
{
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum ShipmentEvent {
        Dispatched { carrier: String },
        Delivered,
    }

    impl EventPayload for ShipmentEvent {
        fn event_type(&self) -> &'static str {
            match self {
                Self::Dispatched { .. } => "dispatched",
                Self::Delivered => "delivered",
            }
        }
    }

    #[test]
    fn test_record_generates_distinct_ids() {
        let a = DomainEvent::record("shipment-1", ShipmentEvent::Delivered);
        let b = DomainEvent::record("shipment-1", ShipmentEvent::Delivered);
        assert_ne!(a.event_id(), b.event_id());
        assert_eq!(a.aggregate_id(), "shipment-1");
        assert_eq!(a.event_type(), "delivered");
    }

    #[test]
    fn test_reconstruct_preserves_fields() {
        let id = EventId::generate();
        let at = Utc::now();
        let event = DomainEvent::reconstruct(
            id,
            "shipment-2",
            at,
            ShipmentEvent::Dispatched {
                carrier: "albatross".to_string(),
            },
        );
        assert_eq!(event.event_id(), id);
        assert_eq!(event.occurred_at(), &at);
        assert_eq!(event.event_type(), "dispatched");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let event = DomainEvent::record(
            "shipment-3",
            ShipmentEvent::Dispatched {
                carrier: "petrel".to_string(),
            },
        );

        let json = serialize_event(&event).expect("serialization failed");
        let back = deserialize_event::<ShipmentEvent>(&json).expect("deserialization failed");
        assert_eq!(event, back);

        let bytes = serialize_event_bytes(&event).expect("serialization failed");
        let back_bytes =
            deserialize_event_bytes::<ShipmentEvent>(&bytes).expect("deserialization failed");
        assert_eq!(event, back_bytes);
    }

    #[test]
    fn test_event_id_parse() {
        let id = EventId::generate();
        let parsed = EventId::parse(&id.to_string()).expect("valid uuid");
        assert_eq!(parsed, id);

        let error = EventId::parse("not-a-uuid").expect_err("invalid");
        assert!(error.is_construction());
    }
}
