//! Identity-bearing entities.
//!
//! An [`Entity<K>`] couples a validated identity value object with a state
//! payload. Equality is identity equality: two entities with the same id
//! and different state are equal, two entities with different ids and the
//! same state are not. State changes go through [`Entity::transition`],
//! which is copy-on-write and re-validates the new state.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::error::{DomainError, DomainResult};
use crate::validation::ValidationSpec;
use crate::value::DomainValue;
use crate::value_object::{ValueObject, ValueObjectKind};

/// Anything that exposes a stable identity.
pub trait Identifiable {
    /// The identity type.
    type Id;

    /// The identity.
    fn id(&self) -> &Self::Id;
}

/// One kind of entity: its identity kind plus an optional state spec.
pub trait EntityKind {
    /// Stable name of this kind, used in diagnostics.
    const KIND: &'static str;

    /// The value-object kind of this entity's identity.
    type Id: ValueObjectKind;

    /// Spec the state payload must satisfy; `None` accepts any state.
    #[must_use]
    fn state_spec() -> Option<ValidationSpec> {
        None
    }
}

/// An entity: validated identity plus state payload.
pub struct Entity<K: EntityKind> {
    id: ValueObject<K::Id>,
    state: DomainValue,
    _kind: PhantomData<K>,
}

impl<K: EntityKind> Entity<K> {
    /// Validate identity and state independently, then construct.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` from either the id kind's spec or the
    /// entity's state spec.
    pub fn create(
        raw_id: impl Into<DomainValue>,
        raw_state: impl Into<DomainValue>,
    ) -> DomainResult<Self> {
        let id = ValueObject::create(raw_id)?;
        Self::new(id, raw_state.into())
    }

    /// Construct from an already-validated identity.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` when the state spec rejects the state.
    pub fn new(id: ValueObject<K::Id>, state: DomainValue) -> DomainResult<Self> {
        let state = Self::checked_state(state)?;
        Ok(Self {
            id,
            state,
            _kind: PhantomData,
        })
    }

    fn checked_state(state: DomainValue) -> DomainResult<DomainValue> {
        match K::state_spec() {
            None => Ok(state),
            Some(spec) => {
                let outcome = spec.validate(&state);
                if outcome.valid {
                    Ok(outcome.value)
                } else {
                    Err(DomainError::validation(outcome.errors))
                }
            }
        }
    }

    /// The identity value object.
    #[must_use]
    pub const fn id(&self) -> &ValueObject<K::Id> {
        &self.id
    }

    /// The state payload.
    #[must_use]
    pub const fn state(&self) -> &DomainValue {
        &self.state
    }

    /// Produce a new entity with the same identity and updated state.
    ///
    /// Copy-on-write: `self` is untouched. The new state is re-validated
    /// against the state spec, so a bad transition cannot produce an
    /// invalid entity.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` when the state spec rejects the new state.
    pub fn transition(&self, new_state: DomainValue) -> DomainResult<Self> {
        let state = Self::checked_state(new_state)?;
        Ok(Self {
            id: self.id.clone(),
            state,
            _kind: PhantomData,
        })
    }
}

impl<K: EntityKind> Identifiable for Entity<K> {
    type Id = ValueObject<K::Id>;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl<K: EntityKind> Clone for Entity<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            state: self.state.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: EntityKind> fmt::Debug for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &K::KIND)
            .field("id", &self.id)
            .field("state", &self.state)
            .finish()
    }
}

// Identity equality: state is deliberately ignored
impl<K: EntityKind> PartialEq for Entity<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K: EntityKind> Eq for Entity<K> {}

impl<K: EntityKind> Hash for Entity<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::validation::{Schema, Transform};

    struct DeviceId;

    impl ValueObjectKind for DeviceId {
        const KIND: &'static str = "device-id";

        fn spec() -> ValidationSpec {
            ValidationSpec::new(Schema::string().min_length(4)).transform(Transform::Trim)
        }
    }

    struct Device;

    impl EntityKind for Device {
        const KIND: &'static str = "device";
        type Id = DeviceId;

        fn state_spec() -> Option<ValidationSpec> {
            Some(ValidationSpec::new(
                Schema::object()
                    .require("online")
                    .property("online", Schema::boolean()),
            ))
        }
    }

    fn online(flag: bool) -> DomainValue {
        DomainValue::object([("online", DomainValue::from(flag))])
    }

    #[test]
    fn test_create_validates_id_and_state() {
        let device = Entity::<Device>::create("dev-1", online(true)).expect("valid");
        assert_eq!(device.id().value().as_str(), Some("dev-1"));
        assert_eq!(device.state().get("online"), Some(&DomainValue::from(true)));
    }

    #[test]
    fn test_create_rejects_bad_id() {
        let error = Entity::<Device>::create("x", online(true)).expect_err("short id");
        assert!(error.is_validation());
    }

    #[test]
    fn test_create_rejects_bad_state() {
        let error =
            Entity::<Device>::create("dev-1", DomainValue::object([("online", DomainValue::from(1.0))]))
                .expect_err("wrong state type");
        assert!(error.is_validation());
    }

    #[test]
    fn test_equality_ignores_state() {
        let a = Entity::<Device>::create("dev-1", online(true)).expect("valid");
        let b = Entity::<Device>::create("dev-1", online(false)).expect("valid");
        assert_eq!(a, b);

        let c = Entity::<Device>::create("dev-2", online(true)).expect("valid");
        assert_ne!(a, c);
    }

    #[test]
    fn test_transition_is_copy_on_write() {
        let before = Entity::<Device>::create("dev-1", online(true)).expect("valid");
        let after = before.transition(online(false)).expect("valid transition");

        assert_eq!(before.state().get("online"), Some(&DomainValue::from(true)));
        assert_eq!(after.state().get("online"), Some(&DomainValue::from(false)));
        assert_eq!(before, after);
    }

    #[test]
    fn test_transition_rejects_invalid_state() {
        let device = Entity::<Device>::create("dev-1", online(true)).expect("valid");
        let error = device
            .transition(DomainValue::from("broken"))
            .expect_err("invalid state");
        assert!(error.is_validation());
        // Original untouched
        assert_eq!(device.state().get("online"), Some(&DomainValue::from(true)));
    }
}
