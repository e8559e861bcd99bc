//! Shared fixtures: a small bank-account aggregate exercising the whole
//! kernel surface.

#![allow(dead_code)]

use keel_core::{
    AggregateKind, DomainError, DomainEvent, DomainResult, DomainValue, EntityKind, EventPayload,
    Schema, Transform, ValidationSpec, ValueObjectKind,
};
use serde::{Deserialize, Serialize};

/// Route kernel tracing through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub struct AccountId;

impl ValueObjectKind for AccountId {
    const KIND: &'static str = "account-id";

    fn spec() -> ValidationSpec {
        ValidationSpec::new(Schema::string().pattern("^acct-[a-z0-9]+$"))
            .transform(Transform::Trim)
            .transform(Transform::Lowercase)
    }
}

pub struct Account;

impl EntityKind for Account {
    const KIND: &'static str = "account";
    type Id = AccountId;

    fn state_spec() -> Option<ValidationSpec> {
        Some(ValidationSpec::new(
            Schema::object()
                .require("balance")
                .require("status")
                .property("balance", Schema::number().minimum(0.0))
                .property("status", Schema::string())
                .closed(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AccountEvent {
    Deposited { amount: f64 },
    Withdrawn { amount: f64 },
    Frozen,
    // No dispatch arm handles this variant
    Audited,
}

impl EventPayload for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "deposited",
            Self::Withdrawn { .. } => "withdrawn",
            Self::Frozen => "frozen",
            Self::Audited => "audited",
        }
    }
}

impl AggregateKind for Account {
    type Event = AccountEvent;

    fn initial_state() -> DomainValue {
        account_state(0.0, "open")
    }

    fn apply(state: &DomainValue, event: &Self::Event) -> DomainResult<DomainValue> {
        let balance = balance_of(state);
        let status = status_of(state);
        match event {
            AccountEvent::Deposited { amount } if *amount <= 0.0 => Err(
                DomainError::rule_violation("deposit amount must be positive"),
            ),
            AccountEvent::Deposited { amount } => Ok(account_state(balance + amount, &status)),
            AccountEvent::Withdrawn { amount } if *amount > balance => {
                Err(DomainError::rule_violation("insufficient funds"))
            }
            AccountEvent::Withdrawn { amount } => Ok(account_state(balance - amount, &status)),
            AccountEvent::Frozen => Ok(account_state(balance, "frozen")),
            AccountEvent::Audited => Err(DomainError::unhandled_event("audited")),
        }
    }
}

pub fn account_state(balance: f64, status: &str) -> DomainValue {
    DomainValue::object([
        ("balance", DomainValue::from(balance)),
        ("status", DomainValue::from(status)),
    ])
}

pub fn balance_of(state: &DomainValue) -> f64 {
    state
        .get("balance")
        .and_then(DomainValue::as_number)
        .unwrap_or_default()
}

pub fn status_of(state: &DomainValue) -> String {
    state
        .get("status")
        .and_then(DomainValue::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn deposited(amount: f64) -> DomainEvent<AccountEvent> {
    DomainEvent::record("acct-main", AccountEvent::Deposited { amount })
}

pub fn withdrawn(amount: f64) -> DomainEvent<AccountEvent> {
    DomainEvent::record("acct-main", AccountEvent::Withdrawn { amount })
}

pub fn audited() -> DomainEvent<AccountEvent> {
    DomainEvent::record("acct-main", AccountEvent::Audited)
}
