//! Property-based tests for value semantics using proptest.
//!
//! Properties:
//! 1. Normalization is idempotent for any list of defined transforms
//! 2. `create` is total: valid input yields the normalized payload,
//!    invalid input yields at least one error and no instance
//! 3. Equality is reflexive, symmetric, and consistent with hashing
//! 4. Ordering is total and agrees with equality

// Integration tests have relaxed clippy settings for test ergonomics.
// Production code (src/) must use strict zero-unwrap/panic patterns.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::float_cmp
)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use keel_core::{
    normalize, DomainValue, Schema, Transform, ValidationSpec, ValueObject, ValueObjectKind,
};
use proptest::prelude::*;

/// Optimized proptest config for fast property tests.
fn fast_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 256,
        ..ProptestConfig::default()
    }
}

struct UserName;

impl ValueObjectKind for UserName {
    const KIND: &'static str = "user-name";

    fn spec() -> ValidationSpec {
        ValidationSpec::new(Schema::string().min_length(3).max_length(63))
            .transform(Transform::Trim)
            .transform(Transform::Lowercase)
    }
}

struct Quantity;

impl ValueObjectKind for Quantity {
    const KIND: &'static str = "quantity";

    fn spec() -> ValidationSpec {
        ValidationSpec::new(Schema::number())
    }
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// STRATEGIES
// =============================================================================

fn transform_strategy() -> impl Strategy<Value = Transform> {
    prop_oneof![
        Just(Transform::Trim),
        Just(Transform::Lowercase),
        Just(Transform::Uppercase),
        Just(Transform::ParseNumber),
        "[%Y%m%d+-]{1,6}".prop_map(|format| Transform::FormatDate { format }),
    ]
}

fn scalar_value_strategy() -> impl Strategy<Value = DomainValue> {
    prop_oneof![
        Just(DomainValue::Null),
        any::<bool>().prop_map(DomainValue::from),
        any::<f64>().prop_map(DomainValue::from),
        "[ a-zA-Z0-9.:-]{0,24}".prop_map(DomainValue::from),
    ]
}

fn value_strategy() -> impl Strategy<Value = DomainValue> {
    scalar_value_strategy().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(DomainValue::array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(DomainValue::object),
        ]
    })
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(fast_config())]

    #[test]
    fn prop_normalize_is_idempotent(
        value in value_strategy(),
        transforms in prop::collection::vec(transform_strategy(), 0..5),
    ) {
        let once = normalize(&value, &transforms);
        let twice = normalize(&once, &transforms);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_create_never_panics(value in value_strategy()) {
        // Either outcome is fine; the factory must simply be total
        let _ = ValueObject::<UserName>::create(value);
    }

    #[test]
    fn prop_valid_input_normalizes(raw in "[A-Za-z]{3,24}") {
        let vo = ValueObject::<UserName>::create(format!("  {raw}  "))
            .expect("padded alphabetic input satisfies the spec");
        prop_assert_eq!(
            vo.value(),
            &DomainValue::from(raw.to_lowercase())
        );
    }

    #[test]
    fn prop_invalid_input_reports_errors(raw in "[A-Za-z]{0,2}") {
        let error = ValueObject::<UserName>::create(raw).expect_err("too short");
        prop_assert!(error.is_validation());
        prop_assert!(!error.validation_messages().is_empty());
    }

    #[test]
    fn prop_equality_consistent_with_hash(n in any::<f64>()) {
        let a = ValueObject::<Quantity>::create(n).expect("any number validates");
        let b = ValueObject::<Quantity>::create(n).expect("any number validates");
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn prop_equality_reflexive_and_symmetric(
        a in value_strategy(),
        b in value_strategy(),
    ) {
        prop_assert_eq!(&a, &a);
        prop_assert_eq!(a == b, b == a);
        if a == b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }
    }

    #[test]
    fn prop_ordering_agrees_with_equality(
        a in value_strategy(),
        b in value_strategy(),
    ) {
        prop_assert_eq!(a == b, a.cmp(&b) == std::cmp::Ordering::Equal);
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }
}

// =============================================================================
// PINNED NUMERIC CASES
// =============================================================================

#[test]
fn test_equal_numbers_share_a_hash() {
    let a = ValueObject::<Quantity>::create(5.0).expect("valid");
    let b = ValueObject::<Quantity>::create(5.0).expect("valid");
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn test_five_is_not_nan_but_nans_agree() {
    let five = ValueObject::<Quantity>::create(5.0).expect("valid");
    let nan_a = ValueObject::<Quantity>::create(f64::NAN).expect("valid");
    let nan_b = ValueObject::<Quantity>::create(f64::NAN).expect("valid");

    assert_ne!(five, nan_a);
    assert_eq!(nan_a, nan_b);
    assert_eq!(hash_of(&nan_a), hash_of(&nan_b));
}

#[test]
fn test_signed_zero_quantities_are_interchangeable() {
    let pos = ValueObject::<Quantity>::create(0.0).expect("valid");
    let neg = ValueObject::<Quantity>::create(-0.0).expect("valid");
    assert_eq!(pos, neg);
    assert_eq!(hash_of(&pos), hash_of(&neg));
}

#[test]
fn test_cross_kind_ordering_pins_type_rank() {
    let values = [
        DomainValue::Null,
        DomainValue::from("zeta"),
        DomainValue::from(f64::NEG_INFINITY),
        DomainValue::from(0.0),
        DomainValue::from(f64::INFINITY),
        DomainValue::Number(f64::NAN),
        DomainValue::from(false),
        DomainValue::array([DomainValue::Null]),
        DomainValue::object([("a", DomainValue::Null)]),
    ];
    for pair in values.windows(2) {
        assert!(
            pair[0] < pair[1],
            "{:?} should sort before {:?}",
            pair[0],
            pair[1]
        );
    }
}
