//! The validate pipeline: normalize, check, resolve messages.
//!
//! Checks run in deterministic traversal order: type first, then required
//! fields in declared order, then declared properties in order, then array
//! elements by index. One violation produces exactly one message.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::collections::HashSet;

use regex::Regex;
use tap::Pipe;
use thiserror::Error;
use tracing::debug;

use crate::validation::spec::{Format, Keyword, Schema, ValidationSpec};
use crate::validation::transforms::normalize;
use crate::value::DomainValue;

/// The single message reported when the engine itself fails.
pub const PROCESS_FAILED_MESSAGE: &str = "validation process failed";

// ============================================================================
// OPTIONS / RESULT
// ============================================================================

/// Options for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Run the spec's transform list before the structural check
    pub apply_transforms: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            apply_transforms: true,
        }
    }
}

/// Outcome of one validation run.
///
/// `value` is the normalized output when `valid` is true, the original
/// input otherwise. `errors` is ordered and non-empty exactly when `valid`
/// is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the value passed every check
    pub valid: bool,
    /// Normalized output on success, original input on failure
    pub value: DomainValue,
    /// One human-readable message per violation, in check order
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn success(value: DomainValue) -> Self {
        Self {
            valid: true,
            value,
            errors: Vec::new(),
        }
    }

    fn failure(original: DomainValue, errors: Vec<String>) -> Self {
        Self {
            valid: false,
            value: original,
            errors,
        }
    }
}

// ============================================================================
// VIOLATIONS
// ============================================================================

/// One violated constraint, before message resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Violation {
    path: String,
    keyword: Keyword,
    message: String,
}

impl Violation {
    fn new(path: &str, keyword: Keyword, message: String) -> Self {
        Self {
            path: path.to_string(),
            keyword,
            message,
        }
    }
}

/// Prefix a built-in message with the field path where one exists.
fn at(path: &str, text: &str) -> String {
    if path.is_empty() {
        text.to_string()
    } else {
        format!("'{path}' {text}")
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Internal failures of the engine itself, distinct from violations.
#[derive(Debug, Error)]
enum EngineFailure {
    #[error("malformed pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },
}

// ============================================================================
// VALIDATE
// ============================================================================

impl ValidationSpec {
    /// Validate a raw value with default options (transforms enabled).
    #[must_use]
    pub fn validate(&self, raw: &DomainValue) -> ValidationResult {
        self.validate_with(raw, &ValidateOptions::default())
    }

    /// Validate a raw value.
    ///
    /// Never panics: an internal engine failure is reported as the single
    /// generic [`PROCESS_FAILED_MESSAGE`].
    #[must_use]
    pub fn validate_with(&self, raw: &DomainValue, options: &ValidateOptions) -> ValidationResult {
        let normalized = if options.apply_transforms && !self.transforms.is_empty() {
            normalize(raw, &self.transforms)
        } else {
            raw.clone()
        };

        match check(&self.schema, &normalized, "") {
            Ok(violations) if violations.is_empty() => ValidationResult::success(normalized),
            Ok(violations) => violations
                .iter()
                .map(|violation| self.resolve_message(violation))
                .collect::<Vec<_>>()
                .pipe(|errors| {
                    debug!(count = errors.len(), "validation failed");
                    ValidationResult::failure(raw.clone(), errors)
                }),
            Err(failure) => {
                debug!(reason = %failure, "validation engine failure");
                ValidationResult::failure(raw.clone(), vec![PROCESS_FAILED_MESSAGE.to_string()])
            }
        }
    }

    /// Resolve one violation's message: exact path + keyword override,
    /// then keyword-global override, then the built-in template.
    fn resolve_message(&self, violation: &Violation) -> String {
        self.messages
            .lookup(&violation.path, violation.keyword)
            .cloned()
            .unwrap_or_else(|| violation.message.clone())
    }
}

fn check(
    schema: &Schema,
    value: &DomainValue,
    path: &str,
) -> Result<Vec<Violation>, EngineFailure> {
    let mut violations = Vec::new();

    if !schema.accepts(value) {
        violations.push(Violation::new(
            path,
            Keyword::Type,
            at(path, &format!("expected {}, got {}", schema.kind(), value.kind())),
        ));
        // The remaining keywords are meaningless on the wrong type
        return Ok(violations);
    }

    match value {
        DomainValue::String(s) => check_string(schema, s, path, &mut violations)?,
        DomainValue::Number(n) => check_number(schema, *n, path, &mut violations),
        DomainValue::Array(items) => {
            check_array_shape(schema, items, path, &mut violations);
            if let Some(item_schema) = &schema.items {
                for (index, item) in items.iter().enumerate() {
                    let child_path = format!("{path}[{index}]");
                    violations.extend(check(item_schema, item, &child_path)?);
                }
            }
        }
        DomainValue::Object(map) => {
            for field in &schema.required {
                if !map.contains_key(field) {
                    let child_path = join_path(path, field);
                    let message = format!("'{child_path}' is required");
                    violations.push(Violation::new(&child_path, Keyword::Required, message));
                }
            }
            for (name, child_schema) in &schema.properties {
                if let Some(child_value) = map.get(name) {
                    violations.extend(check(child_schema, child_value, &join_path(path, name))?);
                }
            }
            if !schema.additional_properties {
                let declared: HashSet<&str> = schema
                    .properties
                    .iter()
                    .map(|(name, _)| name.as_str())
                    .collect();
                for key in map.keys() {
                    if !declared.contains(key.as_str()) {
                        let child_path = join_path(path, key);
                        let message = format!("unexpected field '{child_path}'");
                        violations.push(Violation::new(
                            &child_path,
                            Keyword::UnexpectedField,
                            message,
                        ));
                    }
                }
            }
        }
        _ => {}
    }

    Ok(violations)
}

fn check_string(
    schema: &Schema,
    s: &str,
    path: &str,
    out: &mut Vec<Violation>,
) -> Result<(), EngineFailure> {
    let length = s.chars().count();

    if let Some(min) = schema.min_length {
        if length < min {
            out.push(Violation::new(
                path,
                Keyword::MinLength,
                at(path, &format!("must be at least {min} characters (got {length})")),
            ));
        }
    }

    if let Some(max) = schema.max_length {
        if length > max {
            out.push(Violation::new(
                path,
                Keyword::MaxLength,
                at(path, &format!("must be at most {max} characters (got {length})")),
            ));
        }
    }

    if let Some(pattern) = &schema.pattern {
        let regex = Regex::new(pattern).map_err(|error| EngineFailure::MalformedPattern {
            pattern: pattern.clone(),
            reason: error.to_string(),
        })?;
        if !regex.is_match(s) {
            out.push(Violation::new(
                path,
                Keyword::Pattern,
                at(path, &format!("does not match pattern '{pattern}'")),
            ));
        }
    }

    if let Some(format) = schema.format {
        if !format_matches(format, s) {
            out.push(Violation::new(
                path,
                Keyword::Format,
                at(path, &format!("is not a valid {format}")),
            ));
        }
    }

    Ok(())
}

fn check_number(schema: &Schema, n: f64, path: &str, out: &mut Vec<Violation>) {
    if let Some(min) = schema.minimum {
        if n < min || n.is_nan() {
            out.push(Violation::new(
                path,
                Keyword::Minimum,
                at(path, &format!("must be at least {min} (got {n})")),
            ));
        }
    }

    if let Some(max) = schema.maximum {
        if n > max || n.is_nan() {
            out.push(Violation::new(
                path,
                Keyword::Maximum,
                at(path, &format!("must be at most {max} (got {n})")),
            ));
        }
    }
}

fn check_array_shape(
    schema: &Schema,
    items: &im::Vector<DomainValue>,
    path: &str,
    out: &mut Vec<Violation>,
) {
    let count = items.len();

    if let Some(min) = schema.min_items {
        if count < min {
            out.push(Violation::new(
                path,
                Keyword::MinItems,
                at(path, &format!("must have at least {min} items (got {count})")),
            ));
        }
    }

    if let Some(max) = schema.max_items {
        if count > max {
            out.push(Violation::new(
                path,
                Keyword::MaxItems,
                at(path, &format!("must have at most {max} items (got {count})")),
            ));
        }
    }

    if schema.unique_items {
        let mut seen = HashSet::new();
        for (index, item) in items.iter().enumerate() {
            if !seen.insert(item.hash_key()) {
                out.push(Violation::new(
                    path,
                    Keyword::UniqueItems,
                    at(path, &format!("has a duplicate item at index {index}")),
                ));
            }
        }
    }
}

fn format_matches(format: Format, s: &str) -> bool {
    match format {
        Format::Email => {
            let Some((local, domain)) = s.split_once('@') else {
                return false;
            };
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !s.contains(char::is_whitespace)
        }
        Format::Uuid => uuid::Uuid::parse_str(s).is_ok(),
        Format::Date => chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        Format::DateTime => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
    }
}
