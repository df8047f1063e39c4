//! Structural pre-checks for creation payloads.
//!
//! These predicates are never applied implicitly by the service operations.
//! Callers opt in, either by calling them directly or through the `*_validated`
//! entry points of the service.

use serde::Serialize;
use serde_json::Value;

/// A single structural problem found in a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the offending field (e.g. `customer_info.email`)
    pub field: String,
    /// What the field was expected to hold
    pub expected: &'static str,
}

impl FieldError {
    fn new(field: impl Into<String>, expected: &'static str) -> Self {
        Self {
            field: field.into(),
            expected,
        }
    }
}

fn require_string(object: &Value, key: &str, path: &str, errors: &mut Vec<FieldError>) {
    if !object.get(key).is_some_and(Value::is_string) {
        errors.push(FieldError::new(path, "a string"));
    }
}

/// Field errors of a customer payload: `name` and `email` must be strings.
pub fn customer_field_errors(data: &Value) -> Vec<FieldError> {
    if !data.is_object() {
        return vec![FieldError::new("", "a JSON object")];
    }

    let mut errors = Vec::new();
    require_string(data, "name", "name", &mut errors);
    require_string(data, "email", "email", &mut errors);
    errors
}

/// Field errors of an order payload.
///
/// `currency` must be a string, `customer_info` an object carrying string
/// `name` and `email`, and `line_items` a non-empty array.
pub fn order_field_errors(data: &Value) -> Vec<FieldError> {
    if !data.is_object() {
        return vec![FieldError::new("", "a JSON object")];
    }

    let mut errors = Vec::new();
    require_string(data, "currency", "currency", &mut errors);

    match data.get("customer_info") {
        Some(info) if info.is_object() => {
            require_string(info, "name", "customer_info.name", &mut errors);
            require_string(info, "email", "customer_info.email", &mut errors);
        }
        _ => errors.push(FieldError::new("customer_info", "an object")),
    }

    match data.get("line_items").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {}
        _ => errors.push(FieldError::new("line_items", "a non-empty array")),
    }

    errors
}

/// Field errors of a charge payload: `payment_method.type` must be a string.
pub fn charge_field_errors(data: &Value) -> Vec<FieldError> {
    if !data.is_object() {
        return vec![FieldError::new("", "a JSON object")];
    }

    let mut errors = Vec::new();
    match data.get("payment_method") {
        Some(method) if method.is_object() => {
            require_string(method, "type", "payment_method.type", &mut errors);
        }
        _ => errors.push(FieldError::new("payment_method", "an object")),
    }
    errors
}

pub fn is_valid_customer(data: &Value) -> bool {
    customer_field_errors(data).is_empty()
}

pub fn is_valid_order(data: &Value) -> bool {
    order_field_errors(data).is_empty()
}

pub fn is_valid_charge(data: &Value) -> bool {
    charge_field_errors(data).is_empty()
}
