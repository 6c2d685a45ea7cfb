//! Request payload validation
//!
//! Payloads arrive as raw JSON so that type mismatches become 400 responses
//! listing every violated constraint, rather than a framework rejection.

use serde_json::{Map, Value};

use crate::catalog::{Product, ProductUpdate};

/// Validate a creation payload: `id`, `type`, `name` non-empty strings and
/// `price` a number `>= 0`.
pub fn validate_create(body: &Value) -> Result<Product, Vec<String>> {
    let fields = as_object(body)?;
    let mut errors = Vec::new();

    let id = required_string(fields, "id", &mut errors);
    let product_type = required_string(fields, "type", &mut errors);
    let name = required_string(fields, "name", &mut errors);
    let price = match fields.get("price") {
        None | Some(Value::Null) => {
            errors.push("price should not be empty".to_string());
            None
        }
        Some(value) => check_price(value, &mut errors),
    };

    match (id, product_type, name, price) {
        (Some(id), Some(product_type), Some(name), Some(price)) if errors.is_empty() => {
            Ok(Product {
                id,
                product_type,
                name,
                price,
            })
        }
        _ => Err(errors),
    }
}

/// Validate an update payload. Every field is optional; present fields must
/// satisfy the creation constraints. Other keys, `id` included, are ignored.
pub fn validate_update(body: &Value) -> Result<ProductUpdate, Vec<String>> {
    let fields = as_object(body)?;
    let mut errors = Vec::new();

    let product_type = optional_string(fields, "type", &mut errors);
    let name = optional_string(fields, "name", &mut errors);
    let price = match fields.get("price") {
        None | Some(Value::Null) => None,
        Some(value) => check_price(value, &mut errors),
    };

    if errors.is_empty() {
        Ok(ProductUpdate {
            product_type,
            name,
            price,
        })
    } else {
        Err(errors)
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, Vec<String>> {
    body.as_object()
        .ok_or_else(|| vec!["request body must be a JSON object".to_string()])
}

fn required_string(
    fields: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => {
            errors.push(format!("{} should not be empty", key));
            None
        }
        Some(value) => check_string(key, value, errors),
    }
}

fn optional_string(
    fields: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => check_string(key, value, errors),
    }
}

fn check_string(key: &str, value: &Value, errors: &mut Vec<String>) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => {
            errors.push(format!("{} should not be empty", key));
            None
        }
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.push(format!("{} must be a string", key));
            None
        }
    }
}

fn check_price(value: &Value, errors: &mut Vec<String>) -> Option<f64> {
    match value.as_f64() {
        Some(price) if price < 0.0 => {
            errors.push("price must not be less than 0".to_string());
            None
        }
        Some(price) => Some(price),
        None => {
            errors.push("price must be a number".to_string());
            None
        }
    }
}
