//! Assertions over [`ApiResponse`] values.

use serde_json::Value;

use crate::clients::ApiResponse;
use crate::error::AssertionError;

pub fn status(response: &ApiResponse, expected: u16) -> Result<(), AssertionError> {
    let actual = response.status.as_u16();
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::Status { expected, actual })
    }
}

/// Superset match of the response body against `expected`.
///
/// Objects match when every expected key is present with a matching value,
/// extra keys are ignored. Arrays must have the same length and match
/// element-wise. Anything else compares by equality.
pub fn body_matches(response: &ApiResponse, expected: &Value) -> Result<(), AssertionError> {
    matches_at("$", &response.body, expected)
}

fn matches_at(path: &str, actual: &Value, expected: &Value) -> Result<(), AssertionError> {
    match (actual, expected) {
        (Value::Object(actual_map), Value::Object(expected_map)) => {
            for (key, expected_value) in expected_map {
                let child = format!("{path}.{key}");
                match actual_map.get(key) {
                    Some(actual_value) => matches_at(&child, actual_value, expected_value)?,
                    None => {
                        return Err(AssertionError::Body {
                            path: child,
                            expected: expected_value.to_string(),
                            actual: "<missing>".to_string(),
                        })
                    }
                }
            }
            Ok(())
        }
        (Value::Array(actual_items), Value::Array(expected_items)) => {
            if actual_items.len() != expected_items.len() {
                return Err(AssertionError::Body {
                    path: path.to_string(),
                    expected: format!("{} items", expected_items.len()),
                    actual: format!("{} items", actual_items.len()),
                });
            }
            for (index, (a, e)) in actual_items.iter().zip(expected_items).enumerate() {
                matches_at(&format!("{path}[{index}]"), a, e)?;
            }
            Ok(())
        }
        _ if actual == expected => Ok(()),
        _ => Err(AssertionError::Body {
            path: path.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
    }
}

/// Status plus a `{ "message": ... }` body, the shape of 401 and 404.
pub fn message(response: &ApiResponse, code: u16, text: &str) -> Result<(), AssertionError> {
    status(response, code)?;
    body_matches(response, &serde_json::json!({ "message": text }))
}

pub fn empty_body(response: &ApiResponse) -> Result<(), AssertionError> {
    match &response.body {
        Value::Null => Ok(()),
        other => Err(AssertionError::UnexpectedBody(other.to_string())),
    }
}

pub fn list_len(response: &ApiResponse, expected: usize) -> Result<(), AssertionError> {
    let actual = match &response.body {
        Value::Array(items) => items.len(),
        other => {
            return Err(AssertionError::Body {
                path: "$".to_string(),
                expected: "an array".to_string(),
                actual: other.to_string(),
            })
        }
    };
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::Length { expected, actual })
    }
}

pub fn non_empty_list(response: &ApiResponse) -> Result<(), AssertionError> {
    match &response.body {
        Value::Array(items) if !items.is_empty() => Ok(()),
        other => Err(AssertionError::EmptyList(other.to_string())),
    }
}

/// Returns the header's value as a positive integer.
pub fn positive_header(response: &ApiResponse, name: &str) -> Result<u64, AssertionError> {
    let raw = response
        .header(name)
        .ok_or_else(|| AssertionError::MissingHeader(name.to_string()))?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AssertionError::InvalidHeader {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}

pub fn header_equals(response: &ApiResponse, name: &str, expected: u64) -> Result<(), AssertionError> {
    let actual = positive_header(response, name)?;
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::HeaderValue {
            name: name.to_string(),
            expected,
            actual,
        })
    }
}
