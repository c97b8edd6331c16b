use serde::{Deserialize, Serialize};

pub const INVALID_TOKEN: &str = "Invalid token";
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";

pub const CANT_BE_BLANK: &str = "can't be blank";
pub const GENDER_BLANK: &str = "can't be blank, can be male of female";
pub const IS_INVALID: &str = "is invalid";
pub const ALREADY_TAKEN: &str = "has already been taken";

/// One entry of a 422 validation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Body of 401 and 404 responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
