use thiserror::Error;

use crate::domain::FieldError;

/// Errors raised while talking to the users API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A response that did not match what the suite expected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssertionError {
    #[error("expected status {expected}, got {actual}")]
    Status { expected: u16, actual: u16 },
    #[error("body mismatch at {path}: expected {expected}, got {actual}")]
    Body {
        path: String,
        expected: String,
        actual: String,
    },
    #[error("expected an empty body, got {0}")]
    UnexpectedBody(String),
    #[error("expected {expected} items, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("expected a non-empty list, got {0}")]
    EmptyList(String),
    #[error("header {0} is missing")]
    MissingHeader(String),
    #[error("header {name} is not a positive integer: {value:?}")]
    InvalidHeader { name: String, value: String },
    #[error("header {name}: expected {expected}, got {actual}")]
    HeaderValue {
        name: String,
        expected: u64,
        actual: u64,
    },
    #[error("no user id recorded; the create check did not succeed")]
    MissingUserId,
}

/// Why a single check failed.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
    /// The local expectation could not be turned into JSON.
    #[error("Could not encode expected body: {0}")]
    Expectation(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("No access token configured; pass --token or set GOREST_ACCESS_TOKEN")]
    MissingToken,
    #[error("Invalid base URL {0:?}: must start with http:// or https://")]
    InvalidBaseUrl(String),
    #[error("Invalid page size {0}: must be between 1 and 100")]
    InvalidPageSize(u32),
    #[error("Invalid request timeout: must be at least 1 second")]
    InvalidTimeout,
}

/// Errors returned by the in-memory users store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {}", describe_fields(.0))]
    Invalid(Vec<FieldError>),
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped the request")]
    ActorDropped,
}

fn describe_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}
