/**
 * Routes Module
 * API route handlers
 */

pub mod auth;
pub mod blog;
pub mod contact;
pub mod error;
pub mod health;
pub mod meta_tags;
pub mod portfolio;
pub mod testimonials;
pub mod upload;

use serde::{Deserialize, Serialize};

use crate::validation::FieldError;
use error::ApiError;

/// Error body shared by every route
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
            id: None,
        }
    }
}

/// Success response (for delete)
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parse a numeric path id, answering 400 `Invalid <entity> ID` otherwise.
pub fn parse_id(raw: &str, entity: &str) -> Result<i32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {entity} ID")))
}
