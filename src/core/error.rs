//! Typed error handling for the shopfront core
//!
//! Every core operation returns a [`ShopResult`] so that callers can match on
//! the failure kind instead of unpicking a generic `anyhow::Error`. The
//! presentation layer gets its HTTP status mapping for free through
//! [`IntoResponse`].
//!
//! # Error Categories
//!
//! - `NotFound`: a user, product, order or coupon does not exist
//! - `Unauthorized`: ownership or role violation
//! - `InvalidState`: a business rule rejected the operation
//! - `InsufficientStock`: requested quantity exceeds what is available
//! - `Unexpected`: storage or infrastructure failure

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for shopfront core operations
#[derive(Debug)]
pub enum ShopError {
    /// A referenced resource does not exist
    NotFound { resource: &'static str, id: String },

    /// The requesting identity may not perform this operation
    Unauthorized { message: String },

    /// A business rule rejected the operation
    InvalidState { message: String },

    /// Ordered quantity exceeds available stock
    InsufficientStock {
        product_name: String,
        requested: u32,
        available: u32,
    },

    /// Storage or infrastructure failure
    Unexpected { message: String },
}

impl ShopError {
    /// Shorthand for a `NotFound` on a uuid-keyed resource
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        ShopError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Shorthand for an `InvalidState` with a message
    pub fn invalid_state(message: impl Into<String>) -> Self {
        ShopError::InvalidState {
            message: message.into(),
        }
    }

    /// Shorthand for an `Unauthorized` with a message
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ShopError::Unauthorized {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::NotFound { .. } => StatusCode::NOT_FOUND,
            ShopError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ShopError::InvalidState { .. } => StatusCode::BAD_REQUEST,
            ShopError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            ShopError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::NotFound { .. } => "NOT_FOUND",
            ShopError::Unauthorized { .. } => "UNAUTHORIZED",
            ShopError::InvalidState { .. } => "INVALID_STATE",
            ShopError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            ShopError::Unexpected { .. } => "UNEXPECTED",
        }
    }

    /// Convert to a serializable error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShopError::NotFound { resource, id } => Some(serde_json::json!({
                "resource": resource,
                "id": id,
            })),
            ShopError::InsufficientStock {
                product_name,
                requested,
                available,
            } => Some(serde_json::json!({
                "product": product_name,
                "requested": requested,
                "availableStock": available,
            })),
            _ => None,
        }
    }
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopError::NotFound { resource, id } => {
                write!(f, "{} '{}' not found", resource, id)
            }
            ShopError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            ShopError::InvalidState { message } => write!(f, "{}", message),
            ShopError::InsufficientStock {
                product_name,
                requested,
                available,
            } => {
                write!(
                    f,
                    "{} is out of stock or insufficient quantity (requested {}, available {})",
                    product_name, requested, available
                )
            }
            ShopError::Unexpected { message } => write!(f, "Unexpected error: {}", message),
        }
    }
}

impl std::error::Error for ShopError {}

/// Error response body returned by the HTTP layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

/// Storage failures surface as `Unexpected`; the core never retries them
impl From<anyhow::Error> for ShopError {
    fn from(err: anyhow::Error) -> Self {
        ShopError::Unexpected {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for shopfront core operations
pub type ShopResult<T> = Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_and_status() {
        let id = Uuid::nil();
        let err = ShopError::not_found("order", id);
        assert!(err.to_string().contains("order"));
        assert!(err.to_string().contains("not found"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_insufficient_stock_details() {
        let err = ShopError::InsufficientStock {
            product_name: "Almond Oil".to_string(),
            requested: 5,
            available: 2,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let response = err.to_response();
        assert_eq!(response.code, "INSUFFICIENT_STOCK");
        let details = response.details.expect("details present");
        assert_eq!(details["availableStock"], 2);
    }

    #[test]
    fn test_unauthorized_status() {
        let err = ShopError::unauthorized("not the order owner");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_from_anyhow() {
        let err: ShopError = anyhow::anyhow!("lock poisoned").into();
        assert!(matches!(err, ShopError::Unexpected { .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
