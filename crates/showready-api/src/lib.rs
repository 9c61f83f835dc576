#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

mod dto;
mod error_mapping;

pub use dto::{
    ApplyTemplatesResponse, CreateBoothShippingBody, CreateCarRentalBody, CreateCustomItemBody,
    CreateFlightBody, CreateHotelBody, CreateTemplateBody, DeletedResponse, OverlayItemResponse,
    OverlayListResponse, SetCompletionBody,
};
pub use error_mapping::map_error;

pub const CRATE_NAME: &str = "showready-api";

/// Wire-level failure taxonomy. Existence checks precede authorization
/// checks wherever both apply, and nothing is masked behind a generic
/// catch-all: every boundary failure is one of these four kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationFailed,
    NotFound,
    AuthorizationDenied,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::ValidationFailed,
            message: message.into(),
            details: json!({}),
        }
    }

    #[must_use]
    pub fn invalid_field(field: &str, reason: &str) -> Self {
        Self {
            code: ApiErrorCode::ValidationFailed,
            message: format!("invalid field: {field}"),
            details: json!({"field": field, "reason": reason}),
        }
    }

    #[must_use]
    pub fn not_found(resource: &str, identifier: &str) -> Self {
        Self {
            code: ApiErrorCode::NotFound,
            message: format!("{resource} with identifier '{identifier}' not found"),
            details: json!({"resource": resource, "identifier": identifier}),
        }
    }

    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::AuthorizationDenied,
            message: message.into(),
            details: json!({}),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::Internal,
            message: message.into(),
            details: json!({}),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_resource_and_identifier() {
        let e = ApiError::not_found("Event", "ev-9");
        assert_eq!(e.code, ApiErrorCode::NotFound);
        assert_eq!(e.details.get("resource").and_then(Value::as_str), Some("Event"));
        assert_eq!(e.details.get("identifier").and_then(Value::as_str), Some("ev-9"));
    }

    #[test]
    fn invalid_field_details_schema_stable() {
        let e = ApiError::invalid_field("completed", "must be a boolean");
        assert!(e.details.get("field").is_some());
        assert!(e.details.get("reason").is_some());
    }
}
