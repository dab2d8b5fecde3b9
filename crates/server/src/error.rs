//! Unified error handling with Sentry integration.
//!
//! One `AppError` type for every route handler. Server-side failures are
//! captured to Sentry before responding; provider payloads and statuses are
//! logged here and never forwarded to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::normalize::NormalizeError;
use crate::providers::ProviderError;
use crate::store::StorageError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Upstream data provider call failed.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider responded but its data supports no valuation.
    #[error("No usable data: {0}")]
    NoUsableData(#[from] NormalizeError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session state could not be read or written.
    #[error("Session error: {0}")]
    Session(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Storage(_)
                | Self::Internal(_)
                | Self::Session(_)
                | Self::Provider(
                    ProviderError::Credential
                        | ProviderError::Unavailable { .. }
                        | ProviderError::Http(_)
                        | ProviderError::Parse(_)
                )
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Storage(_) | Self::Internal(_) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Provider(err) => match err {
                ProviderError::NotFound => StatusCode::NOT_FOUND,
                ProviderError::Credential => StatusCode::SERVICE_UNAVAILABLE,
                ProviderError::Unavailable { .. }
                | ProviderError::Http(_)
                | ProviderError::Parse(_) => StatusCode::BAD_GATEWAY,
            },
            Self::NoUsableData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal or provider details to clients
        let message = match &self {
            Self::Storage(_) | Self::Internal(_) | Self::Session(_) => {
                "Internal server error".to_owned()
            }
            Self::Provider(err) => match err {
                ProviderError::NotFound => {
                    "No records found for the requested asset".to_owned()
                }
                ProviderError::Credential => {
                    "Valuation service is not configured".to_owned()
                }
                _ => "Valuation service is temporarily unavailable".to_owned(),
            },
            Self::NoUsableData(err) => match err {
                NormalizeError::NoComparableListings => {
                    "No comparable listings found for this vehicle".to_owned()
                }
                NormalizeError::NoParcelValues => {
                    "Unable to determine a value for this property".to_owned()
                }
            },
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("valuation abc".to_owned());
        assert_eq!(err.to_string(), "Not found: valuation abc");

        let err = AppError::BadRequest("year must be positive".to_owned());
        assert_eq!(err.to_string(), "Bad request: year must be positive");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NoUsableData(NormalizeError::NoComparableListings)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Provider(ProviderError::Credential)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Provider(ProviderError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_provider_details_never_reach_the_client() {
        let err = AppError::Provider(ProviderError::Unavailable { status: 500 });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
