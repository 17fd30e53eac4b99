use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::services::{RegistrationError, StoreError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Well-formed request refused by the handshake.
    #[error("Rejected ({code}): {message}")]
    Rejected { code: &'static str, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited { retry_after_secs: u64 },

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut retry_after = None;
        let (status, error_code, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::Rejected { code, message } => (StatusCode::BAD_REQUEST, code, message),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::RateLimited { retry_after_secs } => {
                retry_after = Some(retry_after_secs);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "rate_limited",
                    "Too many requests. Please try again later.".into(),
                )
            }
            ApiError::DeliveryFailed(msg) => {
                tracing::error!("Email delivery failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "delivery_failed",
                    "Failed to send OTP email".into(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            retry_after,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        let message = err.to_string();
        match err {
            RegistrationError::InvalidInput(_) => ApiError::Validation(message),
            RegistrationError::AlreadyRegistered => ApiError::Rejected {
                code: "already_registered",
                message,
            },
            RegistrationError::NoPendingRequest | RegistrationError::PlayerNotFound => {
                ApiError::NotFound(message)
            }
            RegistrationError::CodeExpired => ApiError::Rejected {
                code: "otp_expired",
                message,
            },
            RegistrationError::CodeMismatch => ApiError::Rejected {
                code: "invalid_otp",
                message,
            },
            RegistrationError::NotVerified => ApiError::Rejected {
                code: "not_verified",
                message,
            },
            RegistrationError::NotificationFailure(detail) => ApiError::DeliveryFailed(detail),
            RegistrationError::Persistence(store) => store.into(),
            RegistrationError::Internal(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::InputError;

    #[test]
    fn test_api_error_status_codes() {
        let cases = vec![
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Rejected {
                    code: "invalid_otp",
                    message: "x".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ApiError::RateLimited {
                    retry_after_secs: 3,
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                ApiError::DeliveryFailed("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ApiError::RateLimited {
            retry_after_secs: 42,
        }
        .into_response();
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }

    #[test]
    fn test_registration_error_mapping() {
        let expired: ApiError = RegistrationError::CodeExpired.into();
        assert!(matches!(
            expired,
            ApiError::Rejected {
                code: "otp_expired",
                ..
            }
        ));

        let missing: ApiError = RegistrationError::NoPendingRequest.into();
        assert!(matches!(missing, ApiError::NotFound(ref m) if m == "No OTP request found for this email"));

        let invalid: ApiError = RegistrationError::InvalidInput(InputError::EmailRequired).into();
        assert!(matches!(invalid, ApiError::Validation(ref m) if m == "Email is required"));

        let unknown: ApiError = RegistrationError::PlayerNotFound.into();
        assert!(matches!(unknown, ApiError::NotFound(ref m) if m == "Player not found"));

        let registered: ApiError = RegistrationError::AlreadyRegistered.into();
        assert!(matches!(
            registered,
            ApiError::Rejected {
                code: "already_registered",
                ..
            }
        ));

        let delivery: ApiError = RegistrationError::NotificationFailure("smtp".into()).into();
        assert!(matches!(delivery, ApiError::DeliveryFailed(_)));

        let store: ApiError =
            RegistrationError::Persistence(StoreError::Unavailable("down".into())).into();
        assert!(matches!(store, ApiError::Internal(_)));
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::Validation("test".to_string()).to_string(),
            "Validation error: test"
        );
        assert_eq!(
            ApiError::RateLimited {
                retry_after_secs: 1
            }
            .to_string(),
            "Rate limited"
        );
        assert_eq!(
            ApiError::Rejected {
                code: "not_verified",
                message: "test".into()
            }
            .to_string(),
            "Rejected (not_verified): test"
        );
    }
}
