//! Email verification handshake endpoints.

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use domain::services::{CodeRequestOutcome, RegistrationError};
use serde::{Deserialize, Serialize};
use shared::validation::{is_valid_email, normalize_email};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_otp_issued, record_otp_verification};
use crate::middleware::EmailRateLimiter;

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Counts the request against `limiter` when the email is well formed.
/// Malformed emails are rejected by the handshake before any work is done.
fn enforce_limit(limiter: Option<&EmailRateLimiter>, email: Option<&str>) -> Result<(), ApiError> {
    if let (Some(limiter), Some(email)) = (limiter, email) {
        let email = normalize_email(email);
        if is_valid_email(&email) {
            limiter.enforce(&email)?;
        }
    }
    Ok(())
}

/// Request a verification code.
///
/// POST /api/temp/send-otp
pub async fn send_otp(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<SendOtpRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    enforce_limit(
        state.otp_request_limiter.as_deref(),
        request.email.as_deref(),
    )?;

    match state
        .registration
        .request_code(request.email.as_deref())
        .await?
    {
        CodeRequestOutcome::Sent { .. } => {
            record_otp_issued();
            Ok(MessageResponse::new("OTP sent to email"))
        }
        CodeRequestOutcome::AlreadyPending => Ok(MessageResponse::new(
            "OTP already sent. Please wait until it expires.",
        )),
    }
}

/// Submit a verification code.
///
/// POST /api/temp/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<VerifyOtpRequest>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    enforce_limit(
        state.otp_verify_limiter.as_deref(),
        request.email.as_deref(),
    )?;

    let result = state
        .registration
        .verify_code(request.email.as_deref(), request.otp.as_deref())
        .await;
    record_otp_verification(verification_label(&result));

    result?;
    Ok(MessageResponse::new("OTP verified successfully"))
}

fn verification_label<T>(result: &Result<T, RegistrationError>) -> &'static str {
    match result {
        Ok(_) => "verified",
        Err(RegistrationError::CodeExpired) => "expired",
        Err(RegistrationError::CodeMismatch) => "mismatch",
        Err(RegistrationError::NoPendingRequest) => "not_found",
        Err(RegistrationError::InvalidInput(_)) => "invalid",
        Err(_) => "error",
    }
}
