//! Validated inputs for the registration handshake.
//!
//! Each handshake operation parses its raw input into one of these types
//! first. Parsing either yields a value that is known to be well formed or an
//! [`InputError`] naming the exact rejection reason.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use shared::validation::{is_numeric_code, is_valid_email, normalize_email};
use std::str::FromStr;
use thiserror::Error;

use super::player::{
    BattingStyle, BowlingStyle, Experience, Gender, PlayerProfile, PreferredRole, PHONE_REGEX,
};

/// Length of every issued one-time code.
pub const OTP_LENGTH: usize = 6;

/// Longest accepted full name, in characters.
pub const MAX_FULL_NAME_LENGTH: usize = 100;

/// Why an input was rejected before any state was consulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Email is required")]
    EmailRequired,

    #[error("Email address is not valid")]
    EmailMalformed,

    #[error("Password is required")]
    PasswordRequired,

    #[error("OTP is required")]
    OtpRequired,

    #[error("OTP must be a {OTP_LENGTH} digit code")]
    OtpMalformed,

    #[error("{field} {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl InputError {
    pub(crate) fn field(field: &'static str, reason: impl Into<String>) -> Self {
        InputError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

fn parse_email(raw: Option<&str>) -> Result<String, InputError> {
    let email = normalize_email(raw.unwrap_or_default());
    if email.is_empty() {
        return Err(InputError::EmailRequired);
    }
    if !is_valid_email(&email) {
        return Err(InputError::EmailMalformed);
    }
    Ok(email)
}

/// A request for a fresh one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRequest {
    pub email: String,
}

impl CodeRequest {
    pub fn parse(email: Option<&str>) -> Result<Self, InputError> {
        Ok(Self {
            email: parse_email(email)?,
        })
    }
}

/// A code presented for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSubmission {
    pub email: String,
    pub otp: String,
}

impl CodeSubmission {
    pub fn parse(email: Option<&str>, otp: Option<&str>) -> Result<Self, InputError> {
        let email = parse_email(email)?;
        let otp = otp.unwrap_or_default();
        if otp.is_empty() {
            return Err(InputError::OtpRequired);
        }
        if !is_numeric_code(otp, OTP_LENGTH) {
            return Err(InputError::OtpMalformed);
        }
        Ok(Self {
            email,
            otp: otp.to_string(),
        })
    }
}

/// Raw registration fields as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub preferred_role: Option<String>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<Vec<String>>,
    pub experience: Option<String>,
}

/// A registration whose every field has been checked.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub email: String,
    pub password: String,
    pub profile: PlayerProfile,
}

impl NewRegistration {
    /// Validates a form. `today` bounds the date of birth.
    ///
    /// Password is checked before email, then the profile fields in form
    /// order.
    pub fn parse(form: RegistrationForm, today: NaiveDate) -> Result<Self, InputError> {
        let password = form.password.unwrap_or_default();
        if password.is_empty() {
            return Err(InputError::PasswordRequired);
        }
        let email = parse_email(form.email.as_deref())?;

        let full_name = required("fullName", form.full_name.as_deref())?;
        if full_name.chars().count() > MAX_FULL_NAME_LENGTH {
            return Err(InputError::field(
                "fullName",
                format!("must be at most {} characters", MAX_FULL_NAME_LENGTH),
            ));
        }

        let date_of_birth = parse_date(required("dateOfBirth", form.date_of_birth.as_deref())?)?;
        if date_of_birth > today {
            return Err(InputError::field("dateOfBirth", "cannot be in the future"));
        }

        let gender = parse_enum::<Gender>("gender", form.gender.as_deref())?;

        let phone = required("phone", form.phone.as_deref())?;
        if !PHONE_REGEX.is_match(phone) {
            return Err(InputError::field("phone", "is not a valid phone number"));
        }

        let preferred_role = parse_enum::<PreferredRole>("preferredRole", form.preferred_role.as_deref())?;
        let batting_style = parse_enum::<BattingStyle>("battingStyle", form.batting_style.as_deref())?;

        let raw_styles = form.bowling_style.unwrap_or_default();
        if raw_styles.is_empty() {
            return Err(InputError::field("bowlingStyle", "is required"));
        }
        let mut bowling_style = Vec::with_capacity(raw_styles.len());
        for raw in &raw_styles {
            let style = BowlingStyle::from_str(raw).map_err(|e| InputError::field("bowlingStyle", e))?;
            if !bowling_style.contains(&style) {
                bowling_style.push(style);
            }
        }

        let experience = parse_enum::<Experience>("experience", form.experience.as_deref())?;

        Ok(Self {
            email,
            password,
            profile: PlayerProfile {
                full_name: full_name.to_string(),
                date_of_birth,
                gender,
                phone: phone.to_string(),
                preferred_role,
                batting_style,
                bowling_style,
                experience,
            },
        })
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, InputError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(InputError::field(field, "is required")),
    }
}

fn parse_enum<T: FromStr<Err = String>>(
    field: &'static str,
    value: Option<&str>,
) -> Result<T, InputError> {
    T::from_str(required(field, value)?).map_err(|e| InputError::field(field, e))
}

/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp (date part).
fn parse_date(value: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| InputError::field("dateOfBirth", "must be a date in YYYY-MM-DD format"))
}
