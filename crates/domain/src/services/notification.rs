//! Outbound email notifications.
//!
//! Provides the mail abstraction the registration handshake sends through,
//! plus a recording implementation for development and testing.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

/// What a message is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MailKind {
    OtpCode { code: String },
    Welcome,
}

impl std::fmt::Display for MailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailKind::OtpCode { .. } => write!(f, "otp_code"),
            MailKind::Welcome => write!(f, "welcome"),
        }
    }
}

/// A fully rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub kind: MailKind,
}

impl MailMessage {
    /// Email carrying a one-time verification code.
    pub fn otp_code(to: &str, code: &str, ttl_minutes: i64, club_name: &str) -> Self {
        let minutes = if ttl_minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{} minutes", ttl_minutes)
        };
        let body_text = format!(
            "Your {club} verification code is {code}.\n\n\
             It expires in {minutes}. If you did not request this code, you can ignore this email.",
            club = club_name,
            code = code,
            minutes = minutes,
        );
        let body_html = format!(
            r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>{club}</h2>
  <p>Your verification code is:</p>
  <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{code}</p>
  <p>It expires in {minutes}. If you did not request this code, you can ignore this email.</p>
</body>
</html>"#,
            club = club_name,
            code = code,
            minutes = minutes,
        );

        Self {
            to: to.to_string(),
            subject: format!("Your {} verification code", club_name),
            body_text,
            body_html: Some(body_html),
            kind: MailKind::OtpCode {
                code: code.to_string(),
            },
        }
    }

    /// Greeting sent once an account is created.
    pub fn welcome(to: &str, full_name: &str, club_name: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: format!("Welcome to {}", club_name),
            body_text: format!(
                "Hi {},\n\nYour registration with {} is complete. See you at the nets!",
                full_name, club_name
            ),
            body_html: None,
            kind: MailKind::Welcome,
        }
    }
}

/// Why a message could not be handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailError {
    #[error("email delivery is disabled")]
    Disabled,

    #[error("email provider is not configured: {0}")]
    NotConfigured(String),

    #[error("email delivery failed: {0}")]
    Delivery(String),
}

/// Mail transport used by the handshake.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Mailer that keeps every message in memory instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Messages accepted so far, oldest first.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Most recent code mailed to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent().into_iter().rev().find_map(|m| match m.kind {
            MailKind::OtpCode { code } if m.to == email => Some(code),
            _ => None,
        })
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        if self.simulate_failure {
            tracing::warn!(kind = %message.kind, "Recording mailer simulating failure");
            return Err(MailError::Delivery("Simulated failure".to_string()));
        }

        tracing::debug!(kind = %message.kind, subject = %message.subject, "Recorded email");
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_message_contents() {
        let msg = MailMessage::otp_code("p@x.com", "482913", 2, "Riverside CC");
        assert_eq!(msg.to, "p@x.com");
        assert_eq!(msg.subject, "Your Riverside CC verification code");
        assert!(msg.body_text.contains("482913"));
        assert!(msg.body_text.contains("2 minutes"));
        assert!(msg.body_html.as_deref().unwrap().contains("482913"));
        assert_eq!(
            msg.kind,
            MailKind::OtpCode {
                code: "482913".to_string()
            }
        );
    }

    #[test]
    fn test_otp_message_singular_minute() {
        let msg = MailMessage::otp_code("p@x.com", "482913", 1, "Riverside CC");
        assert!(msg.body_text.contains("1 minute."));
    }

    #[test]
    fn test_welcome_message() {
        let msg = MailMessage::welcome("p@x.com", "Pat Cummins", "Riverside CC");
        assert_eq!(msg.subject, "Welcome to Riverside CC");
        assert!(msg.body_text.starts_with("Hi Pat Cummins"));
        assert_eq!(msg.kind, MailKind::Welcome);
    }

    #[test]
    fn test_mail_kind_display() {
        assert_eq!(MailKind::Welcome.to_string(), "welcome");
        assert_eq!(
            MailKind::OtpCode {
                code: "1".to_string()
            }
            .to_string(),
            "otp_code"
        );
    }

    #[tokio::test]
    async fn test_recording_mailer_records() {
        let mailer = RecordingMailer::new();
        mailer
            .send(MailMessage::otp_code("a@x.com", "111111", 2, "CC"))
            .await
            .unwrap();
        mailer
            .send(MailMessage::otp_code("a@x.com", "222222", 2, "CC"))
            .await
            .unwrap();
        mailer
            .send(MailMessage::welcome("a@x.com", "A", "CC"))
            .await
            .unwrap();

        assert_eq!(mailer.sent().len(), 3);
        assert_eq!(mailer.last_code_for("a@x.com").as_deref(), Some("222222"));
        assert_eq!(mailer.last_code_for("b@x.com"), None);
    }

    #[tokio::test]
    async fn test_failing_mailer() {
        let mailer = RecordingMailer::failing();
        let result = mailer
            .send(MailMessage::welcome("a@x.com", "A", "CC"))
            .await;
        assert!(matches!(result, Err(MailError::Delivery(_))));
        assert!(mailer.sent().is_empty());
    }
}
