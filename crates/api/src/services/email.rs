//! Email delivery for verification codes and welcome mail.
//!
//! Supports two providers:
//! - `console`: logs the rendered message (development)
//! - `sendgrid`: sends through the SendGrid v3 API
//!
//! A disabled service, an unknown provider, or a missing SendGrid key makes
//! every send fail, so code requests never report success for mail that
//! was not handed to a provider.

use async_trait::async_trait;
use domain::services::{MailError, MailMessage, Mailer};
use shared::crypto::email_fingerprint;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::EmailConfig;

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured: {0}")]
    NotConfigured(String),

    #[error("Email service disabled")]
    Disabled,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl From<EmailError> for MailError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::Disabled => MailError::Disabled,
            EmailError::NotConfigured(detail) => MailError::NotConfigured(detail),
            other => MailError::Delivery(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    Console,
    SendGrid,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EmailError::NotConfigured(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn provider(&self) -> Result<Provider, EmailError> {
        if !self.config.enabled {
            return Err(EmailError::Disabled);
        }
        match self.config.provider.as_str() {
            "console" => Ok(Provider::Console),
            "sendgrid" if self.config.sendgrid_api_key.is_empty() => Err(
                EmailError::NotConfigured("sendgrid_api_key is empty".to_string()),
            ),
            "sendgrid" => Ok(Provider::SendGrid),
            other => {
                error!(provider = %other, "Unknown email provider");
                Err(EmailError::NotConfigured(format!(
                    "unknown provider {:?}",
                    other
                )))
            }
        }
    }

    /// Send an email message through the configured provider.
    pub async fn send_message(&self, message: &MailMessage) -> Result<(), EmailError> {
        match self.provider()? {
            Provider::Console => {
                self.send_console(message);
                Ok(())
            }
            Provider::SendGrid => self.send_sendgrid(message).await,
        }
    }

    fn send_console(&self, message: &MailMessage) {
        info!(
            to = %email_fingerprint(&message.to),
            kind = %message.kind,
            subject = %message.subject,
            body = %message.body_text,
            "Email (console provider)"
        );
    }

    /// Request body for the SendGrid v3 mail endpoint.
    fn sendgrid_payload(&self, message: &MailMessage) -> serde_json::Value {
        let mut content = vec![serde_json::json!({
            "type": "text/plain",
            "value": message.body_text
        })];
        if let Some(html) = &message.body_html {
            content.push(serde_json::json!({
                "type": "text/html",
                "value": html
            }));
        }

        serde_json::json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": content
        })
    }

    async fn send_sendgrid(&self, message: &MailMessage) -> Result<(), EmailError> {
        let response = self
            .client
            .post(SENDGRID_ENDPOINT)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&self.sendgrid_payload(message))
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!(
                to = %email_fingerprint(&message.to),
                kind = %message.kind,
                "Email sent via SendGrid"
            );
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, error = %error_body, "SendGrid API error");
        Err(EmailError::ProviderError(format!(
            "SendGrid returned {}",
            status
        )))
    }
}

#[async_trait]
impl Mailer for EmailService {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        self.send_message(&message).await.map_err(Into::into)
    }
}
