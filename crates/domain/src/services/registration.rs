//! The email verification and registration handshake.
//!
//! A registration moves through three calls:
//!
//! 1. [`RegistrationService::request_code`] stores a transient record and
//!    mails a six digit code.
//! 2. [`RegistrationService::verify_code`] marks the record verified when the
//!    right code arrives before it expires.
//! 3. [`RegistrationService::complete_registration`] turns a verified record
//!    into a permanent [`Player`] and removes the transient record.
//!
//! Expiry is evaluated lazily against the injected [`Clock`]; nothing runs
//! on a timer except the optional sweep in [`RegistrationService::sweep_expired`].

use chrono::{DateTime, Duration, Utc};
use shared::crypto::{constant_time_eq, email_fingerprint};
use shared::password::hash_password;
use std::sync::Arc;
use thiserror::Error;

use super::clock::{Clock, SystemClock};
use super::notification::{MailMessage, Mailer};
use super::otp::{OtpGenerator, RandomOtpGenerator};
use super::store::{PlayerStore, StoreError, TempUserStore};
use crate::models::{
    CodeRequest, CodeSubmission, InputError, NewPlayer, NewRegistration, Performance, Player,
    RegistrationForm, TempUser, OTP_LENGTH,
};
use uuid::Uuid;

/// Number of players on the featured list.
pub const FEATURED_PLAYER_COUNT: i64 = 6;

/// Handshake failures, one variant per caller-visible reason.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("{0}")]
    InvalidInput(#[from] InputError),

    #[error("Email already registered")]
    AlreadyRegistered,

    #[error("No OTP request found for this email")]
    NoPendingRequest,

    #[error("OTP has expired. Please request a new one.")]
    CodeExpired,

    #[error("Invalid OTP")]
    CodeMismatch,

    #[error("Email not verified. Please verify OTP before registering.")]
    NotVerified,

    #[error("Player not found")]
    PlayerNotFound,

    #[error("Failed to send verification email: {0}")]
    NotificationFailure(String),

    #[error(transparent)]
    Persistence(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result of a successful code request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRequestOutcome {
    /// A new code was stored and mailed.
    Sent { expires_at: DateTime<Utc> },
    /// An unexpired code already exists; nothing was changed or sent.
    AlreadyPending,
}

#[derive(Debug, Clone)]
pub struct RegistrationSettings {
    /// How long an issued code stays valid.
    pub otp_ttl: Duration,
    /// Name used in outgoing emails.
    pub club_name: String,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::seconds(120),
            club_name: "Cricket Club".to_string(),
        }
    }
}

impl RegistrationSettings {
    fn ttl_minutes(&self) -> i64 {
        ((self.otp_ttl.num_seconds() + 59) / 60).max(1)
    }
}

pub struct RegistrationService {
    temp_users: Arc<dyn TempUserStore>,
    players: Arc<dyn PlayerStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    otp: Arc<dyn OtpGenerator>,
    settings: RegistrationSettings,
}

impl RegistrationService {
    pub fn new(
        temp_users: Arc<dyn TempUserStore>,
        players: Arc<dyn PlayerStore>,
        mailer: Arc<dyn Mailer>,
        settings: RegistrationSettings,
    ) -> Self {
        Self {
            temp_users,
            players,
            mailer,
            clock: Arc::new(SystemClock),
            otp: Arc::new(RandomOtpGenerator::new(OTP_LENGTH)),
            settings,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_otp_generator(mut self, otp: Arc<dyn OtpGenerator>) -> Self {
        self.otp = otp;
        self
    }

    pub fn settings(&self) -> &RegistrationSettings {
        &self.settings
    }

    /// Issues and mails a fresh code unless an unexpired one already exists.
    pub async fn request_code(
        &self,
        email: Option<&str>,
    ) -> Result<CodeRequestOutcome, RegistrationError> {
        let CodeRequest { email } = CodeRequest::parse(email)?;
        let fingerprint = email_fingerprint(&email);

        if self.players.player_exists(&email).await? {
            return Err(RegistrationError::AlreadyRegistered);
        }

        let now = self.clock.now();
        let otp = self.otp.generate();
        let expires_at = now + self.settings.otp_ttl;

        if self
            .temp_users
            .issue_code(&email, &otp, expires_at, now)
            .await?
            .is_none()
        {
            tracing::debug!(email = %fingerprint, "OTP already pending");
            return Ok(CodeRequestOutcome::AlreadyPending);
        }

        let message = MailMessage::otp_code(
            &email,
            &otp,
            self.settings.ttl_minutes(),
            &self.settings.club_name,
        );
        if let Err(e) = self.mailer.send(message).await {
            tracing::error!(email = %fingerprint, error = %e, "Failed to deliver OTP email");
            if let Err(revoke_err) = self.temp_users.revoke_code(&email, &otp, now).await {
                tracing::warn!(
                    email = %fingerprint,
                    error = %revoke_err,
                    "Failed to revoke undelivered OTP"
                );
            }
            return Err(RegistrationError::NotificationFailure(e.to_string()));
        }

        tracing::info!(email = %fingerprint, expires_at = %expires_at, "OTP issued");
        Ok(CodeRequestOutcome::Sent { expires_at })
    }

    /// Marks the transient record verified when `otp` is the current,
    /// unexpired code. Verifying twice with the same code succeeds.
    pub async fn verify_code(
        &self,
        email: Option<&str>,
        otp: Option<&str>,
    ) -> Result<TempUser, RegistrationError> {
        let CodeSubmission { email, otp } = CodeSubmission::parse(email, otp)?;
        let fingerprint = email_fingerprint(&email);
        let now = self.clock.now();

        let user = self
            .temp_users
            .find_temp_user(&email)
            .await?
            .ok_or(RegistrationError::NoPendingRequest)?;
        check_code(&user, &otp, now)?;

        if let Some(verified) = self.temp_users.mark_verified(&email, &otp, now).await? {
            tracing::info!(email = %fingerprint, "OTP verified");
            return Ok(verified);
        }

        // The record changed between the read and the conditional write.
        let current = self
            .temp_users
            .find_temp_user(&email)
            .await?
            .ok_or(RegistrationError::NoPendingRequest)?;
        check_code(&current, &otp, now)?;
        Err(RegistrationError::Internal(
            "verification condition not met".to_string(),
        ))
    }

    /// Creates the permanent account for a verified email.
    pub async fn complete_registration(
        &self,
        form: RegistrationForm,
    ) -> Result<Player, RegistrationError> {
        let today = self.clock.now().date_naive();
        let NewRegistration {
            email,
            password,
            profile,
        } = NewRegistration::parse(form, today)?;
        let fingerprint = email_fingerprint(&email);

        if self.players.player_exists(&email).await? {
            return Err(RegistrationError::AlreadyRegistered);
        }

        let verified = self
            .temp_users
            .find_temp_user(&email)
            .await?
            .map(|user| user.verified)
            .unwrap_or(false);
        if !verified {
            return Err(RegistrationError::NotVerified);
        }

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| RegistrationError::Internal(e.to_string()))?
            .map_err(|e| RegistrationError::Internal(e.to_string()))?;

        let full_name = profile.full_name.clone();
        let created = self
            .players
            .create_player(NewPlayer {
                email: email.clone(),
                password_hash,
                profile,
                created_at: self.clock.now(),
            })
            .await?;

        let player = match created {
            Some(player) => player,
            None => {
                // Lost a race with another registration or a new code request.
                return Err(if self.players.player_exists(&email).await? {
                    RegistrationError::AlreadyRegistered
                } else {
                    RegistrationError::NotVerified
                });
            }
        };

        let welcome = MailMessage::welcome(&email, &full_name, &self.settings.club_name);
        if let Err(e) = self.mailer.send(welcome).await {
            tracing::warn!(email = %fingerprint, error = %e, "Failed to send welcome email");
        }

        if let Err(e) = self.temp_users.delete_temp_user(&email).await {
            tracing::warn!(email = %fingerprint, error = %e, "Failed to remove verified temp user");
        }

        tracing::info!(email = %fingerprint, player_id = %player.id, "Player registered");
        Ok(player)
    }

    /// All players, best first.
    pub async fn list_players(&self) -> Result<Vec<Player>, RegistrationError> {
        Ok(self.players.list_ranked(None).await?)
    }

    pub async fn featured_players(&self) -> Result<Vec<Player>, RegistrationError> {
        Ok(self.players.list_ranked(Some(FEATURED_PLAYER_COUNT)).await?)
    }

    /// Replaces a player's statistics, which feed the roster ranking.
    pub async fn update_performance(
        &self,
        player_id: Uuid,
        performance: Performance,
    ) -> Result<Player, RegistrationError> {
        performance.validate()?;
        let player = self
            .players
            .update_performance(player_id, &performance)
            .await?
            .ok_or(RegistrationError::PlayerNotFound)?;
        tracing::info!(
            player_id = %player_id,
            score = player.performance.score(),
            "Performance updated"
        );
        Ok(player)
    }

    /// Removes unverified records whose code expired more than `retention` ago.
    pub async fn sweep_expired(&self, retention: Duration) -> Result<u64, RegistrationError> {
        let cutoff = self.clock.now() - retention;
        let removed = self.temp_users.purge_expired_unverified(cutoff).await?;
        if removed > 0 {
            tracing::info!(removed = removed, cutoff = %cutoff, "Swept expired temp users");
        }
        Ok(removed)
    }
}

fn check_code(user: &TempUser, otp: &str, now: DateTime<Utc>) -> Result<(), RegistrationError> {
    if user.is_expired_at(now) {
        return Err(RegistrationError::CodeExpired);
    }
    if !constant_time_eq(&user.otp, otp) {
        return Err(RegistrationError::CodeMismatch);
    }
    Ok(())
}
