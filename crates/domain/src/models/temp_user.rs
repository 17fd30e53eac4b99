//! Transient registration attempt keyed by email address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An in-progress, not yet finalized registration attempt.
///
/// One record exists per email at most. Requesting a new code overwrites
/// `otp`/`otp_expires` and resets `verified`; verifying flips `verified`;
/// completing registration deletes the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempUser {
    pub email: String,
    #[serde(skip_serializing)]
    pub otp: String,
    pub otp_expires: DateTime<Utc>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a [`TempUser`] sits in the handshake at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempUserState {
    /// Code issued, not yet verified, still valid.
    Pending,
    /// Correct code presented before expiry.
    Verified,
    /// Code window has passed. Verified records keep their verified flag
    /// but report this state once their window closes.
    Expired,
}

impl TempUser {
    /// Whether the stored code can no longer be presented at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.otp_expires
    }

    /// Whether a new code request at `now` must be deferred.
    pub fn blocks_new_code_at(&self, now: DateTime<Utc>) -> bool {
        self.otp_expires > now
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> TempUserState {
        if self.is_expired_at(now) {
            TempUserState::Expired
        } else if self.verified {
            TempUserState::Verified
        } else {
            TempUserState::Pending
        }
    }
}
