//! Per-email rate limiting for the code handshake.
//!
//! The limited key is the normalized email from the request body, so the
//! check runs inside the handlers once the body has been parsed.

use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter as GovRateLimiter,
};
use std::num::NonZeroU32;

use crate::error::ApiError;

/// Window a quota is measured over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaWindow {
    PerMinute,
    PerHour,
}

/// Keyed limiter shared by all requests for one endpoint.
pub struct EmailRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
    limit: u32,
    window: QuotaWindow,
}

impl EmailRateLimiter {
    /// Returns `None` when `limit` is zero, which disables limiting.
    pub fn new(limit: u32, window: QuotaWindow) -> Option<Self> {
        let burst = NonZeroU32::new(limit)?;
        let quota = match window {
            QuotaWindow::PerMinute => Quota::per_minute(burst),
            QuotaWindow::PerHour => Quota::per_hour(burst),
        };
        Some(Self {
            limiter: GovRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            limit,
            window,
        })
    }

    /// Check whether another request for `email` is allowed.
    /// Returns Err with retry-after seconds if rate limited.
    pub fn check(&self, email: &str) -> Result<(), u64> {
        match self.limiter.check_key(&email.to_string()) {
            Ok(_) => Ok(()),
            Err(not_until) => Err(not_until.wait_time_from(self.clock.now()).as_secs().max(1)),
        }
    }

    /// Like [`check`](Self::check), mapped to the API error.
    pub fn enforce(&self, email: &str) -> Result<(), ApiError> {
        self.check(email).map_err(|retry_after_secs| {
            tracing::warn!(
                email = %shared::crypto::email_fingerprint(email),
                retry_after_secs = retry_after_secs,
                "Rate limit exceeded"
            );
            ApiError::RateLimited { retry_after_secs }
        })
    }

    /// Drop state for keys whose quota has fully replenished.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }
}

impl std::fmt::Debug for EmailRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailRateLimiter")
            .field("limit", &self.limit)
            .field("window", &self.window)
            .field("tracked_keys", &self.limiter.len())
            .finish()
    }
}
