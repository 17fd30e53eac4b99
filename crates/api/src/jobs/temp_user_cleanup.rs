//! Sweep of abandoned registration attempts.

use chrono::Duration;
use domain::services::RegistrationService;
use std::sync::Arc;

use super::scheduler::{Job, JobFrequency};
use crate::config::CleanupConfig;
use crate::middleware::metrics::record_temp_users_swept;
use crate::middleware::EmailRateLimiter;

/// Deletes unverified temp users whose code expired more than the retention
/// window ago, then prunes idle rate limiter keys.
pub struct TempUserCleanupJob {
    registration: Arc<RegistrationService>,
    retention: Duration,
    interval_minutes: u64,
    limiters: Vec<Arc<EmailRateLimiter>>,
}

impl TempUserCleanupJob {
    pub fn new(registration: Arc<RegistrationService>, config: &CleanupConfig) -> Self {
        Self {
            registration,
            retention: Duration::minutes(config.retention_minutes),
            interval_minutes: config.interval_minutes,
            limiters: Vec::new(),
        }
    }

    pub fn with_limiters<I>(mut self, limiters: I) -> Self
    where
        I: IntoIterator<Item = Arc<EmailRateLimiter>>,
    {
        self.limiters.extend(limiters);
        self
    }
}

#[async_trait::async_trait]
impl Job for TempUserCleanupJob {
    fn name(&self) -> &'static str {
        "temp_user_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(self.interval_minutes)
    }

    async fn execute(&self) -> Result<(), String> {
        for limiter in &self.limiters {
            limiter.prune();
        }

        let removed = self
            .registration
            .sweep_expired(self.retention)
            .await
            .map_err(|e| e.to_string())?;
        record_temp_users_swept(removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::QuotaWindow;
    use chrono::{TimeZone, Utc};
    use domain::models::TempUser;
    use domain::services::{
        InMemoryStore, ManualClock, RecordingMailer, RegistrationSettings,
    };

    fn temp_user(email: &str, expires_minutes_ago: i64, verified: bool) -> TempUser {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let otp_expires = now - Duration::minutes(expires_minutes_ago);
        TempUser {
            email: email.to_string(),
            otp: "123456".to_string(),
            otp_expires,
            verified,
            created_at: otp_expires - Duration::minutes(2),
            updated_at: otp_expires - Duration::minutes(2),
        }
    }

    fn job_with_store(store: Arc<InMemoryStore>) -> TempUserCleanupJob {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ));
        let registration = RegistrationService::new(
            store.clone(),
            store,
            Arc::new(RecordingMailer::new()),
            RegistrationSettings::default(),
        )
        .with_clock(clock);

        TempUserCleanupJob::new(Arc::new(registration), &CleanupConfig::default())
    }

    #[test]
    fn test_job_frequency_from_config() {
        let job = job_with_store(Arc::new(InMemoryStore::new()));
        assert_eq!(job.name(), "temp_user_cleanup");
        assert_eq!(job.frequency(), JobFrequency::Minutes(15));
    }

    #[tokio::test]
    async fn test_sweeps_only_stale_unverified_records() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_temp_user(temp_user("stale@x.com", 90, false));
        store.insert_temp_user(temp_user("recent@x.com", 10, false));
        store.insert_temp_user(temp_user("verified@x.com", 90, true));

        let job = job_with_store(store.clone());
        job.execute().await.unwrap();

        assert_eq!(store.temp_user_count(), 2);
    }

    #[tokio::test]
    async fn test_execute_reports_store_failure() {
        let store = Arc::new(InMemoryStore::new());
        store.set_unavailable(true);

        let job = job_with_store(store);
        assert!(job.execute().await.is_err());
    }

    #[tokio::test]
    async fn test_execute_prunes_limiters() {
        let limiter = Arc::new(EmailRateLimiter::new(5, QuotaWindow::PerMinute).unwrap());
        assert!(limiter.check("p@x.com").is_ok());

        let job = job_with_store(Arc::new(InMemoryStore::new()))
            .with_limiters(vec![limiter.clone()]);
        job.execute().await.unwrap();

        // One of five cells used, so the key is still recent and kept.
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
