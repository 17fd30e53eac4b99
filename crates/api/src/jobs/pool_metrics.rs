//! Periodic publication of the connection pool gauges.

use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};

/// Seconds between two pool gauge updates.
const POOL_METRICS_INTERVAL_SECS: u64 = 10;

/// Publishes active, idle and total connection counts for the shared pool.
/// Runs whether or not the temp user sweep is enabled.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(POOL_METRICS_INTERVAL_SECS)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}
