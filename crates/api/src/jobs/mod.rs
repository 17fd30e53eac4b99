//! Background job scheduler and job implementations.

mod pool_metrics;
mod scheduler;
mod temp_user_cleanup;

pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
pub use temp_user_cleanup::TempUserCleanupJob;
