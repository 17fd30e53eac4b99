//! Public match and tournament listings.

use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::store::{FixtureStore, StoreError};
use crate::models::{Match, Tournament};

/// Read-only view over the club calendar.
pub struct FixtureService {
    store: Arc<dyn FixtureStore>,
    clock: Arc<dyn Clock>,
}

impl FixtureService {
    pub fn new(store: Arc<dyn FixtureStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Every match, most recent first.
    pub async fn matches(&self) -> Result<Vec<Match>, StoreError> {
        self.store.list_matches().await
    }

    /// Pending matches still ahead of the clock, soonest first.
    pub async fn upcoming_matches(&self) -> Result<Vec<Match>, StoreError> {
        self.store.upcoming_matches(self.clock.now()).await
    }

    pub async fn completed_matches(&self) -> Result<Vec<Match>, StoreError> {
        self.store.completed_matches().await
    }

    pub async fn tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        self.store.list_tournaments().await
    }
}
