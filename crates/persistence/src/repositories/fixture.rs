//! Match repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::MatchEntity;
use crate::metrics::QueryTimer;

const MATCH_COLUMNS: &str = r#"
    id, team_a, team_b, date, venue, result, score_team_a, score_team_b, created_at, updated_at
"#;

/// Repository for match database operations.
#[derive(Clone)]
pub struct MatchRepository {
    pool: PgPool,
}

impl MatchRepository {
    /// Creates a new MatchRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All matches, most recent first.
    pub async fn list_all(&self) -> Result<Vec<MatchEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_matches");
        let result = sqlx::query_as::<_, MatchEntity>(&format!(
            "SELECT {} FROM matches ORDER BY date DESC, created_at ASC",
            MATCH_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Pending matches dated after `now`, soonest first.
    pub async fn list_upcoming(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<MatchEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_upcoming_matches");
        let result = sqlx::query_as::<_, MatchEntity>(&format!(
            r#"
            SELECT {}
            FROM matches
            WHERE date > $1 AND result = 'pending'
            ORDER BY date ASC, created_at ASC
            "#,
            MATCH_COLUMNS
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Matches with a recorded result, most recent first.
    pub async fn list_completed(&self) -> Result<Vec<MatchEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_completed_matches");
        let result = sqlx::query_as::<_, MatchEntity>(&format!(
            r#"
            SELECT {}
            FROM matches
            WHERE result <> 'pending'
            ORDER BY date DESC, created_at ASC
            "#,
            MATCH_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
