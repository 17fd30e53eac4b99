//! Tournament repository for database operations.

use sqlx::PgPool;

use crate::entities::TournamentEntity;
use crate::metrics::QueryTimer;

/// Repository for tournament database operations.
#[derive(Clone)]
pub struct TournamentRepository {
    pool: PgPool,
}

impl TournamentRepository {
    /// Creates a new TournamentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All tournaments, earliest start first.
    pub async fn list_all(&self) -> Result<Vec<TournamentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_tournaments");
        let result = sqlx::query_as::<_, TournamentEntity>(
            r#"
            SELECT id, name, organizer, start_date, end_date, location, format, status, created_at
            FROM tournaments
            ORDER BY start_date ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
