//! Player repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PlayerEntity;
use crate::metrics::QueryTimer;

const PLAYER_COLUMNS: &str = r#"
    id, email, password_hash, is_verified, full_name, date_of_birth, gender, phone,
    preferred_role, batting_style, bowling_style, experience, image_path,
    matches_played, hundreds, fifties, runs, wickets, strike_rate, created_at
"#;

/// Column values for a new player row.
#[derive(Debug, Clone)]
pub struct PlayerInput<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub date_of_birth: NaiveDate,
    pub gender: &'a str,
    pub phone: &'a str,
    pub preferred_role: &'a str,
    pub batting_style: &'a str,
    pub bowling_style: Vec<String>,
    pub experience: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Statistic columns written by [`PlayerRepository::update_performance`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceInput {
    pub matches_played: i32,
    pub hundreds: i32,
    pub fifties: i32,
    pub runs: i32,
    pub wickets: i32,
    pub strike_rate: f64,
}

/// Repository for player database operations.
#[derive(Clone)]
pub struct PlayerRepository {
    pool: PgPool,
}

impl PlayerRepository {
    /// Creates a new PlayerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check whether a player holds the email.
    pub async fn exists_by_email(&self, email: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("player_exists_by_email");
        let result: Result<(bool,), sqlx::Error> =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM players WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        Ok(result?.0)
    }

    /// Insert a verified player.
    ///
    /// The row is written only when a verified temp user exists for the
    /// email and no player holds it yet; otherwise returns `None`.
    pub async fn insert_if_verified(
        &self,
        input: PlayerInput<'_>,
    ) -> Result<Option<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_verified_player");
        let result = sqlx::query_as::<_, PlayerEntity>(&format!(
            r#"
            INSERT INTO players (
                email, password_hash, is_verified, full_name, date_of_birth, gender, phone,
                preferred_role, batting_style, bowling_style, experience, created_at, updated_at
            )
            SELECT $1, $2, true, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11
            WHERE EXISTS (
                SELECT 1 FROM temp_users WHERE email = $1 AND verified = true
            )
            ON CONFLICT (email) DO NOTHING
            RETURNING {}
            "#,
            PLAYER_COLUMNS
        ))
        .bind(input.email)
        .bind(input.password_hash)
        .bind(input.full_name)
        .bind(input.date_of_birth)
        .bind(input.gender)
        .bind(input.phone)
        .bind(input.preferred_role)
        .bind(input.batting_style)
        .bind(input.bowling_style)
        .bind(input.experience)
        .bind(input.created_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List players best first by performance score, oldest first on ties.
    /// A `None` limit returns every player.
    pub async fn list_ranked(&self, limit: Option<i64>) -> Result<Vec<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_ranked_players");
        let result = sqlx::query_as::<_, PlayerEntity>(&format!(
            r#"
            SELECT {}
            FROM players
            ORDER BY (runs + wickets * 20 + hundreds * 50 + fifties * 20
                      + strike_rate * 2 + matches_played) DESC,
                     created_at ASC
            LIMIT $1
            "#,
            PLAYER_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Overwrite a player's statistics. Returns `None` for an unknown id.
    pub async fn update_performance(
        &self,
        id: Uuid,
        stats: PerformanceInput,
    ) -> Result<Option<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_player_performance");
        let result = sqlx::query_as::<_, PlayerEntity>(&format!(
            r#"
            UPDATE players SET
                matches_played = $2,
                hundreds = $3,
                fifties = $4,
                runs = $5,
                wickets = $6,
                strike_rate = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PLAYER_COLUMNS
        ))
        .bind(id)
        .bind(stats.matches_played)
        .bind(stats.hundreds)
        .bind(stats.fifties)
        .bind(stats.runs)
        .bind(stats.wickets)
        .bind(stats.strike_rate)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Round-trip to the database.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("ping");
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        timer.record();
        result.map(|_| ())
    }
}
