//! Temp user repository for database operations.
//!
//! Each write carries its own precondition in the WHERE clause so that
//! concurrent handshake calls for one email serialize on the row.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::TempUserEntity;
use crate::metrics::QueryTimer;

const TEMP_USER_COLUMNS: &str = "email, otp, otp_expires, verified, created_at, updated_at";

/// Repository for temp user database operations.
#[derive(Clone)]
pub struct TempUserRepository {
    pool: PgPool,
}

impl TempUserRepository {
    /// Creates a new TempUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the temp user for an email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<TempUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_temp_user_by_email");
        let result = sqlx::query_as::<_, TempUserEntity>(&format!(
            "SELECT {} FROM temp_users WHERE email = $1",
            TEMP_USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new code, or overwrite the existing one only if it has
    /// expired at `now`. Returns `None` when an unexpired code blocked the
    /// write.
    pub async fn upsert_code(
        &self,
        email: &str,
        otp: &str,
        otp_expires: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<TempUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("upsert_temp_user_code");
        let result = sqlx::query_as::<_, TempUserEntity>(&format!(
            r#"
            INSERT INTO temp_users (email, otp, otp_expires, verified, created_at, updated_at)
            VALUES ($1, $2, $3, false, $4, $4)
            ON CONFLICT (email) DO UPDATE SET
                otp = EXCLUDED.otp,
                otp_expires = EXCLUDED.otp_expires,
                verified = false,
                updated_at = EXCLUDED.updated_at
            WHERE temp_users.otp_expires <= EXCLUDED.updated_at
            RETURNING {}
            "#,
            TEMP_USER_COLUMNS
        ))
        .bind(email)
        .bind(otp)
        .bind(otp_expires)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Expire an unverified code immediately.
    /// Returns the number of rows affected (0 if the code was replaced).
    pub async fn expire_code(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("expire_temp_user_code");
        let result = sqlx::query(
            r#"
            UPDATE temp_users
            SET otp_expires = $3, updated_at = $3
            WHERE email = $1 AND otp = $2 AND verified = false
            "#,
        )
        .bind(email)
        .bind(otp)
        .bind(now)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Flag the record verified if `otp` matches and is unexpired at `now`.
    pub async fn mark_verified(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TempUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_temp_user_verified");
        let result = sqlx::query_as::<_, TempUserEntity>(&format!(
            r#"
            UPDATE temp_users
            SET verified = true, updated_at = $3
            WHERE email = $1 AND otp = $2 AND otp_expires >= $3
            RETURNING {}
            "#,
            TEMP_USER_COLUMNS
        ))
        .bind(email)
        .bind(otp)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete the record for an email.
    pub async fn delete_by_email(&self, email: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_temp_user");
        let result = sqlx::query("DELETE FROM temp_users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Delete never-verified records whose code expired before `cutoff`.
    pub async fn delete_expired_unverified(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expired_temp_users");
        let result = sqlx::query(
            r#"
            DELETE FROM temp_users
            WHERE verified = false AND otp_expires < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
