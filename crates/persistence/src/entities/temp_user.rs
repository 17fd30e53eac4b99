//! Temp user entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the temp_users table.
#[derive(Debug, Clone, FromRow)]
pub struct TempUserEntity {
    pub email: String,
    pub otp: String,
    pub otp_expires: DateTime<Utc>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TempUserEntity> for domain::models::TempUser {
    fn from(entity: TempUserEntity) -> Self {
        Self {
            email: entity.email,
            otp: entity.otp,
            otp_expires: entity.otp_expires,
            verified: entity.verified,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
