//! Tournament entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{Tournament, TournamentFormat, TournamentStatus};
use sqlx::FromRow;
use uuid::Uuid;

use super::player::{column, InvalidColumn};

/// Database row mapping for the tournaments table.
#[derive(Debug, Clone, FromRow)]
pub struct TournamentEntity {
    pub id: Uuid,
    pub name: String,
    pub organizer: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    pub format: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TournamentEntity> for Tournament {
    type Error = InvalidColumn;

    fn try_from(entity: TournamentEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            name: entity.name,
            organizer: entity.organizer,
            start_date: entity.start_date,
            end_date: entity.end_date,
            location: entity.location,
            format: column::<TournamentFormat>("format", &entity.format)?,
            status: column::<TournamentStatus>("status", &entity.status)?,
            created_at: entity.created_at,
        })
    }
}
