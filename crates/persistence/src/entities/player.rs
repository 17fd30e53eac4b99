//! Player entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{
    BattingStyle, BowlingStyle, Experience, Gender, Performance, Player, PlayerProfile,
    PreferredRole,
};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A stored value outside its enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} in column {column}")]
pub struct InvalidColumn {
    pub column: &'static str,
    pub value: String,
}

/// Database row mapping for the players table.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone: String,
    pub preferred_role: String,
    pub batting_style: String,
    pub bowling_style: Vec<String>,
    pub experience: String,
    pub image_path: String,
    pub matches_played: i32,
    pub hundreds: i32,
    pub fifties: i32,
    pub runs: i32,
    pub wickets: i32,
    pub strike_rate: f64,
    pub created_at: DateTime<Utc>,
}

pub(crate) fn column<T: FromStr>(
    column: &'static str,
    value: &str,
) -> Result<T, InvalidColumn> {
    T::from_str(value).map_err(|_| InvalidColumn {
        column,
        value: value.to_string(),
    })
}

impl TryFrom<PlayerEntity> for Player {
    type Error = InvalidColumn;

    fn try_from(entity: PlayerEntity) -> Result<Self, Self::Error> {
        let bowling_style = entity
            .bowling_style
            .iter()
            .map(|s| column::<BowlingStyle>("bowling_style", s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            is_verified: entity.is_verified,
            profile: PlayerProfile {
                full_name: entity.full_name,
                date_of_birth: entity.date_of_birth,
                gender: column::<Gender>("gender", &entity.gender)?,
                phone: entity.phone,
                preferred_role: column::<PreferredRole>("preferred_role", &entity.preferred_role)?,
                batting_style: column::<BattingStyle>("batting_style", &entity.batting_style)?,
                bowling_style,
                experience: column::<Experience>("experience", &entity.experience)?,
            },
            image_path: entity.image_path,
            performance: Performance {
                matches_played: entity.matches_played,
                hundreds: entity.hundreds,
                fifties: entity.fifties,
                strike_rate: entity.strike_rate,
                runs: entity.runs,
                wickets: entity.wickets,
            },
            created_at: entity.created_at,
        })
    }
}
