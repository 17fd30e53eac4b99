//! Match entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Match, MatchResult, MatchScores};
use sqlx::FromRow;
use uuid::Uuid;

use super::player::{column, InvalidColumn};

/// Database row mapping for the matches table.
#[derive(Debug, Clone, FromRow)]
pub struct MatchEntity {
    pub id: Uuid,
    pub team_a: String,
    pub team_b: String,
    pub date: DateTime<Utc>,
    pub venue: String,
    pub result: String,
    pub score_team_a: Option<String>,
    pub score_team_b: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MatchEntity> for Match {
    type Error = InvalidColumn;

    fn try_from(entity: MatchEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            team_a: entity.team_a,
            team_b: entity.team_b,
            date: entity.date,
            venue: entity.venue,
            result: column::<MatchResult>("result", &entity.result)?,
            scores: MatchScores {
                team_a: entity.score_team_a,
                team_b: entity.score_team_b,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(result: &str) -> MatchEntity {
        let now = Utc::now();
        MatchEntity {
            id: Uuid::new_v4(),
            team_a: "Riverside CC".to_string(),
            team_b: "Hillside CC".to_string(),
            date: now,
            venue: "Riverside Oval".to_string(),
            result: result.to_string(),
            score_team_a: Some("212/8".to_string()),
            score_team_b: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_entity_to_domain() {
        let fixture = Match::try_from(entity("no result")).unwrap();
        assert_eq!(fixture.result, MatchResult::NoResult);
        assert_eq!(fixture.scores.team_a.as_deref(), Some("212/8"));
        assert!(fixture.scores.team_b.is_none());
    }

    #[test]
    fn test_entity_with_unknown_result() {
        let err = Match::try_from(entity("abandoned")).unwrap_err();
        assert_eq!(err.column, "result");
    }
}
