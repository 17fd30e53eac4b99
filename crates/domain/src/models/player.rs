//! Permanent player accounts and their cricket profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::registration::InputError;

lazy_static::lazy_static! {
    /// Digits with optional leading `+` and common separators.
    pub static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^\+?[0-9(][0-9 ()\-]{5,18}[0-9]$").unwrap();
}

wire_enum!(Gender {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

wire_enum!(PreferredRole {
    Batsman => "Batsman",
    Bowler => "Bowler",
    AllRounder => "All-Rounder",
    WicketKeeper => "Wicket-Keeper",
});

wire_enum!(BattingStyle {
    Right => "Right",
    Left => "Left",
});

wire_enum!(BowlingStyle {
    Fast => "Fast",
    Medium => "Medium",
    Spin => "Spin",
    LeftArm => "Left-arm",
    RightArm => "Right-arm",
});

wire_enum!(Experience {
    Beginner => "Beginner",
    Intermediate => "Intermediate",
    Advanced => "Advanced",
    Professional => "Professional",
});

/// Career statistics maintained by the club.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub matches_played: i32,
    pub hundreds: i32,
    pub fifties: i32,
    pub strike_rate: f64,
    pub runs: i32,
    pub wickets: i32,
}

impl Performance {
    /// Ranking score used for the roster and featured players.
    pub fn score(&self) -> f64 {
        f64::from(self.runs)
            + f64::from(self.wickets) * 20.0
            + f64::from(self.hundreds) * 50.0
            + f64::from(self.fifties) * 20.0
            + self.strike_rate * 2.0
            + f64::from(self.matches_played)
    }

    /// Rejects negative counts and a non-finite or negative strike rate.
    pub fn validate(&self) -> Result<(), InputError> {
        let counts = [
            ("matchesPlayed", self.matches_played),
            ("hundreds", self.hundreds),
            ("fifties", self.fifties),
            ("runs", self.runs),
            ("wickets", self.wickets),
        ];
        if let Some(&(field, _)) = counts.iter().find(|(_, value)| *value < 0) {
            return Err(InputError::field(field, "must not be negative"));
        }
        if !self.strike_rate.is_finite() || self.strike_rate < 0.0 {
            return Err(InputError::field("strikeRate", "must be a non-negative number"));
        }
        Ok(())
    }
}

/// Personal and playing details supplied at registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone: String,
    pub preferred_role: PreferredRole,
    pub batting_style: BattingStyle,
    pub bowling_style: Vec<BowlingStyle>,
    pub experience: Experience,
}

/// A registered club member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub is_verified: bool,
    #[serde(flatten)]
    pub profile: PlayerProfile,
    pub image_path: String,
    pub performance: Performance,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a player row.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub email: String,
    pub password_hash: String,
    pub profile: PlayerProfile,
    /// Registration time, taken from the service clock.
    pub created_at: DateTime<Utc>,
}

/// Orders players best first by performance score; ties keep the earlier
/// registration first.
pub fn rank_players(players: &mut [Player]) {
    players.sort_by(|a, b| {
        b.performance
            .score()
            .total_cmp(&a.performance.score())
            .then(a.created_at.cmp(&b.created_at))
    });
}
