//! Tournaments the club enters or hosts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

wire_enum!(TournamentFormat {
    T20 => "T20",
    Odi => "ODI",
    Test => "Test",
});

wire_enum!(TournamentStatus {
    Upcoming => "Upcoming",
    Ongoing => "Ongoing",
    Completed => "Completed",
});

impl Default for TournamentFormat {
    fn default() -> Self {
        Self::T20
    }
}

impl Default for TournamentStatus {
    fn default() -> Self {
        Self::Upcoming
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub organizer: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    pub format: TournamentFormat,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
}

/// Orders tournaments by start date, earliest first; ties keep the earlier
/// entry first.
pub fn schedule_tournaments(tournaments: &mut [Tournament]) {
    tournaments.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then(a.created_at.cmp(&b.created_at))
    });
}
