//! Scheduled and played matches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

wire_enum!(
    /// Outcome of a match; `Pending` until it has been played.
    MatchResult {
        TeamA => "teamA",
        TeamB => "teamB",
        Draw => "draw",
        NoResult => "no result",
        Pending => "pending",
    }
);

impl Default for MatchResult {
    fn default() -> Self {
        Self::Pending
    }
}

/// Free-form scorecard summary per side, e.g. "187/6 (20)".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScores {
    pub team_a: Option<String>,
    pub team_b: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub team_a: String,
    pub team_b: String,
    pub date: DateTime<Utc>,
    pub venue: String,
    pub result: MatchResult,
    pub scores: MatchScores,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Still to be played: scheduled after `now` with no result recorded.
    pub fn is_upcoming_at(&self, now: DateTime<Utc>) -> bool {
        self.date > now && self.result == MatchResult::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.result != MatchResult::Pending
    }

    /// Most recent first; equal dates keep the earlier entry first.
    pub fn latest_first(a: &Match, b: &Match) -> Ordering {
        b.date.cmp(&a.date).then(a.created_at.cmp(&b.created_at))
    }

    /// Soonest first.
    pub fn soonest_first(a: &Match, b: &Match) -> Ordering {
        a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, TimeZone};
    use std::str::FromStr;

    fn fixture(days: i64, result: MatchResult) -> Match {
        let base = Utc.with_ymd_and_hms(2026, 6, 1, 10, 30, 0).unwrap();
        Match {
            id: Uuid::new_v4(),
            team_a: "Riverside CC".to_string(),
            team_b: "Hillside CC".to_string(),
            date: base + Duration::days(days),
            venue: "Riverside Oval".to_string(),
            result,
            scores: MatchScores::default(),
            created_at: base,
            updated_at: base,
        }
    }

    #[test]
    fn test_result_wire_spelling() {
        assert_eq!(MatchResult::NoResult.as_str(), "no result");
        assert_eq!(
            serde_json::to_string(&MatchResult::TeamA).unwrap(),
            "\"teamA\""
        );
        assert_eq!(MatchResult::from_str("No Result").unwrap(), MatchResult::NoResult);
        assert!(MatchResult::from_str("abandoned").is_err());
        assert_eq!(MatchResult::default(), MatchResult::Pending);
    }

    #[test]
    fn test_upcoming_requires_future_date_and_pending_result() {
        let now = Utc.with_ymd_and_hms(2026, 6, 5, 0, 0, 0).unwrap();
        assert!(fixture(7, MatchResult::Pending).is_upcoming_at(now));
        assert!(!fixture(1, MatchResult::Pending).is_upcoming_at(now));
        assert!(!fixture(7, MatchResult::Draw).is_upcoming_at(now));
    }

    #[test]
    fn test_completed_is_any_recorded_result() {
        assert!(fixture(0, MatchResult::NoResult).is_completed());
        assert!(fixture(0, MatchResult::TeamB).is_completed());
        assert!(!fixture(0, MatchResult::Pending).is_completed());
    }

    #[test]
    fn test_orderings() {
        let mut matches = vec![
            fixture(3, MatchResult::Pending),
            fixture(1, MatchResult::Pending),
            fixture(2, MatchResult::Pending),
        ];
        matches.sort_by(Match::latest_first);
        let days: Vec<u32> = matches.iter().map(|m| m.date.date_naive().day0()).collect();
        assert_eq!(days, vec![3, 2, 1]);

        matches.sort_by(Match::soonest_first);
        let days: Vec<u32> = matches.iter().map(|m| m.date.date_naive().day0()).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn test_match_serialization() {
        let mut m = fixture(0, MatchResult::TeamA);
        m.scores.team_a = Some("187/6".to_string());
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["teamA"], "Riverside CC");
        assert_eq!(json["result"], "teamA");
        assert_eq!(json["scores"]["teamA"], "187/6");
        assert!(json["scores"]["teamB"].is_null());
        assert!(json.get("createdAt").is_some());
    }
}
