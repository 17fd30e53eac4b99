//! Storage seams for the registration handshake.
//!
//! Every operation is a single atomic step against the backing store. The
//! handshake never holds a lock across calls; conditions that must hold at
//! write time are part of the write itself.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    rank_players, schedule_tournaments, Match, NewPlayer, Performance, Player, TempUser, Tournament,
};

/// Failure of the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store error: {0}")]
    Backend(String),
}

#[async_trait::async_trait]
pub trait TempUserStore: Send + Sync {
    async fn find_temp_user(&self, email: &str) -> Result<Option<TempUser>, StoreError>;

    /// Creates or refreshes the record for `email` with a new code.
    ///
    /// Returns `None` without touching the record when its current code is
    /// still valid at `now`. A refreshed record is reset to unverified.
    async fn issue_code(
        &self,
        email: &str,
        otp: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<TempUser>, StoreError>;

    /// Expires `otp` immediately if it is still the unverified code on file.
    async fn revoke_code(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Sets `verified` when `otp` matches and has not expired at `now`.
    ///
    /// Returns `None` when the condition does not hold at write time.
    async fn mark_verified(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TempUser>, StoreError>;

    async fn delete_temp_user(&self, email: &str) -> Result<bool, StoreError>;

    /// Deletes unverified records whose code expired before `cutoff`.
    async fn purge_expired_unverified(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}

#[async_trait::async_trait]
pub trait PlayerStore: Send + Sync {
    async fn player_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// Inserts a player when no player holds the email and a verified
    /// transient record exists for it. Returns `None` otherwise.
    async fn create_player(&self, player: NewPlayer) -> Result<Option<Player>, StoreError>;

    /// Players ordered by performance score, best first.
    async fn list_ranked(&self, limit: Option<i64>) -> Result<Vec<Player>, StoreError>;

    /// Replaces a player's statistics. Returns `None` for an unknown id.
    async fn update_performance(
        &self,
        id: Uuid,
        performance: &Performance,
    ) -> Result<Option<Player>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Read side of the match and tournament listings.
#[async_trait::async_trait]
pub trait FixtureStore: Send + Sync {
    /// Every match, most recent first.
    async fn list_matches(&self) -> Result<Vec<Match>, StoreError>;

    /// Pending matches scheduled after `now`, soonest first.
    async fn upcoming_matches(&self, now: DateTime<Utc>) -> Result<Vec<Match>, StoreError>;

    /// Matches with a recorded result, most recent first.
    async fn completed_matches(&self) -> Result<Vec<Match>, StoreError>;

    /// Every tournament, earliest start first.
    async fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError>;
}

#[derive(Debug, Default)]
struct State {
    temp_users: HashMap<String, TempUser>,
    players: HashMap<String, Player>,
    matches: Vec<Match>,
    tournaments: Vec<Tournament>,
}

/// Process-local store for development and testing.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Stores a record as-is, bypassing the handshake conditions.
    pub fn insert_temp_user(&self, user: TempUser) {
        if let Ok(mut state) = self.state.write() {
            state.temp_users.insert(user.email.clone(), user);
        }
    }

    /// Adds a match to the listings.
    pub fn insert_match(&self, fixture: Match) {
        if let Ok(mut state) = self.state.write() {
            state.matches.push(fixture);
        }
    }

    pub fn insert_tournament(&self, tournament: Tournament) {
        if let Ok(mut state) = self.state.write() {
            state.tournaments.push(tournament);
        }
    }

    pub fn temp_user_count(&self) -> usize {
        self.state.read().map(|s| s.temp_users.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.check_available()?;
        self.state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.check_available()?;
        self.state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TempUserStore for InMemoryStore {
    async fn find_temp_user(&self, email: &str) -> Result<Option<TempUser>, StoreError> {
        Ok(self.read()?.temp_users.get(email).cloned())
    }

    async fn issue_code(
        &self,
        email: &str,
        otp: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<TempUser>, StoreError> {
        let mut state = self.write()?;
        let user = match state.temp_users.get(email) {
            Some(existing) if existing.blocks_new_code_at(now) => return Ok(None),
            Some(existing) => TempUser {
                otp: otp.to_string(),
                otp_expires: expires_at,
                verified: false,
                updated_at: now,
                ..existing.clone()
            },
            None => TempUser {
                email: email.to_string(),
                otp: otp.to_string(),
                otp_expires: expires_at,
                verified: false,
                created_at: now,
                updated_at: now,
            },
        };
        state.temp_users.insert(email.to_string(), user.clone());
        Ok(Some(user))
    }

    async fn revoke_code(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut state = self.write()?;
        match state.temp_users.get_mut(email) {
            Some(user) if user.otp == otp && !user.verified => {
                user.otp_expires = now;
                user.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_verified(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TempUser>, StoreError> {
        let mut state = self.write()?;
        match state.temp_users.get_mut(email) {
            Some(user) if user.otp == otp && user.otp_expires >= now => {
                user.verified = true;
                user.updated_at = now;
                Ok(Some(user.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_temp_user(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.write()?.temp_users.remove(email).is_some())
    }

    async fn purge_expired_unverified(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut state = self.write()?;
        let before = state.temp_users.len();
        state
            .temp_users
            .retain(|_, user| user.verified || user.otp_expires >= cutoff);
        Ok((before - state.temp_users.len()) as u64)
    }
}

#[async_trait::async_trait]
impl PlayerStore for InMemoryStore {
    async fn player_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.players.contains_key(email))
    }

    async fn create_player(&self, player: NewPlayer) -> Result<Option<Player>, StoreError> {
        let mut state = self.write()?;
        if state.players.contains_key(&player.email) {
            return Ok(None);
        }
        let verified = state
            .temp_users
            .get(&player.email)
            .map(|t| t.verified)
            .unwrap_or(false);
        if !verified {
            return Ok(None);
        }

        let created = Player {
            id: Uuid::new_v4(),
            email: player.email.clone(),
            password_hash: player.password_hash,
            is_verified: true,
            profile: player.profile,
            image_path: String::new(),
            performance: Performance::default(),
            created_at: player.created_at,
        };
        state.players.insert(player.email, created.clone());
        Ok(Some(created))
    }

    async fn list_ranked(&self, limit: Option<i64>) -> Result<Vec<Player>, StoreError> {
        let mut players: Vec<Player> = self.read()?.players.values().cloned().collect();
        rank_players(&mut players);
        if let Some(limit) = limit {
            players.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }
        Ok(players)
    }

    async fn update_performance(
        &self,
        id: Uuid,
        performance: &Performance,
    ) -> Result<Option<Player>, StoreError> {
        let mut state = self.write()?;
        Ok(state.players.values_mut().find(|p| p.id == id).map(|player| {
            player.performance = performance.clone();
            player.clone()
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

#[async_trait::async_trait]
impl FixtureStore for InMemoryStore {
    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        let mut matches = self.read()?.matches.clone();
        matches.sort_by(Match::latest_first);
        Ok(matches)
    }

    async fn upcoming_matches(&self, now: DateTime<Utc>) -> Result<Vec<Match>, StoreError> {
        let mut matches: Vec<Match> = self
            .read()?
            .matches
            .iter()
            .filter(|m| m.is_upcoming_at(now))
            .cloned()
            .collect();
        matches.sort_by(Match::soonest_first);
        Ok(matches)
    }

    async fn completed_matches(&self) -> Result<Vec<Match>, StoreError> {
        let mut matches: Vec<Match> = self
            .read()?
            .matches
            .iter()
            .filter(|m| m.is_completed())
            .cloned()
            .collect();
        matches.sort_by(Match::latest_first);
        Ok(matches)
    }

    async fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        let mut tournaments = self.read()?.tournaments.clone();
        schedule_tournaments(&mut tournaments);
        Ok(tournaments)
    }
}
