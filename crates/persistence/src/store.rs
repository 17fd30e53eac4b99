//! PostgreSQL implementation of the domain store traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::models::{Match, NewPlayer, Performance, Player, TempUser, Tournament};
use domain::services::{FixtureStore, PlayerStore, StoreError, TempUserStore};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::InvalidColumn;
use crate::repositories::{
    MatchRepository, PerformanceInput, PlayerInput, PlayerRepository, TempUserRepository,
    TournamentRepository,
};

/// Store backed by the `temp_users`, `players`, `matches` and `tournaments`
/// tables.
#[derive(Clone)]
pub struct PgStore {
    temp_users: TempUserRepository,
    players: PlayerRepository,
    matches: MatchRepository,
    tournaments: TournamentRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            temp_users: TempUserRepository::new(pool.clone()),
            players: PlayerRepository::new(pool.clone()),
            matches: MatchRepository::new(pool.clone()),
            tournaments: TournamentRepository::new(pool),
        }
    }
}

/// Converts fetched rows, failing on the first value outside its set.
fn domain_rows<E, T>(rows: Vec<E>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<E, Error = InvalidColumn>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::Backend(e.to_string()))
}

fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            StoreError::Backend(other.to_string())
        }
    }
}

#[async_trait]
impl TempUserStore for PgStore {
    async fn find_temp_user(&self, email: &str) -> Result<Option<TempUser>, StoreError> {
        let row = self
            .temp_users
            .find_by_email(email)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn issue_code(
        &self,
        email: &str,
        otp: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<TempUser>, StoreError> {
        let row = self
            .temp_users
            .upsert_code(email, otp, expires_at, now)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn revoke_code(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let affected = self
            .temp_users
            .expire_code(email, otp, now)
            .await
            .map_err(store_error)?;
        Ok(affected > 0)
    }

    async fn mark_verified(
        &self,
        email: &str,
        otp: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<TempUser>, StoreError> {
        let row = self
            .temp_users
            .mark_verified(email, otp, now)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_temp_user(&self, email: &str) -> Result<bool, StoreError> {
        let affected = self
            .temp_users
            .delete_by_email(email)
            .await
            .map_err(store_error)?;
        Ok(affected > 0)
    }

    async fn purge_expired_unverified(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        self.temp_users
            .delete_expired_unverified(cutoff)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl PlayerStore for PgStore {
    async fn player_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.players
            .exists_by_email(email)
            .await
            .map_err(store_error)
    }

    async fn create_player(&self, player: NewPlayer) -> Result<Option<Player>, StoreError> {
        let profile = &player.profile;
        let input = PlayerInput {
            email: &player.email,
            password_hash: &player.password_hash,
            full_name: &profile.full_name,
            date_of_birth: profile.date_of_birth,
            gender: profile.gender.as_str(),
            phone: &profile.phone,
            preferred_role: profile.preferred_role.as_str(),
            batting_style: profile.batting_style.as_str(),
            bowling_style: profile
                .bowling_style
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            experience: profile.experience.as_str(),
            created_at: player.created_at,
        };

        let row = self
            .players
            .insert_if_verified(input)
            .await
            .map_err(store_error)?;
        row.map(Player::try_from)
            .transpose()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn list_ranked(&self, limit: Option<i64>) -> Result<Vec<Player>, StoreError> {
        let rows = self
            .players
            .list_ranked(limit)
            .await
            .map_err(store_error)?;
        domain_rows(rows)
    }

    async fn update_performance(
        &self,
        id: Uuid,
        performance: &Performance,
    ) -> Result<Option<Player>, StoreError> {
        let stats = PerformanceInput {
            matches_played: performance.matches_played,
            hundreds: performance.hundreds,
            fifties: performance.fifties,
            runs: performance.runs,
            wickets: performance.wickets,
            strike_rate: performance.strike_rate,
        };
        let row = self
            .players
            .update_performance(id, stats)
            .await
            .map_err(store_error)?;
        row.map(Player::try_from)
            .transpose()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.players.ping().await.map_err(store_error)
    }
}

#[async_trait]
impl FixtureStore for PgStore {
    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        domain_rows(self.matches.list_all().await.map_err(store_error)?)
    }

    async fn upcoming_matches(&self, now: DateTime<Utc>) -> Result<Vec<Match>, StoreError> {
        domain_rows(self.matches.list_upcoming(now).await.map_err(store_error)?)
    }

    async fn completed_matches(&self) -> Result<Vec<Match>, StoreError> {
        domain_rows(self.matches.list_completed().await.map_err(store_error)?)
    }

    async fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        domain_rows(self.tournaments.list_all().await.map_err(store_error)?)
    }
}
