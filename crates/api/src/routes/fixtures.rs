//! Public match and tournament listings.

use axum::{extract::State, Json};
use domain::models::{Match, Tournament};

use crate::app::AppState;
use crate::error::ApiError;

/// All matches, most recent first.
///
/// GET /api/matches
pub async fn list_matches(State(state): State<AppState>) -> Result<Json<Vec<Match>>, ApiError> {
    Ok(Json(state.fixtures.matches().await?))
}

/// Pending matches that have not started yet, soonest first.
///
/// GET /api/matches/future
pub async fn future_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<Match>>, ApiError> {
    Ok(Json(state.fixtures.upcoming_matches().await?))
}

/// GET /api/matches/completed
pub async fn completed_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<Match>>, ApiError> {
    Ok(Json(state.fixtures.completed_matches().await?))
}

/// GET /api/tournaments
pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    Ok(Json(state.fixtures.tournaments().await?))
}
