//! Player registration and roster endpoints.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use domain::models::{Player, RegistrationForm};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_player_registered;

/// Create the permanent account for a verified email.
///
/// POST /api/players/register
pub async fn register_player(
    State(state): State<AppState>,
    WithRejection(Json(form), _): WithRejection<Json<RegistrationForm>, ApiError>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = state.registration.complete_registration(form).await?;
    record_player_registered();
    Ok((StatusCode::CREATED, Json(player)))
}

/// All players, ranked by performance score.
///
/// GET /api/players
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>, ApiError> {
    Ok(Json(state.registration.list_players().await?))
}

/// GET /api/players/featured
pub async fn featured_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<Player>>, ApiError> {
    Ok(Json(state.registration.featured_players().await?))
}
