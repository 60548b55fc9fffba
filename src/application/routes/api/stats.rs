use axum::Json;
use axum::extract::{Path, State};

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::services::stats::compute_reading_stats;
use crate::application::state::AppState;
use crate::domain::stats::ReadingStats;

/// The calling user's reading report.
#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn get_own_stats(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<Json<ReadingStats>, ApiError> {
    let stats = compute_reading_stats(&*state.tracked_book_repo, auth_user.user.id)
        .await
        .map_err(AppError::from)?;

    Ok(Json(stats))
}

/// Another member's reading report, looked up by username. 404 when the
/// username is unknown.
#[tracing::instrument(skip(state, _auth_user))]
pub(crate) async fn get_user_stats(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(username): Path<String>,
) -> Result<Json<ReadingStats>, ApiError> {
    let user = state
        .user_repo
        .get_by_username(&username)
        .await
        .map_err(AppError::from)?;

    let stats = compute_reading_stats(&*state.tracked_book_repo, user.id)
        .await
        .map_err(AppError::from)?;

    Ok(Json(stats))
}
