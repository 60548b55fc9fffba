pub(crate) mod stats;

use axum::routing::get;

use crate::application::state::AppState;

pub(super) fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/stats", get(stats::get_own_stats))
        .route("/users/{username}/stats", get(stats::get_user_stats))
}
