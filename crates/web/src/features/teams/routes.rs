use axum::{Router, routing::get};

use crate::state::AppState;

use super::handlers::{get_scoreboard, get_total, team_events};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/:team/scoreboard", get(get_scoreboard))
        .route("/:team/total", get(get_total))
        .route("/:team/events", get(team_events))
}
