use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::middleware::auth::require_session;
use crate::state::AppState;

use super::handlers::{get_history, get_streak, get_totals, set_team};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_totals))
        .route("/team", put(set_team))
        .route("/history", get(get_history))
        .route("/streak", get(get_streak))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
}
