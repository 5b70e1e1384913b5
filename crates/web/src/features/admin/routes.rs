use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::{require_admin, require_session};
use crate::state::AppState;

use super::handlers::{list_people, randomize_teams};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/people", get(list_people))
        .route("/randomize", post(randomize_teams))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
}
