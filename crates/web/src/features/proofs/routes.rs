use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_session;
use crate::state::AppState;

use super::handlers::{attach_latest, attach_to_entry, detach, gallery};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(gallery))
        .route("/latest", post(attach_latest))
        .route("/entry/:entry_id", post(attach_to_entry).delete(detach))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
}
