use axum::{
    Router, middleware,
    routing::{delete, post},
};

use crate::middleware::auth::require_session;
use crate::state::AppState;

use super::handlers::{delete_entry, record_activity};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(record_activity))
        .route("/:entry_id", delete(delete_entry))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
}
