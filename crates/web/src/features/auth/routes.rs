use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_session;
use crate::state::AppState;

use super::handlers::{login, logout, register, session};

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/session", get(session))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}
