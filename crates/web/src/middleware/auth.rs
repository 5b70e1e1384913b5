use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::state::AppState;

/// Authenticated caller, attached as a request extension by
/// `require_session`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(&request).ok_or(WebError::Unauthorized)?;

    let session = state
        .identity
        .session(&token)
        .await
        .map_err(WebError::Storage)?;

    let Some(session) = session else {
        tracing::warn!("rejected request with invalid session token");
        return Err(WebError::Unauthorized);
    };

    request.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        email: session.email,
        token,
    });

    Ok(next.run(request).await)
}

/// Layered after `require_session` on admin routes.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(WebError::Unauthorized)?;

    let is_admin = state
        .admin
        .is_admin(state.ledger.as_ref(), user.user_id)
        .await
        .map_err(WebError::Storage)?;

    if !is_admin {
        tracing::warn!(user_id = %user.user_id, "non-admin attempted admin route");
        return Err(WebError::Forbidden);
    }

    Ok(next.run(request).await)
}
