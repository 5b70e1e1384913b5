use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::auth::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, SessionResponse,
};
use storage::dto::common::MessageResponse;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid username or password"),
        (status = 409, description = "Username already taken")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, WebError> {
    request.validate()?;

    let user_id = services::register(
        state.identity.as_ref(),
        state.ledger.as_ref(),
        &request.username,
        &request.password,
    )
    .await?;

    tracing::info!(%user_id, "registered new account");

    let response = RegisterResponse {
        user_id,
        message: "User created!".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, WebError> {
    request.validate()?;

    let access_token =
        services::login(state.identity.as_ref(), &request.username, &request.password).await?;

    Ok(Json(LoginResponse { access_token }).into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    services::logout(state.identity.as_ref(), &user.token).await?;

    Ok(Json(MessageResponse::new("Logged out.")).into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn session(Extension(user): Extension<CurrentUser>) -> Result<Response, WebError> {
    let response = SessionResponse {
        user_id: user.user_id,
        email: user.email,
    };

    Ok(Json(response).into_response())
}
