use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::admin::{RandomizeRequest, RandomizeResponse};
use storage::models::Person;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/admin/people",
    responses(
        (status = 200, description = "Everyone registered, for the draw roster", body = Vec<Person>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_people(State(state): State<AppState>) -> Result<Response, WebError> {
    let people = services::list_people(state.ledger.as_ref()).await?;

    Ok(Json(people).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/randomize",
    request_body = RandomizeRequest,
    responses(
        (status = 200, description = "Teams redrawn", body = RandomizeResponse),
        (status = 400, description = "Fewer than two people selected"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn randomize_teams(
    State(state): State<AppState>,
    Json(request): Json<RandomizeRequest>,
) -> Result<Response, WebError> {
    request.validate()?;

    let draw = services::randomize_teams(state.ledger.as_ref(), request.people).await?;

    tracing::info!(
        blue = draw.blue.len(),
        red = draw.red.len(),
        "teams redrawn"
    );

    let response = RandomizeResponse {
        draw,
        message: "Teams saved!".to_string(),
    };

    Ok(Json(response).into_response())
}
