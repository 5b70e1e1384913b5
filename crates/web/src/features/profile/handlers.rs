use axum::{
    Extension, Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::dto::activity::SetTeamRequest;
use storage::dto::common::{MessageResponse, PaginatedResponse, PaginationParams};
use storage::dto::profile::{HistoryEntry, StreakResponse};
use storage::models::MemberTotal;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Per-team totals for the caller", body = Vec<MemberTotal>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn get_totals(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let totals = services::totals(state.ledger.as_ref(), user.user_id).await?;

    Ok(Json(totals).into_response())
}

#[utoipa::path(
    put,
    path = "/api/profile/team",
    request_body = SetTeamRequest,
    responses(
        (status = 200, description = "Team updated", body = MessageResponse),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn set_team(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<SetTeamRequest>,
) -> Result<Response, WebError> {
    services::set_team(state.ledger.as_ref(), user.user_id, request.team).await?;

    Ok(Json(MessageResponse::new("Team selected!")).into_response())
}

#[utoipa::path(
    get,
    path = "/api/profile/history",
    params(PaginationParams),
    responses(
        (status = 200, description = "Activity history, newest first", body = PaginatedResponse<HistoryEntry>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn get_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (entries, total_items) = services::history(
        state.ledger.as_ref(),
        state.proofs.as_ref(),
        user.user_id,
        &pagination,
    )
    .await?;

    let response = PaginatedResponse::new(
        entries,
        pagination.page,
        pagination.page_size,
        total_items,
    );

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/profile/streak",
    responses(
        (status = 200, description = "Consecutive active days ending today", body = StreakResponse),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn get_streak(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let streak = services::streak(state.ledger.as_ref(), user.user_id).await?;

    Ok(Json(StreakResponse { streak }).into_response())
}
