use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::activity::{ActivityOutcome, RecordActivityRequest};
use storage::dto::common::MessageResponse;
use storage::dto::profile::HistoryEntry;
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/activity",
    request_body = RecordActivityRequest,
    responses(
        (status = 201, description = "Entry appended", body = ActivityOutcome),
        (status = 400, description = "Invalid distance"),
        (status = 409, description = "No team assigned")
    ),
    security(("bearer_auth" = [])),
    tag = "activity"
)]
pub async fn record_activity(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<RecordActivityRequest>,
) -> Result<Response, WebError> {
    let entry = services::record(state.ledger.as_ref(), &state.feed, user.user_id, &request).await?;

    tracing::info!(person_id = %user.user_id, km = entry.km, "activity recorded");

    let response = ActivityOutcome {
        message: services::outcome_message(entry.km),
        entry: HistoryEntry {
            entry_id: entry.entry_id,
            km: entry.km,
            team: entry.team,
            created_at: entry.created_at,
            proof_url: None,
        },
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/activity/{entry_id}",
    params(("entry_id" = Uuid, Path, description = "Entry to delete")),
    responses(
        (status = 200, description = "Entry and any attached proof removed", body = MessageResponse),
        (status = 404, description = "No such entry for this user")
    ),
    security(("bearer_auth" = [])),
    tag = "activity"
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(entry_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete(
        state.ledger.as_ref(),
        state.proofs.as_ref(),
        &state.feed,
        entry_id,
        user.user_id,
    )
    .await?;

    Ok(Json(MessageResponse::new("Entry deleted.")).into_response())
}
