use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::common::MessageResponse;
use storage::dto::profile::{ProofItem, ProofUploadResponse};
use storage::store::ProofTarget;
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

use super::services;

async fn attach(
    state: &AppState,
    user: &CurrentUser,
    target: ProofTarget,
    bytes: &[u8],
) -> Result<Response, WebError> {
    let proof_url = services::attach(
        state.ledger.as_ref(),
        state.proofs.as_ref(),
        &state.feed,
        state.image_limits,
        user.user_id,
        target,
        bytes,
    )
    .await?;

    tracing::info!(person_id = %user.user_id, "proof uploaded");

    let response = ProofUploadResponse {
        proof_url,
        message: "Proof uploaded!".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/proofs/latest",
    request_body(content = Vec<u8>, content_type = "image/jpeg"),
    responses(
        (status = 201, description = "Proof attached to the newest entry", body = ProofUploadResponse),
        (status = 409, description = "Newest entry already has a proof")
    ),
    security(("bearer_auth" = [])),
    tag = "proofs"
)]
pub async fn attach_latest(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    bytes: Bytes,
) -> Result<Response, WebError> {
    attach(&state, &user, ProofTarget::Latest, &bytes).await
}

#[utoipa::path(
    post,
    path = "/api/proofs/entry/{entry_id}",
    params(("entry_id" = Uuid, Path, description = "Entry to attach the proof to")),
    request_body(content = Vec<u8>, content_type = "image/jpeg"),
    responses(
        (status = 201, description = "Proof attached", body = ProofUploadResponse),
        (status = 404, description = "No such entry for this user"),
        (status = 409, description = "Entry already has a proof")
    ),
    security(("bearer_auth" = [])),
    tag = "proofs"
)]
pub async fn attach_to_entry(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(entry_id): Path<Uuid>,
    bytes: Bytes,
) -> Result<Response, WebError> {
    attach(&state, &user, ProofTarget::Entry(entry_id), &bytes).await
}

#[utoipa::path(
    delete,
    path = "/api/proofs/entry/{entry_id}",
    params(("entry_id" = Uuid, Path, description = "Entry whose proof to remove")),
    responses(
        (status = 200, description = "Proof removed", body = MessageResponse),
        (status = 404, description = "Entry has no proof")
    ),
    security(("bearer_auth" = [])),
    tag = "proofs"
)]
pub async fn detach(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(entry_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::detach(
        state.ledger.as_ref(),
        state.proofs.as_ref(),
        &state.feed,
        entry_id,
        user.user_id,
    )
    .await?;

    Ok(Json(MessageResponse::new("Photo deleted.")).into_response())
}

#[utoipa::path(
    get,
    path = "/api/proofs",
    responses(
        (status = 200, description = "The caller's proofed entries, newest first", body = Vec<ProofItem>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "proofs"
)]
pub async fn gallery(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let items =
        services::gallery(state.ledger.as_ref(), state.proofs.as_ref(), user.user_id).await?;

    Ok(Json(items).into_response())
}
