use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::StreamExt;
use storage::dto::scoreboard::{ScoreRow, ScoreboardQuery};
use storage::models::{Team, TeamTotal};
use tokio_stream::wrappers::BroadcastStream;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/teams/{team}/scoreboard",
    params(
        ("team" = Team, Path, description = "Which team's leaderboard"),
        ScoreboardQuery
    ),
    responses(
        (status = 200, description = "Leaderboard rows", body = Vec<ScoreRow>)
    ),
    tag = "teams"
)]
pub async fn get_scoreboard(
    State(state): State<AppState>,
    Path(team): Path<Team>,
    Query(query): Query<ScoreboardQuery>,
) -> Result<Response, WebError> {
    let rows = services::scoreboard(state.ledger.as_ref(), team, &query).await?;

    Ok(Json(rows).into_response())
}

#[utoipa::path(
    get,
    path = "/api/teams/{team}/total",
    params(("team" = Team, Path, description = "Which team")),
    responses(
        (status = 200, description = "Team total distance", body = TeamTotal)
    ),
    tag = "teams"
)]
pub async fn get_total(
    State(state): State<AppState>,
    Path(team): Path<Team>,
) -> Result<Response, WebError> {
    let total = services::team_total(state.ledger.as_ref(), team).await?;

    Ok(Json(TeamTotal { team, total }).into_response())
}

/// Server-sent ledger change events for one team. The subscription ends
/// when the client disconnects and the stream is dropped.
#[utoipa::path(
    get,
    path = "/api/teams/{team}/events",
    params(("team" = Team, Path, description = "Which team's changes to watch")),
    responses(
        (status = 200, description = "SSE stream of ledger change events")
    ),
    tag = "teams"
)]
pub async fn team_events(
    State(state): State<AppState>,
    Path(team): Path<Team>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.feed.subscribe();

    let stream = BroadcastStream::new(receiver).filter_map(move |result| {
        let event = match result {
            Ok(change) if change.team == Some(team) => Event::default()
                .event("ledger")
                .json_data(&change)
                .ok()
                .map(Ok),
            // Lagged receivers and other teams' changes are skipped.
            _ => None,
        };
        futures::future::ready(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
