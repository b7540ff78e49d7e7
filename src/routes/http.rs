//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::error::SessionError;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

impl SessionError {
  pub fn status_code(&self) -> StatusCode {
    match self {
      SessionError::UnknownSession(_) => StatusCode::NOT_FOUND,
      SessionError::UnknownLevel(_) => StatusCode::BAD_REQUEST,
      SessionError::EmptyCurriculum | SessionError::Generate(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for SessionError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    warn!(target: "mathsfacts", %status, error = %self, "Request failed");
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_levels(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(list_levels(&state).await)
}

#[instrument(level = "info", skip(state, body), fields(level_key = %body.level_key))]
pub async fn http_post_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> Result<Json<SessionOut>, SessionError> {
  let out = start_session(&state, &body.level_key).await?;
  info!(target: "mathsfacts", session_id = %out.session_id, level = %out.level.key, "HTTP session started");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_next_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionOut>, SessionError> {
  let out = start_next_level(&state).await?;
  info!(target: "mathsfacts", session_id = %out.session_id, level = %out.level.key, "HTTP next level started");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(session_id = %body.session_id))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, SessionError> {
  let out = submit_answer(&state, &body.session_id, &body.answer).await?;
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<QuitOut>, SessionError> {
  Ok(Json(quit_session(&state, &id).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_progress(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(progress_report(&state).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_progress(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let out = reset_progress(&state).await;
  info!(target: "mathsfacts", "HTTP progress reset");
  Json(out)
}

#[instrument(level = "info", skip(state), fields(level_key = ?q.level_key))]
pub async fn http_get_history(
  State(state): State<Arc<AppState>>,
  Query(q): Query<HistoryQuery>,
) -> impl IntoResponse {
  Json(history_report(&state, q.level_key, q.limit).await)
}
