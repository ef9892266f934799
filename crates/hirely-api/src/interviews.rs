//! Handlers for `/interviews` endpoints, evaluations included.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/interviews` | The caller's interviews, earliest first |
//! | `POST` | `/interviews` | Employer. Body: `ScheduleRequest` |
//! | `GET`  | `/interviews/{id}` | Employer or candidate only |
//! | `PUT`  | `/interviews/{id}/status` | Body: `{"status":"postponed"}` |
//! | `POST` | `/interviews/{id}/cancel` | |
//! | `POST` | `/interviews/{id}/reschedule` | Body: `{"interview_time":…}` |
//! | `GET`  | `/interviews/{id}/evaluation/template` | |
//! | `PUT`  | `/interviews/{id}/evaluation` | Draft save. Body: `Evaluation` |
//! | `POST` | `/interviews/{id}/complete` | Final save. Body: `Evaluation` |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use hirely_core::{
  evaluation::Evaluation,
  interview::{Interview, InterviewStatus, ScheduleRequest},
  store::MarketStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::Authenticated,
  error::ApiError,
  extract::{JsonBody, PathParam},
};

// ─── Scheduling ───────────────────────────────────────────────────────────────

/// `GET /interviews`
pub async fn list<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
) -> Result<Json<Vec<Interview>>, ApiError> {
  Ok(Json(state.interviews.list_for_actor(&actor).await?))
}

/// `POST /interviews`
pub async fn schedule<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  JsonBody(request): JsonBody<ScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let interview = state.interviews.schedule(&actor, request).await?;
  Ok((StatusCode::CREATED, Json(interview)))
}

/// `GET /interviews/{id}`
pub async fn get_one<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<Interview>, ApiError> {
  Ok(Json(state.interviews.get_interview(&actor, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: InterviewStatus,
}

/// `PUT /interviews/{id}/status`
pub async fn update_status<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
  JsonBody(body): JsonBody<StatusBody>,
) -> Result<Json<Interview>, ApiError> {
  let interview = state
    .interviews
    .update_status(&actor, id, body.status)
    .await?;
  Ok(Json(interview))
}

/// `POST /interviews/{id}/cancel`
pub async fn cancel<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<Interview>, ApiError> {
  Ok(Json(state.interviews.cancel(&actor, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct RescheduleBody {
  pub interview_time: DateTime<Utc>,
}

/// `POST /interviews/{id}/reschedule`
pub async fn reschedule<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
  JsonBody(body): JsonBody<RescheduleBody>,
) -> Result<Json<Interview>, ApiError> {
  let interview = state
    .interviews
    .reschedule(&actor, id, body.interview_time)
    .await?;
  Ok(Json(interview))
}

// ─── Evaluation ───────────────────────────────────────────────────────────────

/// `GET /interviews/{id}/evaluation/template`
pub async fn template<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<Evaluation>, ApiError> {
  Ok(Json(state.evaluations.requirement_template(&actor, id).await?))
}

/// `PUT /interviews/{id}/evaluation`
pub async fn save_draft<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
  JsonBody(evaluation): JsonBody<Evaluation>,
) -> Result<Json<Interview>, ApiError> {
  let interview = state.evaluations.save_draft(&actor, id, evaluation).await?;
  Ok(Json(interview))
}

/// `POST /interviews/{id}/complete`
pub async fn complete<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
  JsonBody(evaluation): JsonBody<Evaluation>,
) -> Result<Json<Interview>, ApiError> {
  let interview = state.evaluations.complete(&actor, id, evaluation).await?;
  Ok(Json(interview))
}
