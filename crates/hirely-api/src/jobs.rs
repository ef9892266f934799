//! Handlers for `/jobs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/jobs` | Public. `?page=&page_size=` |
//! | `POST`   | `/jobs` | Employer. Body: `{"deadline":…,"metadata":{…}}` |
//! | `GET`    | `/jobs/mine` | Employer's own postings |
//! | `GET`    | `/jobs/pending` | Admin moderation queue |
//! | `GET`    | `/jobs/{id}` | Public; counts a view |
//! | `PATCH`  | `/jobs/{id}` | Owner. Body: any subset of the editable fields |
//! | `DELETE` | `/jobs/{id}` | Owner |
//! | `POST`   | `/jobs/{id}/moderation` | Admin. Body: `{"decision":"approved"}` |
//! | `POST`   | `/jobs/{id}/close` | Owner |
//! | `POST`   | `/jobs/{id}/applications` | Candidate. Body: `{"cv_id":"…"}` |
//! | `GET`    | `/jobs/{id}/applications/count` | Public |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use hirely_core::{
  job::{Decision, Job, JobMetadata, JobPatch},
  store::{MarketStore, Page, PageRequest},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Authenticated,
  error::ApiError,
  extract::{JsonBody, PathParam, QueryParams},
};

/// `{"count": n}` for the public aggregates.
#[derive(Debug, Serialize, Deserialize)]
pub struct Count {
  pub count: u64,
}

// ─── Listings ─────────────────────────────────────────────────────────────────

/// `GET /jobs[?page=&page_size=]`
pub async fn list_public<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<Job>>, ApiError> {
  Ok(Json(state.jobs.list_public_jobs(page, Utc::now()).await?))
}

/// `GET /jobs/mine`
pub async fn list_own<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<Job>>, ApiError> {
  Ok(Json(state.jobs.list_own_jobs(&actor, page).await?))
}

/// `GET /jobs/pending`
pub async fn list_pending<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Page<Job>>, ApiError> {
  Ok(Json(state.jobs.list_pending_jobs(&actor, page).await?))
}

// ─── Create / read ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub deadline: DateTime<Utc>,
  pub metadata: JobMetadata,
}

/// `POST /jobs`
pub async fn create<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let job = state
    .jobs
    .create_job(&actor, body.deadline, body.metadata)
    .await?;
  Ok((StatusCode::CREATED, Json(job)))
}

/// `GET /jobs/{id}`
pub async fn view<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<Job>, ApiError> {
  Ok(Json(state.jobs.view_job(id).await?))
}

// ─── Owner edits ──────────────────────────────────────────────────────────────

/// `PATCH /jobs/{id}`
pub async fn update<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
  JsonBody(patch): JsonBody<JobPatch>,
) -> Result<Json<Job>, ApiError> {
  Ok(Json(state.jobs.update_job(&actor, id, patch).await?))
}

/// `DELETE /jobs/{id}`
pub async fn delete<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, ApiError> {
  state.jobs.delete_job(&actor, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /jobs/{id}/close`
pub async fn close<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<Job>, ApiError> {
  Ok(Json(state.jobs.close_job(&actor, id).await?))
}

// ─── Moderation ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ModerationBody {
  pub decision: Decision,
}

/// `POST /jobs/{id}/moderation`
pub async fn moderate<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
  JsonBody(body): JsonBody<ModerationBody>,
) -> Result<Json<Job>, ApiError> {
  Ok(Json(state.jobs.moderate_job(&actor, id, body.decision).await?))
}

// ─── Applications ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ApplyBody {
  pub cv_id: String,
}

/// `POST /jobs/{id}/applications`
pub async fn apply<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  PathParam(id): PathParam<Uuid>,
  JsonBody(body): JsonBody<ApplyBody>,
) -> Result<impl IntoResponse, ApiError> {
  let activity = state
    .activities
    .record_application(&actor, id, body.cv_id, Utc::now())
    .await?;
  Ok((StatusCode::CREATED, Json(activity)))
}

/// `GET /jobs/{id}/applications/count`
pub async fn count_applications<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<Count>, ApiError> {
  let count = state.activities.count_applications(id).await?;
  Ok(Json(Count { count }))
}
