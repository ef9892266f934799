//! Handlers for `/activities` and `/targets` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/activities/toggle` | Body: `{"target_id":…,"activity_type":"saved"}` |
//! | `GET`  | `/activities` | `?activity_type=saved\|applied\|followed` |
//! | `GET`  | `/activities/status` | `?target_id=&activity_type=` |
//! | `GET`  | `/targets/{id}/followers` | Public |

use axum::{
  Json,
  extract::State,
};
use hirely_core::{
  activity::{Activity, ActivityType, ToggleOutcome},
  store::MarketStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Authenticated,
  error::ApiError,
  extract::{JsonBody, PathParam, QueryParams},
};

#[derive(Debug, Deserialize)]
pub struct TargetParams {
  pub target_id:     Uuid,
  pub activity_type: ActivityType,
}

/// `POST /activities/toggle`
pub async fn toggle<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  JsonBody(body): JsonBody<TargetParams>,
) -> Result<Json<ToggleOutcome>, ApiError> {
  let outcome = state
    .activities
    .toggle(&actor, body.target_id, body.activity_type)
    .await?;
  Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub activity_type: ActivityType,
}

/// `GET /activities?activity_type=<type>`
pub async fn list<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Activity>>, ApiError> {
  let activities = state
    .activities
    .list_by_actor(&actor, params.activity_type)
    .await?;
  Ok(Json(activities))
}

/// `GET /activities/status?target_id=&activity_type=`
pub async fn status<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  Authenticated(actor): Authenticated,
  QueryParams(params): QueryParams<TargetParams>,
) -> Result<Json<ToggleOutcome>, ApiError> {
  let is_active = state
    .activities
    .is_active(&actor, params.target_id, params.activity_type)
    .await?;
  Ok(Json(ToggleOutcome { is_active }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Followers {
  pub count:     u64,
  pub followers: Vec<Activity>,
}

/// `GET /targets/{id}/followers`
pub async fn followers<S: MarketStore + 'static>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<Followers>, ApiError> {
  let followers = state.activities.list_followers(id).await?;
  let count = state.activities.count_followers(id).await?;
  Ok(Json(Followers { count, followers }))
}
