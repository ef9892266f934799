//! JSON REST API for Hirely.
//!
//! Exposes an axum [`Router`] over the four marketplace components, backed by
//! any [`MarketStore`]. Callers are identified with HTTP Basic auth (see
//! [`auth`]); TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", hirely_api::api_router(state))
//! ```

pub mod activities;
pub mod auth;
pub mod error;
pub mod extract;
pub mod interviews;
pub mod jobs;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use hirely_core::{
  aggregator::EvaluationAggregator, registry::JobRegistry,
  scheduler::InterviewScheduler, store::MarketStore, tracker::ActivityTracker,
};

pub use auth::{Account, AuthConfig};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub jobs:        JobRegistry<S>,
  pub activities:  ActivityTracker<S>,
  pub interviews:  InterviewScheduler<S>,
  pub evaluations: EvaluationAggregator<S>,
  pub auth:        Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      jobs:        self.jobs.clone(),
      activities:  self.activities.clone(),
      interviews:  self.interviews.clone(),
      evaluations: self.evaluations.clone(),
      auth:        self.auth.clone(),
    }
  }
}

impl<S: MarketStore> AppState<S> {
  /// Wire every component to the same `store`.
  pub fn new(store: Arc<S>, auth: AuthConfig) -> Self {
    Self {
      jobs:        JobRegistry::new(store.clone()),
      activities:  ActivityTracker::new(store.clone()),
      interviews:  InterviewScheduler::new(store.clone()),
      evaluations: EvaluationAggregator::new(store),
      auth:        Arc::new(auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: MarketStore + 'static,
{
  Router::new()
    // Jobs
    .route("/jobs", get(jobs::list_public::<S>).post(jobs::create::<S>))
    .route("/jobs/mine", get(jobs::list_own::<S>))
    .route("/jobs/pending", get(jobs::list_pending::<S>))
    .route(
      "/jobs/{id}",
      get(jobs::view::<S>)
        .patch(jobs::update::<S>)
        .delete(jobs::delete::<S>),
    )
    .route("/jobs/{id}/moderation", post(jobs::moderate::<S>))
    .route("/jobs/{id}/close", post(jobs::close::<S>))
    .route("/jobs/{id}/applications", post(jobs::apply::<S>))
    .route(
      "/jobs/{id}/applications/count",
      get(jobs::count_applications::<S>),
    )
    // Activities
    .route("/activities", get(activities::list::<S>))
    .route("/activities/toggle", post(activities::toggle::<S>))
    .route("/activities/status", get(activities::status::<S>))
    .route("/targets/{id}/followers", get(activities::followers::<S>))
    // Interviews
    .route(
      "/interviews",
      get(interviews::list::<S>).post(interviews::schedule::<S>),
    )
    .route("/interviews/{id}", get(interviews::get_one::<S>))
    .route("/interviews/{id}/status", put(interviews::update_status::<S>))
    .route("/interviews/{id}/cancel", post(interviews::cancel::<S>))
    .route("/interviews/{id}/reschedule", post(interviews::reschedule::<S>))
    .route(
      "/interviews/{id}/evaluation/template",
      get(interviews::template::<S>),
    )
    .route("/interviews/{id}/evaluation", put(interviews::save_draft::<S>))
    .route("/interviews/{id}/complete", post(interviews::complete::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
