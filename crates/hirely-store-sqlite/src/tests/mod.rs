//! Integration tests for `SqliteStore` and the marketplace components running
//! on top of it, against an in-memory database.

mod jobs;
mod store;

use std::sync::Arc;

use chrono::{DateTime, TimeZone as _, Utc};
use hirely_core::{
  actor::{Actor, Role},
  aggregator::EvaluationAggregator,
  job::{Decision, Job, JobMetadata},
  registry::JobRegistry,
  scheduler::InterviewScheduler,
  tracker::ActivityTracker,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// All four components sharing one store.
struct Market {
  store:       Arc<SqliteStore>,
  jobs:        JobRegistry<SqliteStore>,
  activities:  ActivityTracker<SqliteStore>,
  interviews:  InterviewScheduler<SqliteStore>,
  evaluations: EvaluationAggregator<SqliteStore>,
}

async fn market() -> Market {
  let store = Arc::new(store().await);
  Market {
    jobs:        JobRegistry::new(store.clone()),
    activities:  ActivityTracker::new(store.clone()),
    interviews:  InterviewScheduler::new(store.clone()),
    evaluations: EvaluationAggregator::new(store.clone()),
    store,
  }
}

fn actor(role: Role) -> Actor { Actor::new(Uuid::new_v4(), role) }

fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// The reference "now" used for listing checks.
fn now() -> DateTime<Utc> { utc(2025, 2, 1, 12) }

/// Comfortably after [`now`].
fn deadline() -> DateTime<Utc> { utc(2025, 6, 30, 0) }

fn metadata(title: &str) -> JobMetadata {
  JobMetadata {
    title: title.into(),
    regions: vec!["Hanoi".into()],
    candidate_requirements: vec![
      "3+ years Rust".into(),
      "Comfortable with SQL".into(),
    ],
    ..Default::default()
  }
}

/// Post a job as `employer` and approve it.
async fn approved_job(m: &Market, employer: &Actor, title: &str) -> Job {
  let job = m
    .jobs
    .create_job(employer, deadline(), metadata(title))
    .await
    .unwrap();
  m.jobs
    .moderate_job(&actor(Role::Admin), job.job_id, Decision::Approved)
    .await
    .unwrap()
}
