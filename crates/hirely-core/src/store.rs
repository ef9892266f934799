//! The `MarketStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `hirely-store-sqlite`).
//! The components in this crate depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Datelike as _, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  activity::{Activity, ActivityKey, ActivityType, NewActivity},
  interview::{Interview, InterviewStatus, InterviewUpdate, NewInterview},
  job::{Job, JobPatch, JobStatus, NewJob},
};

// ─── Failure classification ──────────────────────────────────────────────────

/// Backend errors must say whether they stem from a uniqueness constraint, so
/// components can turn a lost insert race into [`Error::Conflict`].
pub trait StoreFailure: std::error::Error + Send + Sync + 'static {
  fn is_conflict(&self) -> bool;
}

// ─── Instants ────────────────────────────────────────────────────────────────

/// Years a backend must be able to persist. Four-digit years keep RFC 3339
/// text fixed-width, so text order stays time order.
pub const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Reject a caller-supplied instant outside [`STORABLE_YEARS`].
pub fn check_storable(field: &str, at: DateTime<Utc>) -> Result<()> {
  if STORABLE_YEARS.contains(&at.year()) {
    Ok(())
  } else {
    Err(Error::InvalidArgument(format!(
      "{field} must fall between the years 0000 and 9999"
    )))
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

pub const MAX_PAGE_SIZE: u32 = 100;

/// One-based, offset-paginated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
  pub page:      u32,
  pub page_size: u32,
}

impl Default for PageRequest {
  fn default() -> Self { Self { page: 1, page_size: 20 } }
}

impl PageRequest {
  pub fn new(page: u32, page_size: u32) -> Result<Self> {
    let req = Self { page, page_size };
    req.validate()?;
    Ok(req)
  }

  pub fn validate(&self) -> Result<()> {
    if self.page == 0 {
      return Err(Error::InvalidArgument("page starts at 1".into()));
    }
    if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
      return Err(Error::InvalidArgument(format!(
        "page_size must be between 1 and {MAX_PAGE_SIZE}"
      )));
    }
    Ok(())
  }

  /// `(page - 1) * page_size`.
  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.page_size)
  }
}

/// A page of results plus the total number of matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
  pub items:     Vec<T>,
  pub total:     u64,
  pub page:      u32,
  pub page_size: u32,
}

// ─── Query types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobOrder {
  #[default]
  NewestFirst,
  OldestFirst,
}

/// Parameters for [`MarketStore::list_jobs`] and [`MarketStore::count_jobs`].
/// Every `Some` field is an equality (or range) filter; they are ANDed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobQuery {
  pub status:         Option<JobStatus>,
  pub is_active:      Option<bool>,
  pub creator_id:     Option<Uuid>,
  /// Only jobs whose deadline is strictly after this instant.
  pub deadline_after: Option<DateTime<Utc>>,
  pub order:          JobOrder,
  pub limit:          Option<u64>,
  pub offset:         Option<u64>,
}

impl JobQuery {
  /// The public-listable predicate expressed as store filters.
  pub fn public(now: DateTime<Utc>) -> Self {
    Self {
      status: Some(JobStatus::Approved),
      is_active: Some(true),
      deadline_after: Some(now),
      ..Default::default()
    }
  }

  pub fn paged(mut self, page: PageRequest) -> Self {
    self.limit = Some(u64::from(page.page_size));
    self.offset = Some(page.offset());
    self
  }
}

/// Parameters for [`MarketStore::list_activities`]. Results are newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityQuery {
  pub user_id:       Option<Uuid>,
  pub target_id:     Option<Uuid>,
  pub activity_type: Option<ActivityType>,
}

/// Parameters for [`MarketStore::list_interviews`]. Results are ordered by
/// `interview_time` ascending.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterviewQuery {
  pub employer_id:    Option<Uuid>,
  pub candidate_id:   Option<Uuid>,
  pub status:         Option<InterviewStatus>,
  /// Exact-instant match.
  pub interview_time: Option<DateTime<Utc>>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Hirely persistence backend.
///
/// Ids and `created_at`/`updated_at` timestamps are assigned by the store.
/// Backends must enforce two uniqueness constraints and report violations
/// through [`StoreFailure::is_conflict`]:
///
/// - one activity per `(user_id, target_id, activity_type)`;
/// - one `scheduled` interview per `(employer_id, interview_time)`.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait MarketStore: Send + Sync {
  type Error: StoreFailure;

  // ── Jobs ──────────────────────────────────────────────────────────────

  fn insert_job(
    &self,
    input: NewJob,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  fn get_job(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Job>, Self::Error>> + Send + '_;

  /// Apply `patch` to the current row atomically and bump `updated_at`.
  /// Returns `None` if the job does not exist.
  fn update_job(
    &self,
    id: Uuid,
    patch: JobPatch,
  ) -> impl Future<Output = Result<Option<Job>, Self::Error>> + Send + '_;

  /// Compare-and-set the status: only succeeds (returns `true`) if the job
  /// exists and its current status is `from`.
  fn transition_job(
    &self,
    id: Uuid,
    from: JobStatus,
    to: JobStatus,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if nothing was deleted.
  fn delete_job(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Bump `view_count` and return the updated job.
  fn record_job_view(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Job>, Self::Error>> + Send + '_;

  fn list_jobs(
    &self,
    query: JobQuery,
  ) -> impl Future<Output = Result<Vec<Job>, Self::Error>> + Send + '_;

  /// Count matches for `query`, ignoring its `limit`/`offset`.
  fn count_jobs(
    &self,
    query: JobQuery,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Activities ────────────────────────────────────────────────────────

  /// Fails with a conflict if the key already exists.
  fn insert_activity(
    &self,
    input: NewActivity,
  ) -> impl Future<Output = Result<Activity, Self::Error>> + Send + '_;

  fn get_activity(
    &self,
    key: ActivityKey,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + '_;

  /// Returns `false` if no row matched.
  fn delete_activity(
    &self,
    key: ActivityKey,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_activities(
    &self,
    query: ActivityQuery,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;

  fn count_activities(
    &self,
    query: ActivityQuery,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Interviews ────────────────────────────────────────────────────────

  /// Fails with a conflict if the employer already has a `scheduled`
  /// interview at the same instant.
  fn insert_interview(
    &self,
    input: NewInterview,
  ) -> impl Future<Output = Result<Interview, Self::Error>> + Send + '_;

  fn get_interview(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Interview>, Self::Error>> + Send + '_;

  /// Apply `update` atomically and bump `updated_at`. Subject to the same
  /// double-booking constraint as inserts.
  fn update_interview(
    &self,
    id: Uuid,
    update: InterviewUpdate,
  ) -> impl Future<Output = Result<Option<Interview>, Self::Error>> + Send + '_;

  fn list_interviews(
    &self,
    query: InterviewQuery,
  ) -> impl Future<Output = Result<Vec<Interview>, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn page_offsets_are_one_based() {
    assert_eq!(PageRequest::new(1, 20).unwrap().offset(), 0);
    assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
  }

  #[test]
  fn page_bounds_are_checked() {
    assert!(matches!(PageRequest::new(0, 10), Err(Error::InvalidArgument(_))));
    assert!(matches!(PageRequest::new(1, 0), Err(Error::InvalidArgument(_))));
    assert!(matches!(
      PageRequest::new(1, MAX_PAGE_SIZE + 1),
      Err(Error::InvalidArgument(_))
    ));
    assert!(PageRequest::new(1, MAX_PAGE_SIZE).is_ok());
  }

  #[test]
  fn instants_need_four_digit_years() {
    let far = DateTime::parse_from_rfc3339("9999-12-31T23:59:59Z")
      .unwrap()
      .with_timezone(&Utc);
    assert!(check_storable("deadline", far).is_ok());

    let beyond = far + chrono::Duration::seconds(1);
    assert!(matches!(
      check_storable("deadline", beyond),
      Err(Error::InvalidArgument(_))
    ));

    let before = DateTime::parse_from_rfc3339("0000-01-01T00:00:00Z")
      .unwrap()
      .with_timezone(&Utc)
      - chrono::Duration::seconds(1);
    assert!(check_storable("interview_time", before).is_err());
  }

  #[test]
  fn public_query_encodes_listable_predicate() {
    let now = Utc::now();
    let q = JobQuery::public(now).paged(PageRequest::new(2, 5).unwrap());
    assert_eq!(q.status, Some(JobStatus::Approved));
    assert_eq!(q.is_active, Some(true));
    assert_eq!(q.deadline_after, Some(now));
    assert_eq!(q.order, JobOrder::NewestFirst);
    assert_eq!((q.limit, q.offset), (Some(5), Some(5)));
  }
}
