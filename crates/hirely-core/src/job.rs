//! Job postings and their moderation state machine.
//!
//! A job's `status` is driven by moderation (admin) and closing (owner);
//! `is_active` is an orthogonal, owner-controlled switch. Whether a job shows
//! up in public listings is a pure function of both plus the deadline, see
//! [`is_public_listable`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr,
  Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
  Pending,
  Approved,
  Rejected,
  Closed,
}

/// An admin's verdict on a pending job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
  Approved,
  Rejected,
}

impl From<Decision> for JobStatus {
  fn from(d: Decision) -> Self {
    match d {
      Decision::Approved => Self::Approved,
      Decision::Rejected => Self::Rejected,
    }
  }
}

impl JobStatus {
  /// `pending --approve--> approved`, `pending --reject--> rejected`.
  /// Every other source state is terminal as far as moderation goes.
  pub fn moderate(self, decision: Decision) -> Result<Self> {
    match self {
      Self::Pending => Ok(decision.into()),
      Self::Closed => {
        Err(Error::InvalidState("a closed job cannot be moderated".into()))
      }
      Self::Approved | Self::Rejected => Err(Error::InvalidState(format!(
        "job has already been moderated ({self})"
      ))),
    }
  }

  /// Owner-initiated close; allowed from any state except `closed`.
  pub fn close(self) -> Result<Self> {
    match self {
      Self::Closed => Err(Error::InvalidState("job is already closed".into())),
      _ => Ok(Self::Closed),
    }
  }
}

// ─── Metadata ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
  FullTime,
  PartTime,
  Internship,
  Contract,
  Freelance,
  Remote,
}

/// How the salary is advertised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Salary {
  #[default]
  Negotiable,
  Range {
    min:      u64,
    max:      u64,
    currency: String,
  },
  Fixed {
    amount:   u64,
    currency: String,
  },
}

/// Everything an employer writes about a posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
  pub title:                  String,
  /// Working regions (cities, provinces, "remote").
  #[serde(default)]
  pub regions:                Vec<String>,
  /// Professional fields / industries.
  #[serde(default)]
  pub fields:                 Vec<String>,
  #[serde(default)]
  pub salary:                 Salary,
  #[serde(default)]
  pub employment_types:       Vec<EmploymentType>,
  #[serde(default)]
  pub description:            Vec<String>,
  /// Requirement lines; interview evaluations score the candidate against
  /// each of these.
  #[serde(default)]
  pub candidate_requirements: Vec<String>,
  #[serde(default)]
  pub benefits:               Vec<String>,
  #[serde(default)]
  pub tags:                   Vec<String>,
}

impl JobMetadata {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::InvalidArgument("job title is required".into()));
    }
    if self.regions.iter().all(|r| r.trim().is_empty()) {
      return Err(Error::InvalidArgument(
        "at least one working region is required".into(),
      ));
    }
    if let Salary::Range { min, max, .. } = &self.salary
      && min > max
    {
      return Err(Error::InvalidArgument(format!(
        "salary range minimum {min} exceeds maximum {max}"
      )));
    }
    Ok(())
  }
}

// ─── Job ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
  pub job_id:     Uuid,
  pub creator_id: Uuid,
  pub metadata:   JobMetadata,
  pub deadline:   DateTime<Utc>,
  pub is_active:  bool,
  pub status:     JobStatus,
  pub view_count: u64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Job {
  pub fn is_public_listable(&self, now: DateTime<Utc>) -> bool {
    is_public_listable(self, now)
  }
}

/// `is_active ∧ status = approved ∧ deadline > now`.
pub fn is_public_listable(job: &Job, now: DateTime<Utc>) -> bool {
  job.is_active && job.status == JobStatus::Approved && job.deadline > now
}

/// Input to [`crate::store::MarketStore::insert_job`]. The id, timestamps and
/// view counter are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewJob {
  pub creator_id: Uuid,
  pub deadline:   DateTime<Utc>,
  pub metadata:   JobMetadata,
  pub status:     JobStatus,
  pub is_active:  bool,
}

impl NewJob {
  /// A freshly posted job: pending moderation and active.
  pub fn new(
    creator_id: Uuid,
    deadline: DateTime<Utc>,
    metadata: JobMetadata,
  ) -> Self {
    Self {
      creator_id,
      deadline,
      metadata,
      status: JobStatus::Pending,
      is_active: true,
    }
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// Owner-supplied partial update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPatch {
  pub deadline:               Option<DateTime<Utc>>,
  pub is_active:              Option<bool>,
  pub title:                  Option<String>,
  pub regions:                Option<Vec<String>>,
  pub fields:                 Option<Vec<String>>,
  pub salary:                 Option<Salary>,
  pub employment_types:       Option<Vec<EmploymentType>>,
  pub description:            Option<Vec<String>>,
  pub candidate_requirements: Option<Vec<String>>,
  pub benefits:               Option<Vec<String>>,
  pub tags:                   Option<Vec<String>>,
}

impl JobPatch {
  pub fn is_empty(&self) -> bool {
    self.deadline.is_none()
      && self.is_active.is_none()
      && self.title.is_none()
      && self.regions.is_none()
      && self.fields.is_none()
      && self.salary.is_none()
      && self.employment_types.is_none()
      && self.description.is_none()
      && self.candidate_requirements.is_none()
      && self.benefits.is_none()
      && self.tags.is_none()
  }

  /// Overwrite exactly the supplied fields of `job`.
  pub fn apply(&self, job: &mut Job) {
    fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
      if let Some(v) = value {
        *slot = v.clone();
      }
    }

    set(&mut job.deadline, &self.deadline);
    set(&mut job.is_active, &self.is_active);

    let m = &mut job.metadata;
    set(&mut m.title, &self.title);
    set(&mut m.regions, &self.regions);
    set(&mut m.fields, &self.fields);
    set(&mut m.salary, &self.salary);
    set(&mut m.employment_types, &self.employment_types);
    set(&mut m.description, &self.description);
    set(&mut m.candidate_requirements, &self.candidate_requirements);
    set(&mut m.benefits, &self.benefits);
    set(&mut m.tags, &self.tags);
  }
}
