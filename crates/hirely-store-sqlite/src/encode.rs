//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with
//! microsecond precision, so lexical order equals chronological order and
//! equality on the text is equality on the instant. Structured fields
//! (metadata, evaluation) are stored as compact JSON. UUIDs are stored as
//! hyphenated lowercase strings. Status enums use their `strum` names.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use hirely_core::{
  activity::{Activity, ActivityKey, ActivityType},
  evaluation::Evaluation,
  interview::{Interview, InterviewStatus},
  job::{Job, JobMetadata, JobStatus},
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Drop sub-microsecond precision so values round-trip through the column.
pub fn to_stored_precision(dt: DateTime<Utc>) -> DateTime<Utc> {
  dt.trunc_subsecs(6)
}

pub fn now() -> DateTime<Utc> { to_stored_precision(Utc::now()) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ────────────────────────────────────────────────────────────────────

fn decode_variant<T: FromStr>(kind: &'static str, s: &str) -> Result<T> {
  T::from_str(s).map_err(|_| Error::UnknownVariant {
    kind,
    value: s.to_owned(),
  })
}

pub fn decode_job_status(s: &str) -> Result<JobStatus> {
  decode_variant("job status", s)
}

pub fn decode_activity_type(s: &str) -> Result<ActivityType> {
  decode_variant("activity type", s)
}

pub fn decode_interview_status(s: &str) -> Result<InterviewStatus> {
  decode_variant("interview status", s)
}

// ─── JSON columns ─────────────────────────────────────────────────────────────

pub fn encode_metadata(m: &JobMetadata) -> Result<String> {
  Ok(serde_json::to_string(m)?)
}

pub fn encode_evaluation(e: Option<&Evaluation>) -> Result<Option<String>> {
  e.map(serde_json::to_string).transpose().map_err(Error::from)
}

// ─── Row types ────────────────────────────────────────────────────────────────

pub const JOB_COLUMNS: &str = "job_id, creator_id, status, is_active, \
  deadline, view_count, metadata, created_at, updated_at";

/// Raw values read directly from a `jobs` row.
pub struct RawJob {
  pub job_id:     String,
  pub creator_id: String,
  pub status:     String,
  pub is_active:  bool,
  pub deadline:   String,
  pub view_count: i64,
  pub metadata:   String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawJob {
  /// Row mapper for queries selecting [`JOB_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      job_id:     row.get(0)?,
      creator_id: row.get(1)?,
      status:     row.get(2)?,
      is_active:  row.get(3)?,
      deadline:   row.get(4)?,
      view_count: row.get(5)?,
      metadata:   row.get(6)?,
      created_at: row.get(7)?,
      updated_at: row.get(8)?,
    })
  }

  pub fn into_job(self) -> Result<Job> {
    Ok(Job {
      job_id:     decode_uuid(&self.job_id)?,
      creator_id: decode_uuid(&self.creator_id)?,
      metadata:   serde_json::from_str(&self.metadata)?,
      deadline:   decode_dt(&self.deadline)?,
      is_active:  self.is_active,
      status:     decode_job_status(&self.status)?,
      view_count: u64::try_from(self.view_count).unwrap_or_default(),
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const ACTIVITY_COLUMNS: &str =
  "user_id, target_id, activity_type, cv_id, created_at";

/// Raw values read directly from an `activities` row.
pub struct RawActivity {
  pub user_id:       String,
  pub target_id:     String,
  pub activity_type: String,
  pub cv_id:         Option<String>,
  pub created_at:    String,
}

impl RawActivity {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      target_id:     row.get(1)?,
      activity_type: row.get(2)?,
      cv_id:         row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      key:        ActivityKey {
        user_id:       decode_uuid(&self.user_id)?,
        target_id:     decode_uuid(&self.target_id)?,
        activity_type: decode_activity_type(&self.activity_type)?,
      },
      cv_id:      self.cv_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const INTERVIEW_COLUMNS: &str = "interview_id, candidate_id, employer_id, \
  job_id, cv_id, interview_time, job_title, status, evaluation, created_at, \
  updated_at";

/// Raw values read directly from an `interviews` row.
pub struct RawInterview {
  pub interview_id:   String,
  pub candidate_id:   String,
  pub employer_id:    String,
  pub job_id:         Option<String>,
  pub cv_id:          Option<String>,
  pub interview_time: String,
  pub job_title:      String,
  pub status:         String,
  pub evaluation:     Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawInterview {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      interview_id:   row.get(0)?,
      candidate_id:   row.get(1)?,
      employer_id:    row.get(2)?,
      job_id:         row.get(3)?,
      cv_id:          row.get(4)?,
      interview_time: row.get(5)?,
      job_title:      row.get(6)?,
      status:         row.get(7)?,
      evaluation:     row.get(8)?,
      created_at:     row.get(9)?,
      updated_at:     row.get(10)?,
    })
  }

  pub fn into_interview(self) -> Result<Interview> {
    Ok(Interview {
      interview_id:   decode_uuid(&self.interview_id)?,
      candidate_id:   decode_uuid(&self.candidate_id)?,
      employer_id:    decode_uuid(&self.employer_id)?,
      job_id:         self.job_id.as_deref().map(decode_uuid).transpose()?,
      cv_id:          self.cv_id,
      interview_time: decode_dt(&self.interview_time)?,
      job_title:      self.job_title,
      status:         decode_interview_status(&self.status)?,
      evaluation:     self
        .evaluation
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}
