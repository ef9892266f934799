//! Interviews between an employer and a candidate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::evaluation::Evaluation;

/// Interview lifecycle. Any status may follow any other; `completed` is
/// conventionally final but not enforced.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr,
  Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterviewStatus {
  Scheduled,
  Completed,
  Postponed,
  Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
  pub interview_id:   Uuid,
  pub candidate_id:   Uuid,
  pub employer_id:    Uuid,
  pub job_id:         Option<Uuid>,
  pub cv_id:          Option<String>,
  pub interview_time: DateTime<Utc>,
  /// Denormalised label so the interview still reads well if the job goes.
  pub job_title:      String,
  pub status:         InterviewStatus,
  pub evaluation:     Option<Evaluation>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Interview {
  /// The named employer and candidate are the only parties who may read it.
  pub fn is_party(&self, user_id: Uuid) -> bool {
    self.employer_id == user_id || self.candidate_id == user_id
  }
}

/// Input to [`crate::store::MarketStore::insert_interview`].
#[derive(Debug, Clone)]
pub struct NewInterview {
  pub candidate_id:   Uuid,
  pub employer_id:    Uuid,
  pub job_id:         Option<Uuid>,
  pub cv_id:          Option<String>,
  pub interview_time: DateTime<Utc>,
  pub job_title:      String,
  pub status:         InterviewStatus,
  pub evaluation:     Option<Evaluation>,
}

/// A scheduling request as submitted by an employer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
  pub candidate_id:   Uuid,
  #[serde(default)]
  pub job_id:         Option<Uuid>,
  #[serde(default)]
  pub cv_id:          Option<String>,
  pub interview_time: DateTime<Utc>,
  #[serde(default)]
  pub job_title:      String,
}

/// Fields an update may overwrite. `None` leaves the column alone.
#[derive(Debug, Clone, Default)]
pub struct InterviewUpdate {
  pub interview_time: Option<DateTime<Utc>>,
  pub status:         Option<InterviewStatus>,
  pub evaluation:     Option<Evaluation>,
}

impl InterviewUpdate {
  pub fn status(status: InterviewStatus) -> Self {
    Self { status: Some(status), ..Default::default() }
  }

  pub fn apply(&self, interview: &mut Interview) {
    if let Some(t) = self.interview_time {
      interview.interview_time = t;
    }
    if let Some(s) = self.status {
      interview.status = s;
    }
    if let Some(e) = &self.evaluation {
      interview.evaluation = Some(e.clone());
    }
  }
}
