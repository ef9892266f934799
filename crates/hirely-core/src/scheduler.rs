//! [`InterviewScheduler`]: interview records and double-booking avoidance.
//!
//! An employer may hold at most one `scheduled` interview per instant. The
//! collision test is exact timestamp equality; interviews carry no duration.
//! The lookup before each write only produces a friendlier message. The
//! store's partial unique index is what actually enforces the rule.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::{Actor, Role},
  evaluation::Evaluation,
  interview::{
    Interview, InterviewStatus, InterviewUpdate, NewInterview, ScheduleRequest,
  },
  store::{InterviewQuery, MarketStore, check_storable},
};

pub struct InterviewScheduler<S> {
  store: Arc<S>,
}

impl<S> Clone for InterviewScheduler<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: MarketStore> InterviewScheduler<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn schedule(
    &self,
    actor: &Actor,
    request: ScheduleRequest,
  ) -> Result<Interview> {
    actor.require(Role::Employer, "schedule interviews")?;
    check_storable("interview_time", request.interview_time)?;

    let mut job_title = request.job_title.trim().to_owned();
    if let Some(job_id) = request.job_id {
      let job = self
        .store
        .get_job(job_id)
        .await
        .map_err(Error::from_store)?
        .ok_or_else(|| Error::job_not_found(job_id))?;
      actor.require_owner(job.creator_id, "interview for this job")?;
      if job_title.is_empty() {
        job_title = job.metadata.title;
      }
    }
    if job_title.is_empty() {
      return Err(Error::InvalidArgument("job_title is required".into()));
    }

    self.check_slot(actor.id, request.interview_time, None).await?;

    let interview = self
      .store
      .insert_interview(NewInterview {
        candidate_id: request.candidate_id,
        employer_id: actor.id,
        job_id: request.job_id,
        cv_id: request.cv_id,
        interview_time: request.interview_time,
        job_title,
        status: InterviewStatus::Scheduled,
        evaluation: Some(Evaluation::default()),
      })
      .await
      .map_err(|e| slot_conflict(e, request.interview_time))?;

    info!(
      interview_id = %interview.interview_id,
      employer_id = %actor.id,
      candidate_id = %interview.candidate_id,
      at = %interview.interview_time,
      "interview scheduled"
    );
    Ok(interview)
  }

  /// Set any status. Moving back to `scheduled` re-enters the slot and may
  /// conflict.
  pub async fn update_status(
    &self,
    actor: &Actor,
    interview_id: Uuid,
    status: InterviewStatus,
  ) -> Result<Interview> {
    let interview = load_owned(&*self.store, actor, interview_id).await?;
    let updated = self
      .apply(&interview, InterviewUpdate::status(status))
      .await?;
    info!(%interview_id, %status, "interview status changed");
    Ok(updated)
  }

  pub async fn cancel(
    &self,
    actor: &Actor,
    interview_id: Uuid,
  ) -> Result<Interview> {
    self
      .update_status(actor, interview_id, InterviewStatus::Cancelled)
      .await
  }

  /// Move to `interview_time` and back to `scheduled`.
  pub async fn reschedule(
    &self,
    actor: &Actor,
    interview_id: Uuid,
    interview_time: DateTime<Utc>,
  ) -> Result<Interview> {
    check_storable("interview_time", interview_time)?;
    let interview = load_owned(&*self.store, actor, interview_id).await?;
    self
      .check_slot(actor.id, interview_time, Some(interview_id))
      .await?;

    let updated = self
      .apply(&interview, InterviewUpdate {
        interview_time: Some(interview_time),
        status: Some(InterviewStatus::Scheduled),
        evaluation: None,
      })
      .await?;
    info!(%interview_id, at = %interview_time, "interview rescheduled");
    Ok(updated)
  }

  /// Employers see the interviews they run; everyone else the ones they
  /// attend. Earliest first.
  pub async fn list_for_actor(&self, actor: &Actor) -> Result<Vec<Interview>> {
    let query = if actor.is(Role::Employer) {
      InterviewQuery { employer_id: Some(actor.id), ..Default::default() }
    } else {
      InterviewQuery { candidate_id: Some(actor.id), ..Default::default() }
    };
    let interviews = self
      .store
      .list_interviews(query)
      .await
      .map_err(Error::from_store)?;
    debug!(actor_id = %actor.id, count = interviews.len(), "interviews listed");
    Ok(interviews)
  }

  /// Readable by the named employer and candidate only.
  pub async fn get_interview(
    &self,
    actor: &Actor,
    interview_id: Uuid,
  ) -> Result<Interview> {
    let interview = load(&*self.store, interview_id).await?;
    if !interview.is_party(actor.id) {
      return Err(Error::Forbidden(
        "only the employer and candidate may view this interview".into(),
      ));
    }
    Ok(interview)
  }

  async fn check_slot(
    &self,
    employer_id: Uuid,
    at: DateTime<Utc>,
    except: Option<Uuid>,
  ) -> Result<()> {
    let taken = self
      .store
      .list_interviews(InterviewQuery {
        employer_id: Some(employer_id),
        status: Some(InterviewStatus::Scheduled),
        interview_time: Some(at),
        ..Default::default()
      })
      .await
      .map_err(Error::from_store)?
      .into_iter()
      .any(|i| Some(i.interview_id) != except);

    if taken {
      Err(double_booked(at))
    } else {
      Ok(())
    }
  }

  async fn apply(
    &self,
    interview: &Interview,
    update: InterviewUpdate,
  ) -> Result<Interview> {
    let at = update.interview_time.unwrap_or(interview.interview_time);
    self
      .store
      .update_interview(interview.interview_id, update)
      .await
      .map_err(|e| slot_conflict(e, at))?
      .ok_or_else(|| Error::interview_not_found(interview.interview_id))
  }
}

pub(crate) async fn load<S: MarketStore>(
  store: &S,
  interview_id: Uuid,
) -> Result<Interview> {
  store
    .get_interview(interview_id)
    .await
    .map_err(Error::from_store)?
    .ok_or_else(|| Error::interview_not_found(interview_id))
}

/// Fetch an interview the actor runs as employer.
pub(crate) async fn load_owned<S: MarketStore>(
  store: &S,
  actor: &Actor,
  interview_id: Uuid,
) -> Result<Interview> {
  let interview = load(store, interview_id).await?;
  actor.require_owner(interview.employer_id, "manage this interview")?;
  Ok(interview)
}

fn double_booked(at: DateTime<Utc>) -> Error {
  Error::Conflict(format!("an interview is already scheduled at {at}"))
}

fn slot_conflict<E: crate::store::StoreFailure>(
  err: E,
  at: DateTime<Utc>,
) -> Error {
  if err.is_conflict() {
    double_booked(at)
  } else {
    Error::from_store(err)
  }
}
