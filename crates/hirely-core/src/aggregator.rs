//! [`EvaluationAggregator`]: draft and final interview evaluations.
//!
//! Every save replaces the whole evaluation (last write wins); nothing is
//! merged. Validation runs before the store is touched, so a rejected
//! evaluation leaves the stored one as it was.
//!
//! Drafts are refused on a `cancelled` interview. A `postponed` one still
//! takes drafts, and completion is accepted from any status.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::Actor,
  evaluation::Evaluation,
  interview::{Interview, InterviewStatus, InterviewUpdate},
  scheduler::load_owned,
  store::MarketStore,
};

pub struct EvaluationAggregator<S> {
  store: Arc<S>,
}

impl<S> Clone for EvaluationAggregator<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: MarketStore> EvaluationAggregator<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Overwrite the evaluation; the interview status is left alone. Fails with
  /// [`Error::InvalidState`] once the interview is cancelled.
  pub async fn save_draft(
    &self,
    actor: &Actor,
    interview_id: Uuid,
    evaluation: Evaluation,
  ) -> Result<Interview> {
    self.store_evaluation(actor, interview_id, evaluation, None).await
  }

  /// Overwrite the evaluation and mark the interview `completed`.
  pub async fn complete(
    &self,
    actor: &Actor,
    interview_id: Uuid,
    evaluation: Evaluation,
  ) -> Result<Interview> {
    self
      .store_evaluation(
        actor,
        interview_id,
        evaluation,
        Some(InterviewStatus::Completed),
      )
      .await
  }

  /// The stored evaluation with every requirement of the referenced job
  /// present in the fit map (missing ones at 0). Nothing is persisted.
  pub async fn requirement_template(
    &self,
    actor: &Actor,
    interview_id: Uuid,
  ) -> Result<Evaluation> {
    let interview = load_owned(&*self.store, actor, interview_id).await?;
    let evaluation = interview.evaluation.unwrap_or_default();

    let Some(job_id) = interview.job_id else {
      return Ok(evaluation);
    };
    let job = self.store.get_job(job_id).await.map_err(Error::from_store)?;
    Ok(match job {
      Some(job) => {
        evaluation.with_requirements(&job.metadata.candidate_requirements)
      }
      // The job was removed after scheduling; the interview outlives it.
      None => evaluation,
    })
  }

  async fn store_evaluation(
    &self,
    actor: &Actor,
    interview_id: Uuid,
    evaluation: Evaluation,
    status: Option<InterviewStatus>,
  ) -> Result<Interview> {
    evaluation.validate()?;
    let evaluation = evaluation.normalized();
    let current = load_owned(&*self.store, actor, interview_id).await?;
    if status.is_none() && current.status == InterviewStatus::Cancelled {
      return Err(Error::InvalidState(
        "a cancelled interview takes no evaluation drafts".into(),
      ));
    }

    let rating = evaluation.rating;
    let average = evaluation.sub_ratings.average();
    let interview = self
      .store
      .update_interview(interview_id, InterviewUpdate {
        interview_time: None,
        status,
        evaluation: Some(evaluation),
      })
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::interview_not_found(interview_id))?;

    info!(
      %interview_id,
      rating,
      sub_rating_average = average,
      status = %interview.status,
      "evaluation saved"
    );
    Ok(interview)
  }
}
