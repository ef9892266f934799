//! [`ActivityTracker`]: saved jobs, follows and applications.
//!
//! Mutations never check first and act second. A toggle deletes, and only
//! inserts if nothing was deleted; the store's uniqueness constraint settles
//! any race between identical concurrent requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  activity::{Activity, ActivityKey, ActivityType, NewActivity, ToggleOutcome},
  actor::{Actor, Role},
  store::{ActivityQuery, MarketStore, StoreFailure as _},
};

pub struct ActivityTracker<S> {
  store: Arc<S>,
}

impl<S> Clone for ActivityTracker<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: MarketStore> ActivityTracker<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Flip the presence of `(actor, target_id, activity_type)`.
  ///
  /// If a concurrent identical toggle wins the insert, the loser reports
  /// `is_active = true` as well: the row exists, which is the outcome both
  /// callers asked for.
  pub async fn toggle(
    &self,
    actor: &Actor,
    target_id: Uuid,
    activity_type: ActivityType,
  ) -> Result<ToggleOutcome> {
    if !activity_type.is_toggleable() {
      return Err(Error::InvalidArgument(format!(
        "{activity_type} activities cannot be toggled"
      )));
    }
    if activity_type == ActivityType::Saved {
      self.require_job(target_id).await?;
    }

    let key = ActivityKey { user_id: actor.id, target_id, activity_type };

    let removed =
      self.store.delete_activity(key).await.map_err(Error::from_store)?;
    if removed {
      debug!(user_id = %actor.id, %target_id, %activity_type, "activity off");
      return Ok(ToggleOutcome { is_active: false });
    }

    match self
      .store
      .insert_activity(NewActivity { key, cv_id: None })
      .await
    {
      Ok(_) => {}
      Err(e) if e.is_conflict() => {
        warn!(
          user_id = %actor.id, %target_id, %activity_type,
          "concurrent toggle already inserted the activity"
        );
      }
      Err(e) => return Err(Error::from_store(e)),
    }
    debug!(user_id = %actor.id, %target_id, %activity_type, "activity on");
    Ok(ToggleOutcome { is_active: true })
  }

  /// Apply to a job that is publicly listable at `now`. A second application
  /// by the same candidate is rejected by the store's uniqueness constraint.
  pub async fn record_application(
    &self,
    actor: &Actor,
    job_id: Uuid,
    cv_id: String,
    now: DateTime<Utc>,
  ) -> Result<Activity> {
    actor.require(Role::Candidate, "apply to a job")?;
    if cv_id.trim().is_empty() {
      return Err(Error::InvalidArgument("cv_id is required".into()));
    }

    let job = self.require_job(job_id).await?;
    if !job.is_public_listable(now) {
      return Err(Error::InvalidState(format!(
        "job {job_id} is not open for applications"
      )));
    }

    let key = ActivityKey {
      user_id:       actor.id,
      target_id:     job_id,
      activity_type: ActivityType::Applied,
    };
    let activity = self
      .store
      .insert_activity(NewActivity { key, cv_id: Some(cv_id) })
      .await
      .map_err(|e| {
        if e.is_conflict() {
          Error::Conflict(format!("already applied to job {job_id}"))
        } else {
          Error::from_store(e)
        }
      })?;

    info!(candidate_id = %actor.id, %job_id, "application recorded");
    Ok(activity)
  }

  /// The caller's own rows of one type, newest first.
  pub async fn list_by_actor(
    &self,
    actor: &Actor,
    activity_type: ActivityType,
  ) -> Result<Vec<Activity>> {
    self
      .store
      .list_activities(ActivityQuery {
        user_id: Some(actor.id),
        activity_type: Some(activity_type),
        ..Default::default()
      })
      .await
      .map_err(Error::from_store)
  }

  /// Whether the caller currently has this activity.
  pub async fn is_active(
    &self,
    actor: &Actor,
    target_id: Uuid,
    activity_type: ActivityType,
  ) -> Result<bool> {
    let key = ActivityKey { user_id: actor.id, target_id, activity_type };
    let row = self.store.get_activity(key).await.map_err(Error::from_store)?;
    Ok(row.is_some())
  }

  /// Public aggregate: everyone following `target_id`.
  pub async fn list_followers(&self, target_id: Uuid) -> Result<Vec<Activity>> {
    self
      .store
      .list_activities(Self::on_target(target_id, ActivityType::Followed))
      .await
      .map_err(Error::from_store)
  }

  pub async fn count_followers(&self, target_id: Uuid) -> Result<u64> {
    self
      .store
      .count_activities(Self::on_target(target_id, ActivityType::Followed))
      .await
      .map_err(Error::from_store)
  }

  /// Public aggregate: how many candidates applied to `job_id`.
  pub async fn count_applications(&self, job_id: Uuid) -> Result<u64> {
    self
      .store
      .count_activities(Self::on_target(job_id, ActivityType::Applied))
      .await
      .map_err(Error::from_store)
  }

  fn on_target(target_id: Uuid, activity_type: ActivityType) -> ActivityQuery {
    ActivityQuery {
      target_id: Some(target_id),
      activity_type: Some(activity_type),
      ..Default::default()
    }
  }

  async fn require_job(&self, job_id: Uuid) -> Result<crate::job::Job> {
    self
      .store
      .get_job(job_id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::job_not_found(job_id))
  }
}
