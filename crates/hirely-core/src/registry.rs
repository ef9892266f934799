//! [`JobRegistry`]: job postings, moderation and public listings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::{Actor, Role},
  job::{Decision, Job, JobMetadata, JobPatch, JobStatus, NewJob},
  store::{
    JobOrder, JobQuery, MarketStore, Page, PageRequest, check_storable,
  },
};

/// Owns job postings. Only the creator (or an admin, for moderation) may
/// mutate a job.
pub struct JobRegistry<S> {
  store: Arc<S>,
}

impl<S> Clone for JobRegistry<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone() } }
}

impl<S: MarketStore> JobRegistry<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Post a new job. It starts `pending` and active.
  pub async fn create_job(
    &self,
    actor: &Actor,
    deadline: DateTime<Utc>,
    metadata: JobMetadata,
  ) -> Result<Job> {
    actor.require(Role::Employer, "post a job")?;
    check_storable("deadline", deadline)?;
    metadata.validate()?;

    let job = self
      .store
      .insert_job(NewJob::new(actor.id, deadline, metadata))
      .await
      .map_err(Error::from_store)?;

    info!(job_id = %job.job_id, creator_id = %actor.id, "job created");
    Ok(job)
  }

  /// Approve or reject a pending job. Leaves `is_active` untouched.
  pub async fn moderate_job(
    &self,
    actor: &Actor,
    job_id: Uuid,
    decision: Decision,
  ) -> Result<Job> {
    actor.require(Role::Admin, "moderate jobs")?;

    let job = self.get_job(job_id).await?;
    let target = job.status.moderate(decision)?;
    self.transition(job_id, job.status, target).await?;

    info!(%job_id, admin_id = %actor.id, status = %target, "job moderated");
    self.get_job(job_id).await
  }

  /// Owner-only close. A closed job is never listed and cannot be moderated.
  pub async fn close_job(&self, actor: &Actor, job_id: Uuid) -> Result<Job> {
    let job = self.get_job(job_id).await?;
    actor.require_owner(job.creator_id, "close this job")?;

    let target = job.status.close()?;
    self.transition(job_id, job.status, target).await?;

    info!(%job_id, "job closed");
    self.get_job(job_id).await
  }

  /// Overwrite only the fields supplied in `patch`.
  pub async fn update_job(
    &self,
    actor: &Actor,
    job_id: Uuid,
    patch: JobPatch,
  ) -> Result<Job> {
    let mut preview = self.get_job(job_id).await?;
    actor.require_owner(preview.creator_id, "edit this job")?;

    if patch.is_empty() {
      return Ok(preview);
    }
    if let Some(deadline) = patch.deadline {
      check_storable("deadline", deadline)?;
    }
    patch.apply(&mut preview);
    preview.metadata.validate()?;

    let job = self
      .store
      .update_job(job_id, patch)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::job_not_found(job_id))?;

    info!(%job_id, "job updated");
    Ok(job)
  }

  pub async fn delete_job(&self, actor: &Actor, job_id: Uuid) -> Result<()> {
    let job = self.get_job(job_id).await?;
    actor.require_owner(job.creator_id, "delete this job")?;

    let deleted =
      self.store.delete_job(job_id).await.map_err(Error::from_store)?;
    if !deleted {
      return Err(Error::job_not_found(job_id));
    }

    info!(%job_id, "job deleted");
    Ok(())
  }

  /// Jobs that are active, approved and not yet past their deadline at
  /// `now`, newest first.
  pub async fn list_public_jobs(
    &self,
    page: PageRequest,
    now: DateTime<Utc>,
  ) -> Result<Page<Job>> {
    self.page(JobQuery::public(now), page).await
  }

  /// Everything the employer has posted, regardless of status.
  pub async fn list_own_jobs(
    &self,
    actor: &Actor,
    page: PageRequest,
  ) -> Result<Page<Job>> {
    actor.require(Role::Employer, "list own jobs")?;
    let query = JobQuery { creator_id: Some(actor.id), ..Default::default() };
    self.page(query, page).await
  }

  /// The moderation queue, oldest first.
  pub async fn list_pending_jobs(
    &self,
    actor: &Actor,
    page: PageRequest,
  ) -> Result<Page<Job>> {
    actor.require(Role::Admin, "review the moderation queue")?;
    let query = JobQuery {
      status: Some(JobStatus::Pending),
      order: JobOrder::OldestFirst,
      ..Default::default()
    };
    self.page(query, page).await
  }

  /// Detail fetch; counts as a view.
  pub async fn view_job(&self, job_id: Uuid) -> Result<Job> {
    let job = self
      .store
      .record_job_view(job_id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::job_not_found(job_id))?;
    debug!(%job_id, views = job.view_count, "job viewed");
    Ok(job)
  }

  /// Read without counting a view.
  pub async fn get_job(&self, job_id: Uuid) -> Result<Job> {
    self
      .store
      .get_job(job_id)
      .await
      .map_err(Error::from_store)?
      .ok_or_else(|| Error::job_not_found(job_id))
  }

  async fn transition(
    &self,
    job_id: Uuid,
    from: JobStatus,
    to: JobStatus,
  ) -> Result<()> {
    let applied = self
      .store
      .transition_job(job_id, from, to)
      .await
      .map_err(Error::from_store)?;
    if applied {
      return Ok(());
    }
    // Lost a race: someone deleted or re-moderated the job in between.
    let current = self.get_job(job_id).await?;
    Err(Error::InvalidState(format!(
      "job status changed concurrently (now {})",
      current.status
    )))
  }

  async fn page(&self, query: JobQuery, page: PageRequest) -> Result<Page<Job>> {
    page.validate()?;
    let items = self
      .store
      .list_jobs(query.paged(page))
      .await
      .map_err(Error::from_store)?;
    let total = self.store.count_jobs(query).await.map_err(Error::from_store)?;
    Ok(Page { items, total, page: page.page, page_size: page.page_size })
  }
}
