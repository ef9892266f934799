//! [`SqliteStore`]: the SQLite implementation of [`MarketStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use hirely_core::{
  activity::{Activity, ActivityKey, NewActivity},
  interview::{Interview, InterviewUpdate, NewInterview},
  job::{Job, JobPatch, JobStatus, NewJob},
  store::{ActivityQuery, InterviewQuery, JobOrder, JobQuery, MarketStore},
};

use crate::{
  Error, Result,
  encode::{
    ACTIVITY_COLUMNS, INTERVIEW_COLUMNS, JOB_COLUMNS, RawActivity,
    RawInterview, RawJob, encode_dt, encode_evaluation, encode_metadata,
    encode_uuid, now, to_stored_precision,
  },
  schema::SCHEMA,
};

// ─── Filters ─────────────────────────────────────────────────────────────────

// Each optional filter binds a positional parameter that is NULL when unset,
// so one statement serves every combination.

const JOB_FILTER: &str = "(?1 IS NULL OR status = ?1)
  AND (?2 IS NULL OR is_active = ?2)
  AND (?3 IS NULL OR creator_id = ?3)
  AND (?4 IS NULL OR deadline > ?4)";

const ACTIVITY_FILTER: &str = "(?1 IS NULL OR user_id = ?1)
  AND (?2 IS NULL OR target_id = ?2)
  AND (?3 IS NULL OR activity_type = ?3)";

const INTERVIEW_FILTER: &str = "(?1 IS NULL OR employer_id = ?1)
  AND (?2 IS NULL OR candidate_id = ?2)
  AND (?3 IS NULL OR status = ?3)
  AND (?4 IS NULL OR interview_time = ?4)";

/// Encoded parameters for [`JOB_FILTER`].
struct JobFilter {
  status:         Option<String>,
  is_active:      Option<bool>,
  creator_id:     Option<String>,
  deadline_after: Option<String>,
}

impl From<&JobQuery> for JobFilter {
  fn from(q: &JobQuery) -> Self {
    Self {
      status:         q.status.map(|s| s.as_ref().to_owned()),
      is_active:      q.is_active,
      creator_id:     q.creator_id.map(encode_uuid),
      deadline_after: q.deadline_after.map(encode_dt),
    }
  }
}

/// Encoded parameters for [`ACTIVITY_FILTER`].
struct ActivityFilter {
  user_id:       Option<String>,
  target_id:     Option<String>,
  activity_type: Option<String>,
}

impl From<&ActivityQuery> for ActivityFilter {
  fn from(q: &ActivityQuery) -> Self {
    Self {
      user_id:       q.user_id.map(encode_uuid),
      target_id:     q.target_id.map(encode_uuid),
      activity_type: q.activity_type.map(|t| t.as_ref().to_owned()),
    }
  }
}

/// Decode errors raised inside a `call` closure travel as
/// `tokio_rusqlite::Error::Other`.
fn other(e: Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Hirely store backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "opening database");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory store, used by the tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── MarketStore impl ────────────────────────────────────────────────────────

impl MarketStore for SqliteStore {
  type Error = Error;

  // ── Jobs ──────────────────────────────────────────────────────────────────

  async fn insert_job(&self, input: NewJob) -> Result<Job> {
    let at = now();
    let job = Job {
      job_id:     Uuid::new_v4(),
      creator_id: input.creator_id,
      metadata:   input.metadata,
      deadline:   to_stored_precision(input.deadline),
      is_active:  input.is_active,
      status:     input.status,
      view_count: 0,
      created_at: at,
      updated_at: at,
    };

    let id_str       = encode_uuid(job.job_id);
    let creator_str  = encode_uuid(job.creator_id);
    let status_str   = job.status.as_ref().to_owned();
    let is_active    = job.is_active;
    let deadline_str = encode_dt(job.deadline);
    let metadata_str = encode_metadata(&job.metadata)?;
    let at_str       = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO jobs (
             job_id, creator_id, status, is_active, deadline,
             view_count, metadata, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?7)",
          rusqlite::params![
            id_str,
            creator_str,
            status_str,
            is_active,
            deadline_str,
            metadata_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(job)
  }

  async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawJob> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = ?1"),
              rusqlite::params![id_str],
              RawJob::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawJob::into_job).transpose()
  }

  async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>> {
    let id_str = encode_uuid(id);
    let at     = now();

    let job = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = tx
          .query_row(
            &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = ?1"),
            rusqlite::params![id_str],
            RawJob::from_row,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(None);
        };

        let mut job = raw.into_job().map_err(other)?;
        patch.apply(&mut job);
        job.deadline = to_stored_precision(job.deadline);
        job.updated_at = at;

        let metadata_str = encode_metadata(&job.metadata).map_err(other)?;
        tx.execute(
          "UPDATE jobs
           SET deadline = ?2, is_active = ?3, metadata = ?4, updated_at = ?5
           WHERE job_id = ?1",
          rusqlite::params![
            id_str,
            encode_dt(job.deadline),
            job.is_active,
            metadata_str,
            encode_dt(at),
          ],
        )?;
        tx.commit()?;
        Ok(Some(job))
      })
      .await?;

    Ok(job)
  }

  async fn transition_job(
    &self,
    id:   Uuid,
    from: JobStatus,
    to:   JobStatus,
  ) -> Result<bool> {
    let id_str   = encode_uuid(id);
    let from_str = from.as_ref().to_owned();
    let to_str   = to.as_ref().to_owned();
    let at_str   = encode_dt(now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE jobs SET status = ?3, updated_at = ?4
           WHERE job_id = ?1 AND status = ?2",
          rusqlite::params![id_str, from_str, to_str, at_str],
        )?)
      })
      .await?;

    Ok(changed == 1)
  }

  async fn delete_job(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM jobs WHERE job_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn record_job_view(&self, id: Uuid) -> Result<Option<Job>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawJob> = self
      .conn
      .call(move |conn| {
        let bumped = conn.execute(
          "UPDATE jobs SET view_count = view_count + 1 WHERE job_id = ?1",
          rusqlite::params![id_str],
        )?;
        if bumped == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(
              &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = ?1"),
              rusqlite::params![id_str],
              RawJob::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawJob::into_job).transpose()
  }

  async fn list_jobs(&self, query: JobQuery) -> Result<Vec<Job>> {
    let filter = JobFilter::from(&query);
    let order  = match query.order {
      JobOrder::NewestFirst => "created_at DESC, rowid DESC",
      JobOrder::OldestFirst => "created_at ASC, rowid ASC",
    };
    // SQLite treats a negative LIMIT as "no limit".
    let limit  = query.limit.map_or(-1, |l| l as i64);
    let offset = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawJob> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {JOB_COLUMNS} FROM jobs
           WHERE {JOB_FILTER}
           ORDER BY {order}
           LIMIT ?5 OFFSET ?6"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              filter.status,
              filter.is_active,
              filter.creator_id,
              filter.deadline_after,
              limit,
              offset,
            ],
            RawJob::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawJob::into_job).collect()
  }

  async fn count_jobs(&self, query: JobQuery) -> Result<u64> {
    let filter = JobFilter::from(&query);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!("SELECT COUNT(*) FROM jobs WHERE {JOB_FILTER}"),
          rusqlite::params![
            filter.status,
            filter.is_active,
            filter.creator_id,
            filter.deadline_after,
          ],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(u64::try_from(count).unwrap_or_default())
  }

  // ── Activities ────────────────────────────────────────────────────────────

  async fn insert_activity(&self, input: NewActivity) -> Result<Activity> {
    let activity = Activity {
      key:        input.key,
      cv_id:      input.cv_id,
      created_at: now(),
    };

    let user_str   = encode_uuid(activity.key.user_id);
    let target_str = encode_uuid(activity.key.target_id);
    let type_str   = activity.key.activity_type.as_ref().to_owned();
    let cv_id      = activity.cv_id.clone();
    let at_str     = encode_dt(activity.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activities (user_id, target_id, activity_type, cv_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![user_str, target_str, type_str, cv_id, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(activity)
  }

  async fn get_activity(&self, key: ActivityKey) -> Result<Option<Activity>> {
    let filter = ActivityFilter::from(&ActivityQuery {
      user_id:       Some(key.user_id),
      target_id:     Some(key.target_id),
      activity_type: Some(key.activity_type),
    });

    let raw: Option<RawActivity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACTIVITY_COLUMNS} FROM activities
                 WHERE user_id = ?1 AND target_id = ?2 AND activity_type = ?3"
              ),
              rusqlite::params![
                filter.user_id,
                filter.target_id,
                filter.activity_type
              ],
              RawActivity::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActivity::into_activity).transpose()
  }

  async fn delete_activity(&self, key: ActivityKey) -> Result<bool> {
    let user_str   = encode_uuid(key.user_id);
    let target_str = encode_uuid(key.target_id);
    let type_str   = key.activity_type.as_ref().to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM activities
           WHERE user_id = ?1 AND target_id = ?2 AND activity_type = ?3",
          rusqlite::params![user_str, target_str, type_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }

  async fn list_activities(&self, query: ActivityQuery) -> Result<Vec<Activity>> {
    let filter = ActivityFilter::from(&query);

    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {ACTIVITY_COLUMNS} FROM activities
           WHERE {ACTIVITY_FILTER}
           ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              filter.user_id,
              filter.target_id,
              filter.activity_type
            ],
            RawActivity::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_activity).collect()
  }

  async fn count_activities(&self, query: ActivityQuery) -> Result<u64> {
    let filter = ActivityFilter::from(&query);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!("SELECT COUNT(*) FROM activities WHERE {ACTIVITY_FILTER}"),
          rusqlite::params![
            filter.user_id,
            filter.target_id,
            filter.activity_type
          ],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(u64::try_from(count).unwrap_or_default())
  }

  // ── Interviews ────────────────────────────────────────────────────────────

  async fn insert_interview(&self, input: NewInterview) -> Result<Interview> {
    let at = now();
    let interview = Interview {
      interview_id:   Uuid::new_v4(),
      candidate_id:   input.candidate_id,
      employer_id:    input.employer_id,
      job_id:         input.job_id,
      cv_id:          input.cv_id,
      interview_time: to_stored_precision(input.interview_time),
      job_title:      input.job_title,
      status:         input.status,
      evaluation:     input.evaluation,
      created_at:     at,
      updated_at:     at,
    };

    let id_str         = encode_uuid(interview.interview_id);
    let candidate_str  = encode_uuid(interview.candidate_id);
    let employer_str   = encode_uuid(interview.employer_id);
    let job_str        = interview.job_id.map(encode_uuid);
    let cv_id          = interview.cv_id.clone();
    let time_str       = encode_dt(interview.interview_time);
    let title          = interview.job_title.clone();
    let status_str     = interview.status.as_ref().to_owned();
    let evaluation_str = encode_evaluation(interview.evaluation.as_ref())?;
    let at_str         = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO interviews (
             interview_id, candidate_id, employer_id, job_id, cv_id,
             interview_time, job_title, status, evaluation,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
          rusqlite::params![
            id_str,
            candidate_str,
            employer_str,
            job_str,
            cv_id,
            time_str,
            title,
            status_str,
            evaluation_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(interview)
  }

  async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawInterview> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE interview_id = ?1"
              ),
              rusqlite::params![id_str],
              RawInterview::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInterview::into_interview).transpose()
  }

  async fn update_interview(
    &self,
    id:     Uuid,
    update: InterviewUpdate,
  ) -> Result<Option<Interview>> {
    let id_str = encode_uuid(id);
    let at     = now();

    let interview = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = tx
          .query_row(
            &format!(
              "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE interview_id = ?1"
            ),
            rusqlite::params![id_str],
            RawInterview::from_row,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(None);
        };

        let mut interview = raw.into_interview().map_err(other)?;
        update.apply(&mut interview);
        interview.interview_time = to_stored_precision(interview.interview_time);
        interview.updated_at = at;

        let evaluation_str =
          encode_evaluation(interview.evaluation.as_ref()).map_err(other)?;
        tx.execute(
          "UPDATE interviews
           SET interview_time = ?2, status = ?3, evaluation = ?4, updated_at = ?5
           WHERE interview_id = ?1",
          rusqlite::params![
            id_str,
            encode_dt(interview.interview_time),
            interview.status.as_ref(),
            evaluation_str,
            encode_dt(at),
          ],
        )?;
        tx.commit()?;
        Ok(Some(interview))
      })
      .await?;

    Ok(interview)
  }

  async fn list_interviews(&self, query: InterviewQuery) -> Result<Vec<Interview>> {
    let employer_str  = query.employer_id.map(encode_uuid);
    let candidate_str = query.candidate_id.map(encode_uuid);
    let status_str    = query.status.map(|s| s.as_ref().to_owned());
    let time_str      = query.interview_time.map(encode_dt);

    let raws: Vec<RawInterview> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {INTERVIEW_COLUMNS} FROM interviews
           WHERE {INTERVIEW_FILTER}
           ORDER BY interview_time ASC, rowid ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![employer_str, candidate_str, status_str, time_str],
            RawInterview::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInterview::into_interview).collect()
  }
}
