//! `MarketStore` behaviour exercised directly, below the components.

use hirely_core::{
  activity::{ActivityKey, ActivityType, NewActivity},
  evaluation::Evaluation,
  interview::{InterviewStatus, InterviewUpdate, NewInterview},
  job::{JobPatch, JobStatus, NewJob},
  store::{
    ActivityQuery, InterviewQuery, JobOrder, JobQuery, MarketStore,
    StoreFailure as _,
  },
};
use uuid::Uuid;

use super::{deadline, metadata, now, store, utc};
use crate::Error;

// ─── Jobs ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_job() {
  let s = store().await;
  let creator = Uuid::new_v4();

  let job = s
    .insert_job(NewJob::new(creator, deadline(), metadata("Backend engineer")))
    .await
    .unwrap();
  assert_eq!(job.status, JobStatus::Pending);
  assert!(job.is_active);
  assert_eq!(job.view_count, 0);

  let fetched = s.get_job(job.job_id).await.unwrap().unwrap();
  assert_eq!(fetched, job);
}

#[tokio::test]
async fn get_job_missing_returns_none() {
  let s = store().await;
  assert!(s.get_job(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn transition_is_compare_and_set() {
  let s = store().await;
  let job = s
    .insert_job(NewJob::new(Uuid::new_v4(), deadline(), metadata("Designer")))
    .await
    .unwrap();

  assert!(
    s.transition_job(job.job_id, JobStatus::Pending, JobStatus::Approved)
      .await
      .unwrap()
  );
  // Second attempt from the stale source state does nothing.
  assert!(
    !s.transition_job(job.job_id, JobStatus::Pending, JobStatus::Rejected)
      .await
      .unwrap()
  );
  let job = s.get_job(job.job_id).await.unwrap().unwrap();
  assert_eq!(job.status, JobStatus::Approved);
}

#[tokio::test]
async fn update_job_touches_only_patched_fields() {
  let s = store().await;
  let job = s
    .insert_job(NewJob::new(Uuid::new_v4(), deadline(), metadata("Tester")))
    .await
    .unwrap();

  let patch = JobPatch {
    is_active: Some(false),
    tags: Some(vec!["qa".into()]),
    ..Default::default()
  };
  let updated = s.update_job(job.job_id, patch).await.unwrap().unwrap();
  assert!(!updated.is_active);
  assert_eq!(updated.metadata.tags, vec!["qa".to_string()]);
  assert_eq!(updated.metadata.title, "Tester");
  assert_eq!(updated.deadline, job.deadline);
  assert!(updated.updated_at >= job.updated_at);

  assert_eq!(s.get_job(job.job_id).await.unwrap().unwrap(), updated);
  assert!(
    s.update_job(Uuid::new_v4(), JobPatch::default())
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn record_view_increments_counter() {
  let s = store().await;
  let job = s
    .insert_job(NewJob::new(Uuid::new_v4(), deadline(), metadata("Writer")))
    .await
    .unwrap();

  s.record_job_view(job.job_id).await.unwrap();
  let job = s.record_job_view(job.job_id).await.unwrap().unwrap();
  assert_eq!(job.view_count, 2);
  assert!(s.record_job_view(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_jobs_filters_orders_and_pages() {
  let s = store().await;
  let creator = Uuid::new_v4();
  let mut ids = Vec::new();
  for title in ["first", "second", "third"] {
    let job = s
      .insert_job(NewJob::new(creator, deadline(), metadata(title)))
      .await
      .unwrap();
    ids.push(job.job_id);
  }
  s.insert_job(NewJob::new(Uuid::new_v4(), deadline(), metadata("other")))
    .await
    .unwrap();

  let mine = JobQuery { creator_id: Some(creator), ..Default::default() };
  let newest = s.list_jobs(mine).await.unwrap();
  let newest: Vec<_> = newest.iter().map(|j| j.job_id).collect();
  assert_eq!(newest, vec![ids[2], ids[1], ids[0]]);

  let oldest = s
    .list_jobs(JobQuery { order: JobOrder::OldestFirst, ..mine })
    .await
    .unwrap();
  assert_eq!(oldest[0].job_id, ids[0]);

  let page = s
    .list_jobs(JobQuery { limit: Some(1), offset: Some(1), ..mine })
    .await
    .unwrap();
  assert_eq!(page.len(), 1);
  assert_eq!(page[0].job_id, ids[1]);

  assert_eq!(s.count_jobs(mine).await.unwrap(), 3);
  assert_eq!(s.count_jobs(JobQuery::default()).await.unwrap(), 4);
}

#[tokio::test]
async fn public_query_excludes_expired_and_inactive() {
  let s = store().await;
  let creator = Uuid::new_v4();

  let open = s
    .insert_job(NewJob::new(creator, deadline(), metadata("open")))
    .await
    .unwrap();
  let expired = s
    .insert_job(NewJob::new(creator, now(), metadata("expired")))
    .await
    .unwrap();
  let inactive = s
    .insert_job(NewJob::new(creator, deadline(), metadata("inactive")))
    .await
    .unwrap();
  for job in [&open, &expired, &inactive] {
    s.transition_job(job.job_id, JobStatus::Pending, JobStatus::Approved)
      .await
      .unwrap();
  }
  s.update_job(inactive.job_id, JobPatch {
    is_active: Some(false),
    ..Default::default()
  })
  .await
  .unwrap();

  let listed = s.list_jobs(JobQuery::public(now())).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].job_id, open.job_id);
  assert_eq!(s.count_jobs(JobQuery::public(now())).await.unwrap(), 1);
}

#[tokio::test]
async fn delete_job_reports_whether_anything_went() {
  let s = store().await;
  let job = s
    .insert_job(NewJob::new(Uuid::new_v4(), deadline(), metadata("Temp")))
    .await
    .unwrap();
  assert!(s.delete_job(job.job_id).await.unwrap());
  assert!(!s.delete_job(job.job_id).await.unwrap());
  assert!(s.get_job(job.job_id).await.unwrap().is_none());
}

// ─── Activities ──────────────────────────────────────────────────────────────

fn key(activity_type: ActivityType) -> ActivityKey {
  ActivityKey {
    user_id: Uuid::new_v4(),
    target_id: Uuid::new_v4(),
    activity_type,
  }
}

#[tokio::test]
async fn duplicate_activity_is_a_conflict() {
  let s = store().await;
  let key = key(ActivityType::Saved);

  s.insert_activity(NewActivity { key, cv_id: None }).await.unwrap();
  let err = s
    .insert_activity(NewActivity { key, cv_id: None })
    .await
    .unwrap_err();
  assert!(err.is_conflict(), "expected conflict, got {err:?}");
  assert!(matches!(err, Error::Conflict(_)));

  // Same pair, different type, is a separate row.
  let followed = ActivityKey { activity_type: ActivityType::Followed, ..key };
  s.insert_activity(NewActivity { key: followed, cv_id: None })
    .await
    .unwrap();
  assert_eq!(
    s.count_activities(ActivityQuery {
      user_id: Some(key.user_id),
      ..Default::default()
    })
    .await
    .unwrap(),
    2
  );
}

#[tokio::test]
async fn activity_round_trips_cv_and_deletes_by_key() {
  let s = store().await;
  let key = key(ActivityType::Applied);

  let inserted = s
    .insert_activity(NewActivity { key, cv_id: Some("cv-9".into()) })
    .await
    .unwrap();
  let fetched = s.get_activity(key).await.unwrap().unwrap();
  assert_eq!(fetched, inserted);

  assert!(s.delete_activity(key).await.unwrap());
  assert!(!s.delete_activity(key).await.unwrap());
  assert!(s.get_activity(key).await.unwrap().is_none());
}

#[tokio::test]
async fn list_activities_newest_first() {
  let s = store().await;
  let user = Uuid::new_v4();
  let mut targets = Vec::new();
  for _ in 0..3 {
    let key = ActivityKey {
      user_id:       user,
      target_id:     Uuid::new_v4(),
      activity_type: ActivityType::Followed,
    };
    s.insert_activity(NewActivity { key, cv_id: None }).await.unwrap();
    targets.push(key.target_id);
  }

  let listed = s
    .list_activities(ActivityQuery {
      user_id: Some(user),
      activity_type: Some(ActivityType::Followed),
      ..Default::default()
    })
    .await
    .unwrap();
  let listed: Vec<_> = listed.iter().map(|a| a.key.target_id).collect();
  targets.reverse();
  assert_eq!(listed, targets);
}

// ─── Interviews ──────────────────────────────────────────────────────────────

fn new_interview(employer_id: Uuid, hour: u32) -> NewInterview {
  NewInterview {
    candidate_id:   Uuid::new_v4(),
    employer_id,
    job_id:         None,
    cv_id:          None,
    interview_time: utc(2025, 3, 1, hour),
    job_title:      "Data engineer".into(),
    status:         InterviewStatus::Scheduled,
    evaluation:     Some(Evaluation::default()),
  }
}

#[tokio::test]
async fn slot_index_only_binds_scheduled_interviews() {
  let s = store().await;
  let employer = Uuid::new_v4();

  let first = s.insert_interview(new_interview(employer, 9)).await.unwrap();
  let err = s
    .insert_interview(new_interview(employer, 9))
    .await
    .unwrap_err();
  assert!(err.is_conflict());

  // Another employer may use the same instant.
  s.insert_interview(new_interview(Uuid::new_v4(), 9)).await.unwrap();

  // Cancelling frees the slot.
  s.update_interview(
    first.interview_id,
    InterviewUpdate::status(InterviewStatus::Cancelled),
  )
  .await
  .unwrap();
  let second = s.insert_interview(new_interview(employer, 9)).await.unwrap();

  // Re-activating the cancelled one now collides.
  let err = s
    .update_interview(
      first.interview_id,
      InterviewUpdate::status(InterviewStatus::Scheduled),
    )
    .await
    .unwrap_err();
  assert!(err.is_conflict());
  let first = s.get_interview(first.interview_id).await.unwrap().unwrap();
  assert_eq!(first.status, InterviewStatus::Cancelled);
  assert_eq!(
    s.get_interview(second.interview_id).await.unwrap().unwrap().status,
    InterviewStatus::Scheduled
  );
}

#[tokio::test]
async fn interviews_list_earliest_first() {
  let s = store().await;
  let employer = Uuid::new_v4();
  s.insert_interview(new_interview(employer, 15)).await.unwrap();
  s.insert_interview(new_interview(employer, 9)).await.unwrap();
  s.insert_interview(new_interview(employer, 11)).await.unwrap();

  let listed = s
    .list_interviews(InterviewQuery {
      employer_id: Some(employer),
      ..Default::default()
    })
    .await
    .unwrap();
  let hours: Vec<_> = listed.iter().map(|i| i.interview_time).collect();
  assert_eq!(hours, vec![
    utc(2025, 3, 1, 9),
    utc(2025, 3, 1, 11),
    utc(2025, 3, 1, 15)
  ]);

  let at_eleven = s
    .list_interviews(InterviewQuery {
      employer_id: Some(employer),
      interview_time: Some(utc(2025, 3, 1, 11)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(at_eleven.len(), 1);
}

#[tokio::test]
async fn evaluation_json_round_trips() {
  let s = store().await;
  let interview = s
    .insert_interview(new_interview(Uuid::new_v4(), 10))
    .await
    .unwrap();

  let mut evaluation = Evaluation { rating: 3.5, ..Default::default() };
  evaluation.sub_ratings.communication = 7;
  evaluation.tags.insert("leadership".into());
  let updated = s
    .update_interview(interview.interview_id, InterviewUpdate {
      evaluation: Some(evaluation.clone()),
      ..Default::default()
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.evaluation.as_ref(), Some(&evaluation));

  let fetched = s.get_interview(interview.interview_id).await.unwrap().unwrap();
  assert_eq!(fetched.evaluation, Some(evaluation));
  assert_eq!(fetched.status, InterviewStatus::Scheduled);
}
