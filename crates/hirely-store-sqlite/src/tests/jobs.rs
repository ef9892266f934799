//! `JobRegistry` on the SQLite store.

use hirely_core::{
  Error,
  actor::Role,
  job::{Decision, JobPatch, JobStatus, Salary},
  store::PageRequest,
};
use uuid::Uuid;

use super::{actor, approved_job, deadline, market, metadata, now, utc};

#[tokio::test]
async fn pending_job_is_listed_once_approved() {
  let m = market().await;
  let employer = actor(Role::Employer);
  let admin = actor(Role::Admin);

  let job = m
    .jobs
    .create_job(&employer, deadline(), metadata("Platform engineer"))
    .await
    .unwrap();
  assert_eq!(job.status, JobStatus::Pending);
  assert!(job.is_active);

  let page = m
    .jobs
    .list_public_jobs(PageRequest::default(), now())
    .await
    .unwrap();
  assert!(page.items.is_empty());
  assert_eq!(page.total, 0);

  let job = m
    .jobs
    .moderate_job(&admin, job.job_id, Decision::Approved)
    .await
    .unwrap();
  assert_eq!(job.status, JobStatus::Approved);

  let page = m
    .jobs
    .list_public_jobs(PageRequest::default(), now())
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items[0].job_id, job.job_id);
}

#[tokio::test]
async fn non_admin_moderation_is_forbidden() {
  let m = market().await;
  let employer = actor(Role::Employer);
  let job = m
    .jobs
    .create_job(&employer, deadline(), metadata("Analyst"))
    .await
    .unwrap();

  for role in [Role::Candidate, Role::Employer, Role::School] {
    let err = m
      .jobs
      .moderate_job(&actor(role), job.job_id, Decision::Approved)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)), "{role}: {err:?}");
  }
  // Even the owner cannot approve their own posting.
  let err = m
    .jobs
    .moderate_job(&employer, job.job_id, Decision::Approved)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  let job = m.jobs.get_job(job.job_id).await.unwrap();
  assert_eq!(job.status, JobStatus::Pending);
}

#[tokio::test]
async fn moderation_is_one_shot() {
  let m = market().await;
  let employer = actor(Role::Employer);
  let admin = actor(Role::Admin);
  let job = m
    .jobs
    .create_job(&employer, deadline(), metadata("Recruiter"))
    .await
    .unwrap();

  m.jobs
    .moderate_job(&admin, job.job_id, Decision::Rejected)
    .await
    .unwrap();
  let err = m
    .jobs
    .moderate_job(&admin, job.job_id, Decision::Approved)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidState(_)));

  let err = m
    .jobs
    .moderate_job(&admin, Uuid::new_v4(), Decision::Approved)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: "job", .. }));
}

#[tokio::test]
async fn only_employers_post_jobs() {
  let m = market().await;
  let err = m
    .jobs
    .create_job(&actor(Role::Candidate), deadline(), metadata("Nope"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  let err = m
    .jobs
    .create_job(&actor(Role::Employer), deadline(), metadata("  "))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn public_listing_never_leaks_unlistable_jobs() {
  let m = market().await;
  let employer = actor(Role::Employer);

  let listed = approved_job(&m, &employer, "listed").await;

  let inactive = approved_job(&m, &employer, "inactive").await;
  m.jobs
    .update_job(&employer, inactive.job_id, JobPatch {
      is_active: Some(false),
      ..Default::default()
    })
    .await
    .unwrap();

  let expired = approved_job(&m, &employer, "expired").await;
  m.jobs
    .update_job(&employer, expired.job_id, JobPatch {
      deadline: Some(now()),
      ..Default::default()
    })
    .await
    .unwrap();

  let closed = approved_job(&m, &employer, "closed").await;
  m.jobs.close_job(&employer, closed.job_id).await.unwrap();

  m.jobs
    .create_job(&employer, deadline(), metadata("pending"))
    .await
    .unwrap();

  let page = m
    .jobs
    .list_public_jobs(PageRequest::default(), now())
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.items[0].job_id, listed.job_id);
  assert!(page.items.iter().all(|j| j.is_public_listable(now())));

  // After the deadline nothing is listed.
  let later = m
    .jobs
    .list_public_jobs(PageRequest::default(), utc(2025, 7, 1, 0))
    .await
    .unwrap();
  assert!(later.items.is_empty());
}

#[tokio::test]
async fn public_listing_pages_newest_first() {
  let m = market().await;
  let employer = actor(Role::Employer);
  let mut ids = Vec::new();
  for i in 0..5 {
    ids.push(approved_job(&m, &employer, &format!("job {i}")).await.job_id);
  }

  let first = m
    .jobs
    .list_public_jobs(PageRequest::new(1, 2).unwrap(), now())
    .await
    .unwrap();
  let third = m
    .jobs
    .list_public_jobs(PageRequest::new(3, 2).unwrap(), now())
    .await
    .unwrap();

  assert_eq!(first.total, 5);
  assert_eq!(
    first.items.iter().map(|j| j.job_id).collect::<Vec<_>>(),
    vec![ids[4], ids[3]]
  );
  assert_eq!(third.items.len(), 1);
  assert_eq!(third.items[0].job_id, ids[0]);

  let err = m
    .jobs
    .list_public_jobs(PageRequest { page: 0, page_size: 10 }, now())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn owner_edits_are_partial_and_validated() {
  let m = market().await;
  let employer = actor(Role::Employer);
  let job = approved_job(&m, &employer, "Mobile developer").await;

  let updated = m
    .jobs
    .update_job(&employer, job.job_id, JobPatch {
      salary: Some(Salary::Range {
        min:      1_000,
        max:      2_000,
        currency: "USD".into(),
      }),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.metadata.title, "Mobile developer");
  assert_eq!(updated.status, JobStatus::Approved);
  assert!(matches!(updated.metadata.salary, Salary::Range { .. }));

  let err = m
    .jobs
    .update_job(&employer, job.job_id, JobPatch {
      title: Some(String::new()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)));

  let err = m
    .jobs
    .update_job(&actor(Role::Employer), job.job_id, JobPatch {
      is_active: Some(false),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  let stored = m.jobs.get_job(job.job_id).await.unwrap();
  assert_eq!(stored, updated);
}

#[tokio::test]
async fn five_digit_year_deadlines_are_rejected() {
  let m = market().await;
  let employer = actor(Role::Employer);
  let admin = actor(Role::Admin);

  let err = m
    .jobs
    .create_job(&employer, utc(10000, 1, 1, 0), metadata("Archivist"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");

  let job = m
    .jobs
    .create_job(&employer, utc(9999, 12, 31, 23), metadata("Archivist"))
    .await
    .unwrap();
  let err = m
    .jobs
    .update_job(&employer, job.job_id, JobPatch {
      deadline: Some(utc(10000, 1, 1, 0)),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");

  let queue = m
    .jobs
    .list_pending_jobs(&admin, PageRequest::default())
    .await
    .unwrap();
  assert_eq!(queue.total, 1);
  assert_eq!(queue.items[0].deadline, utc(9999, 12, 31, 23));
}

#[tokio::test]
async fn close_is_terminal() {
  let m = market().await;
  let employer = actor(Role::Employer);
  let job = approved_job(&m, &employer, "Support").await;

  let err = m
    .jobs
    .close_job(&actor(Role::Employer), job.job_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  let closed = m.jobs.close_job(&employer, job.job_id).await.unwrap();
  assert_eq!(closed.status, JobStatus::Closed);

  let err = m.jobs.close_job(&employer, job.job_id).await.unwrap_err();
  assert!(matches!(err, Error::InvalidState(_)));
  let err = m
    .jobs
    .moderate_job(&actor(Role::Admin), job.job_id, Decision::Approved)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidState(_)));
}

#[tokio::test]
async fn delete_is_owner_only() {
  let m = market().await;
  let employer = actor(Role::Employer);
  let job = approved_job(&m, &employer, "Ops").await;

  let err = m
    .jobs
    .delete_job(&actor(Role::Admin), job.job_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));

  m.jobs.delete_job(&employer, job.job_id).await.unwrap();
  let err = m.jobs.get_job(job.job_id).await.unwrap_err();
  assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn own_and_pending_listings() {
  let m = market().await;
  let employer = actor(Role::Employer);
  let other = actor(Role::Employer);
  let admin = actor(Role::Admin);

  let first = m
    .jobs
    .create_job(&employer, deadline(), metadata("first"))
    .await
    .unwrap();
  let second = m
    .jobs
    .create_job(&other, deadline(), metadata("second"))
    .await
    .unwrap();
  approved_job(&m, &employer, "approved").await;

  let own = m
    .jobs
    .list_own_jobs(&employer, PageRequest::default())
    .await
    .unwrap();
  assert_eq!(own.total, 2);
  assert!(own.items.iter().all(|j| j.creator_id == employer.id));

  let queue = m
    .jobs
    .list_pending_jobs(&admin, PageRequest::default())
    .await
    .unwrap();
  assert_eq!(
    queue.items.iter().map(|j| j.job_id).collect::<Vec<_>>(),
    vec![first.job_id, second.job_id]
  );

  let err = m
    .jobs
    .list_pending_jobs(&employer, PageRequest::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Forbidden(_)));
}

#[tokio::test]
async fn viewing_counts() {
  let m = market().await;
  let job = approved_job(&m, &actor(Role::Employer), "Viewed").await;

  m.jobs.view_job(job.job_id).await.unwrap();
  let job = m.jobs.view_job(job.job_id).await.unwrap();
  assert_eq!(job.view_count, 2);
  assert_eq!(m.jobs.get_job(job.job_id).await.unwrap().view_count, 2);
}
