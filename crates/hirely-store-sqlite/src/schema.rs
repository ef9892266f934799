//! SQL schema for the Hirely SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS jobs (
    job_id      TEXT PRIMARY KEY,
    creator_id  TEXT NOT NULL,
    status      TEXT NOT NULL,      -- 'pending' | 'approved' | 'rejected' | 'closed'
    is_active   INTEGER NOT NULL,
    deadline    TEXT NOT NULL,      -- RFC 3339 UTC, fixed width
    view_count  INTEGER NOT NULL DEFAULT 0,
    metadata    TEXT NOT NULL,      -- JSON JobMetadata
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS jobs_listing_idx ON jobs(status, is_active, deadline);
CREATE INDEX IF NOT EXISTS jobs_creator_idx ON jobs(creator_id);
CREATE INDEX IF NOT EXISTS jobs_created_idx ON jobs(created_at);

-- At most one row per (user, target, type); the key is the whole state.
CREATE TABLE IF NOT EXISTS activities (
    user_id       TEXT NOT NULL,
    target_id     TEXT NOT NULL,
    activity_type TEXT NOT NULL,    -- 'saved' | 'applied' | 'followed'
    cv_id         TEXT,
    created_at    TEXT NOT NULL,
    PRIMARY KEY (user_id, target_id, activity_type)
);

CREATE INDEX IF NOT EXISTS activities_target_idx
    ON activities(target_id, activity_type);

CREATE TABLE IF NOT EXISTS interviews (
    interview_id   TEXT PRIMARY KEY,
    candidate_id   TEXT NOT NULL,
    employer_id    TEXT NOT NULL,
    job_id         TEXT,
    cv_id          TEXT,
    interview_time TEXT NOT NULL,
    job_title      TEXT NOT NULL,
    status         TEXT NOT NULL,   -- 'scheduled' | 'completed' | 'postponed' | 'cancelled'
    evaluation     TEXT,            -- JSON Evaluation or NULL
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- No double-booking: one scheduled interview per employer per instant.
CREATE UNIQUE INDEX IF NOT EXISTS interviews_slot_idx
    ON interviews(employer_id, interview_time)
    WHERE status = 'scheduled';

CREATE INDEX IF NOT EXISTS interviews_candidate_idx
    ON interviews(candidate_id, interview_time);

PRAGMA user_version = 1;
";
