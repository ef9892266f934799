//! Per-user activity records: saved jobs, applications and follows.
//!
//! An activity is identified by its [`ActivityKey`]. At most one row exists
//! per key; presence is the whole state (there are no counts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr,
  Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityType {
  Saved,
  Applied,
  Followed,
}

impl ActivityType {
  /// Applications are append-only and cannot be flipped off again.
  pub fn is_toggleable(self) -> bool { !matches!(self, Self::Applied) }
}

/// The composite identity `(user_id, target_id, activity_type)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityKey {
  pub user_id:       Uuid,
  /// A job for `saved`/`applied`; any followable entity for `followed`.
  pub target_id:     Uuid,
  pub activity_type: ActivityType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
  #[serde(flatten)]
  pub key:        ActivityKey,
  /// The CV submitted with an application.
  pub cv_id:      Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::MarketStore::insert_activity`].
#[derive(Debug, Clone)]
pub struct NewActivity {
  pub key:   ActivityKey,
  pub cv_id: Option<String>,
}

/// Result of a toggle: whether the activity exists afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
  pub is_active: bool,
}
