//! Error type for `hirely-store-sqlite`.

use hirely_core::store::StoreFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// A UNIQUE / PRIMARY KEY constraint rejected the write.
  #[error("constraint violated: {0}")]
  Conflict(String),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {kind} value: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, msg))
        if e.code == rusqlite::ErrorCode::ConstraintViolation =>
      {
        Self::Conflict(msg.unwrap_or_else(|| e.to_string()))
      }
      other => Self::Database(other),
    }
  }
}

impl StoreFailure for Error {
  fn is_conflict(&self) -> bool { matches!(self, Self::Conflict(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
