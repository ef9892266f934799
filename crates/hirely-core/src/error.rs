//! Error types for `hirely-core`.
//!
//! Every variant except [`Error::Store`] is part of the caller-visible
//! taxonomy; transports map them one-to-one onto their own status codes.

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreFailure;

#[derive(Debug, Error)]
pub enum Error {
  /// The caller's identity could not be resolved.
  #[error("authentication required")]
  Unauthenticated,

  /// The caller is known but lacks the role or ownership required.
  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: Uuid },

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// Well-formed request that does not apply to the entity's current state.
  #[error("invalid state: {0}")]
  InvalidState(String),

  /// A uniqueness or mutual-exclusion invariant would be violated.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn job_not_found(id: Uuid) -> Self { Self::NotFound { kind: "job", id } }

  pub fn interview_not_found(id: Uuid) -> Self {
    Self::NotFound { kind: "interview", id }
  }

  /// Classify a backend failure: uniqueness violations become
  /// [`Error::Conflict`], everything else is an opaque [`Error::Store`].
  pub fn from_store<E: StoreFailure>(err: E) -> Self {
    if err.is_conflict() {
      Self::Conflict(err.to_string())
    } else {
      Self::Store(Box::new(err))
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
