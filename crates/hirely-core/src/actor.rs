//! The authenticated identity performing an operation.
//!
//! Resolving credentials into an [`Actor`] is the transport's job; every
//! component takes an already-resolved actor and checks its preconditions
//! against the closed [`Role`] variant.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr,
  Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Candidate,
  Employer,
  School,
  Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub id:   Uuid,
  pub role: Role,
}

impl Actor {
  pub fn new(id: Uuid, role: Role) -> Self { Self { id, role } }

  pub fn is(&self, role: Role) -> bool { self.role == role }

  /// Fail with [`Error::Forbidden`] unless the actor holds `role`.
  pub fn require(&self, role: Role, action: &str) -> Result<()> {
    if self.is(role) {
      Ok(())
    } else {
      Err(Error::Forbidden(format!("{action} requires the {role} role")))
    }
  }

  /// Fail with [`Error::Forbidden`] unless the actor is `owner_id`.
  pub fn require_owner(&self, owner_id: Uuid, action: &str) -> Result<()> {
    if self.id == owner_id {
      Ok(())
    } else {
      Err(Error::Forbidden(format!("only the owner may {action}")))
    }
  }
}
