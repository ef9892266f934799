//! HTTP Basic-auth identity extractor and standalone verifier.
//!
//! A request's credentials resolve to an [`Actor`] by looking the username up
//! in the configured account list and checking the password against its
//! argon2 hash. Any failure is [`Error::Unauthenticated`].

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use hirely_core::{
  Error,
  actor::{Actor, Role},
  store::MarketStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// One login. Deserialised from the server's `accounts` table.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
  pub username:      String,
  pub id:            Uuid,
  pub role:          Role,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Credentials accepted as valid for this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  accounts: Vec<Account>,
}

impl AuthConfig {
  pub fn new(accounts: Vec<Account>) -> Self { Self { accounts } }

  fn find(&self, username: &str) -> Option<&Account> {
    self.accounts.iter().find(|a| a.username == username)
  }
}

/// Present in a handler's arguments means the request was authenticated.
pub struct Authenticated(pub Actor);

/// Resolve the `Authorization` header into an [`Actor`].
pub fn verify_auth(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<Actor, Error> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthenticated)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthenticated)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthenticated)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthenticated)?;

  let (username, password) =
    creds.split_once(':').ok_or(Error::Unauthenticated)?;

  let account = config.find(username).ok_or_else(|| {
    tracing::debug!(username, "unknown account");
    Error::Unauthenticated
  })?;

  let parsed_hash = PasswordHash::new(&account.password_hash)
    .map_err(|_| Error::Unauthenticated)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| {
      tracing::debug!(username, "password mismatch");
      Error::Unauthenticated
    })?;

  Ok(Actor::new(account.id, account.role))
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: MarketStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let actor = verify_auth(&parts.headers, &state.auth)?;
    Ok(Authenticated(actor))
  }
}
