//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use hirely_core::Error;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler: a core error on its way to HTTP.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match &self.0 {
      Error::Unauthenticated => StatusCode::UNAUTHORIZED,
      Error::Forbidden(_) => StatusCode::FORBIDDEN,
      Error::NotFound { .. } => StatusCode::NOT_FOUND,
      Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
      Error::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Error::Conflict(_) => StatusCode::CONFLICT,
      Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self.0, "request failed");
    }

    let mut res =
      (status, Json(json!({ "error": self.0.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"hirely\""),
      );
    }
    res
  }
}
