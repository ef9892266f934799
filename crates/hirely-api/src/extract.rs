//! Request extractors whose rejections surface as [`ApiError`].
//!
//! axum's own `Json`, `Query` and `Path` reject malformed input with a
//! plain-text body. These wrappers turn every such rejection into
//! [`Error::InvalidArgument`], so clients always get a `{"error": …}` body
//! and a 400.

use axum::extract::{
  FromRequest, FromRequestParts,
  rejection::{JsonRejection, PathRejection, QueryRejection},
};
use hirely_core::Error;

use crate::error::ApiError;

/// A JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query-string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self(Error::InvalidArgument(rejection.body_text()))
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self(Error::InvalidArgument(rejection.body_text()))
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self(Error::InvalidArgument(rejection.body_text()))
  }
}
