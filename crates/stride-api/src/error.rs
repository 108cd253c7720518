//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stride_core::{CompileError, error::BoxError};
use thiserror::Error;

/// An error returned by an API handler.
///
/// Rendered as `{"detail": "<message>"}` with the matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error("Failed to fetch compiled logs: {0}")]
  Store(#[source] BoxError),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Compile(e) if e.is_not_found() => StatusCode::NOT_FOUND,
      ApiError::Compile(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
  }
}
