//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use quadro_core::{Entity, ValidationErrors};
use thiserror::Error;

use crate::envelope::Envelope;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  /// A domain rule refused the operation.
  #[error("{0}")]
  Conflict(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  /// `expose` controls whether the detail reaches the client; it is always
  /// logged.
  #[error("internal error: {source}")]
  Internal {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
    expose: bool,
  },
}

impl ApiError {
  pub fn not_found(entity: Entity, id: i64) -> Self { Self::NotFound(format!("{entity} {id} not found")) }

  /// Classify a core error. `expose` is the server's debug flag.
  pub fn from_core(err: quadro_core::Error, expose: bool) -> Self {
    match err {
      quadro_core::Error::NotFound { .. } => Self::NotFound(err.to_string()),
      quadro_core::Error::Conflict(message) => Self::Conflict(message),
      quadro_core::Error::Validation(errors) => Self::Validation(errors),
      quadro_core::Error::Internal(source) => Self::Internal { source, expose },
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Conflict(_) => StatusCode::BAD_REQUEST,
      Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// Bodies that fail to parse are reported like any other invalid field.
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::Validation(ValidationErrors::single("body", rejection.body_text()))
  }
}

/// A path segment that does not parse, such as `/pessoas/abc`.
impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self {
    Self::Validation(ValidationErrors::single("path", rejection.body_text()))
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    Self::Validation(ValidationErrors::single("query", rejection.body_text()))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match self {
      ApiError::NotFound(message) | ApiError::Conflict(message) => Envelope::failure(message),
      ApiError::Validation(errors) => Envelope {
        errors: Some(errors),
        ..Envelope::failure("the given data was invalid")
      },
      ApiError::Internal { source, expose } => {
        tracing::error!(error = %source, "request failed");
        Envelope {
          error: expose.then(|| source.to_string()),
          ..Envelope::failure("internal server error")
        }
      }
    };
    (status, body).into_response()
  }
}
