//! Error types for `quadro-core`.
//!
//! Every failure a caller can observe falls into one of four classes; the
//! HTTP layer maps each class to one status code.

use thiserror::Error;

use crate::{entity::Entity, validate::ValidationErrors};

#[derive(Debug, Error)]
pub enum Error {
  #[error("{entity} {id} not found")]
  NotFound { entity: Entity, id: i64 },

  /// A domain rule blocks the operation: dependents exist, or a servant
  /// invariant would be broken.
  #[error("{0}")]
  Conflict(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(entity: Entity, id: i64) -> Self { Self::NotFound { entity, id } }

  pub fn conflict(message: impl Into<String>) -> Self { Self::Conflict(message.into()) }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
