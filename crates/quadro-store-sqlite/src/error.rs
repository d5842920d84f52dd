//! Error type for `quadro-store-sqlite`.

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] quadro_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),
}

impl Error {
  fn sqlite(&self) -> Option<&rusqlite::Error> {
    match self {
      Self::Sqlite(e) | Self::Database(tokio_rusqlite::Error::Rusqlite(e)) => Some(e),
      _ => None,
    }
  }

  /// A UNIQUE, FOREIGN KEY or CHECK constraint rejected the write.
  pub fn is_constraint_violation(&self) -> bool {
    self
      .sqlite()
      .and_then(rusqlite::Error::sqlite_error_code)
      .is_some_and(|code| code == ErrorCode::ConstraintViolation)
  }
}

/// Domain errors pass through; constraint violations that slipped past the
/// pre-checks become conflicts; everything else is internal.
impl From<Error> for quadro_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      e if e.is_constraint_violation() => {
        quadro_core::Error::conflict(format!("constraint violated: {e}"))
      }
      e => quadro_core::Error::Internal(Box::new(e)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
