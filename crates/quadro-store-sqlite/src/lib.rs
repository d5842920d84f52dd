//! SQLite implementation of [`quadro_core::store::Registry`].
//!
//! SQL runs on the [`tokio_rusqlite`] connection thread. Each store method is
//! one closure on that thread and each write is one transaction, so writes
//! never interleave.

mod encode;
mod guard;
mod repo;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
