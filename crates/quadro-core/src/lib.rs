//! Domain model of the Quadro personnel registry.
//!
//! Records, their input and patch types, field validation, pagination, the
//! error taxonomy and the [`store::Registry`] trait. Nothing here knows about
//! HTTP or SQL.

pub mod address;
pub mod dependency;
pub mod entity;
pub mod error;
pub mod page;
pub mod patch;
pub mod person;
pub mod posting;
pub mod servant;
pub mod store;
pub mod unit;
pub mod validate;

pub use entity::Entity;
pub use error::{Error, Result};
pub use validate::{Validate, ValidationErrors};
