//! Guarded deletion.
//!
//! Every deletable [`Entity`] declares the kinds of dependent rows that block
//! its removal. Storage backends implement [`DependencyChecker`] by answering
//! two questions (does the row exist, does it have a given dependent) and
//! inherit the full check from [`DependencyChecker::ensure_deletable`].

use strum::Display;

use crate::{Error, entity::Entity};

/// Kinds of rows that can hold on to another row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Dependent {
  #[strum(serialize = "photos")]
  Photos,
  #[strum(serialize = "postings")]
  Postings,
  /// Postings without a removal date.
  #[strum(serialize = "active postings")]
  ActivePostings,
  #[strum(serialize = "temporary servant record")]
  TemporaryServant,
  #[strum(serialize = "permanent servant record")]
  PermanentServant,
  #[strum(serialize = "addresses")]
  Addresses,
  #[strum(serialize = "units")]
  Units,
  #[strum(serialize = "people")]
  People,
}

impl Entity {
  /// The dependents that block deleting a row of this kind, in the order
  /// they are checked.
  pub fn dependents(self) -> &'static [Dependent] {
    use Dependent::*;
    match self {
      Entity::Person => &[Photos, Postings, TemporaryServant, PermanentServant, Addresses],
      Entity::Address => &[Units, People],
      Entity::City => &[Addresses],
      Entity::Unit => &[Addresses, Postings],
      Entity::PermanentServant | Entity::TemporaryServant => &[ActivePostings],
      Entity::Posting | Entity::Photo => &[],
    }
  }
}

/// Answers existence and dependency questions for guarded deletes.
///
/// Implementations are synchronous so they can run inside a backend's
/// transaction.
pub trait DependencyChecker {
  type Error: From<Error>;

  /// Whether the row `id` of kind `entity` exists.
  fn exists(&self, entity: Entity, id: i64) -> Result<bool, Self::Error>;

  /// Whether the row has at least one dependent of kind `dependent`.
  fn has_dependent(
    &self,
    entity: Entity,
    id: i64,
    dependent: Dependent,
  ) -> Result<bool, Self::Error>;

  /// `NotFound` if the row is missing, `Conflict` naming the first blocking
  /// dependent, `Ok(())` if the row may be deleted.
  fn ensure_deletable(&self, entity: Entity, id: i64) -> Result<(), Self::Error> {
    if !self.exists(entity, id)? {
      return Err(Error::not_found(entity, id).into());
    }
    for &dependent in entity.dependents() {
      if self.has_dependent(entity, id, dependent)? {
        return Err(
          Error::conflict(format!(
            "cannot delete {entity} {id}: {dependent} still associated"
          ))
          .into(),
        );
      }
    }
    Ok(())
  }
}
