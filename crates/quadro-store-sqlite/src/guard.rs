//! Existence and dependency checks, run on the connection (or transaction)
//! performing the write.

use rusqlite::{Connection, OptionalExtension as _};

use quadro_core::{
  Entity, ValidationErrors,
  dependency::{Dependent, DependencyChecker},
};

use crate::{Error, Result};

/// Table and primary-key column holding each entity.
pub fn table(entity: Entity) -> (&'static str, &'static str) {
  match entity {
    Entity::Person => ("pessoas", "pes_id"),
    Entity::Address => ("enderecos", "end_id"),
    Entity::City => ("cidades", "cid_id"),
    Entity::Unit => ("unidades", "unid_id"),
    Entity::Posting => ("lotacoes", "lot_id"),
    Entity::PermanentServant => ("servidores_efetivos", "pes_id"),
    Entity::TemporaryServant => ("servidores_temporarios", "pes_id"),
    Entity::Photo => ("fotos_pessoas", "ft_id"),
  }
}

/// `SELECT 1` probe answering whether `entity` row `id` has the dependent.
/// `None` means the pair is never a blocker.
fn dependent_query(entity: Entity, dependent: Dependent) -> Option<&'static str> {
  use Dependent as D;
  use Entity as E;
  Some(match (entity, dependent) {
    (E::Person, D::Photos) => "SELECT 1 FROM fotos_pessoas WHERE pes_id = ?1 LIMIT 1",
    (E::Person, D::Postings) => "SELECT 1 FROM lotacoes WHERE pes_id = ?1 LIMIT 1",
    (E::Person, D::TemporaryServant) => {
      "SELECT 1 FROM servidores_temporarios WHERE pes_id = ?1 LIMIT 1"
    }
    (E::Person, D::PermanentServant) => {
      "SELECT 1 FROM servidores_efetivos WHERE pes_id = ?1 LIMIT 1"
    }
    (E::Person, D::Addresses) => "SELECT 1 FROM pessoas_enderecos WHERE pes_id = ?1 LIMIT 1",
    (E::Address, D::Units) => "SELECT 1 FROM unidades_enderecos WHERE end_id = ?1 LIMIT 1",
    (E::Address, D::People) => "SELECT 1 FROM pessoas_enderecos WHERE end_id = ?1 LIMIT 1",
    (E::City, D::Addresses) => "SELECT 1 FROM enderecos WHERE cid_id = ?1 LIMIT 1",
    (E::Unit, D::Addresses) => "SELECT 1 FROM unidades_enderecos WHERE unid_id = ?1 LIMIT 1",
    (E::Unit, D::Postings) => "SELECT 1 FROM lotacoes WHERE unid_id = ?1 LIMIT 1",
    (E::PermanentServant | E::TemporaryServant, D::ActivePostings) => {
      "SELECT 1 FROM lotacoes WHERE pes_id = ?1 AND lot_data_remocao IS NULL LIMIT 1"
    }
    _ => return None,
  })
}

/// Borrowed connection implementing [`DependencyChecker`].
pub struct Guard<'c>(pub &'c Connection);

impl Guard<'_> {
  fn probe(&self, sql: &str, id: i64) -> Result<bool> {
    Ok(self.0.query_row(sql, [id], |_| Ok(())).optional()?.is_some())
  }

  /// `NotFound` unless the row exists.
  pub fn require(&self, entity: Entity, id: i64) -> Result<()> {
    if self.exists(entity, id)? {
      Ok(())
    } else {
      Err(quadro_core::Error::not_found(entity, id).into())
    }
  }

  /// A reference carried in a request body: a missing target is a field
  /// error on `field`, not a missing resource.
  pub fn require_ref(&self, entity: Entity, id: i64, field: &str) -> Result<()> {
    if self.exists(entity, id)? {
      Ok(())
    } else {
      Err(invalid(field, format!("the selected {entity} does not exist")))
    }
  }
}

impl DependencyChecker for Guard<'_> {
  type Error = Error;

  fn exists(&self, entity: Entity, id: i64) -> Result<bool> {
    let (table, key) = table(entity);
    self.probe(&format!("SELECT 1 FROM {table} WHERE {key} = ?1"), id)
  }

  fn has_dependent(&self, entity: Entity, id: i64, dependent: Dependent) -> Result<bool> {
    match dependent_query(entity, dependent) {
      Some(sql) => self.probe(sql, id),
      None => Ok(false),
    }
  }
}

/// A single-field validation failure.
pub fn invalid(field: &str, message: impl Into<String>) -> Error {
  quadro_core::Error::from(ValidationErrors::single(field, message)).into()
}
