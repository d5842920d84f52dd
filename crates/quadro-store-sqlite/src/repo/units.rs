//! Organizational units.

use rusqlite::{Connection, params};

use quadro_core::{
  Entity,
  page::{Page, PageRequest},
  unit::{NewUnit, Unit, UnitPatch},
};

use super::{find, is_taken, load, paginate};
use crate::{
  Result,
  encode::{self, UNIT_COLUMNS},
  guard::invalid,
};

fn ensure_acronym_free(conn: &Connection, acronym: &str, except: Option<i64>) -> Result<()> {
  if is_taken(conn, Entity::Unit, "unid_sigla", acronym, except)? {
    return Err(invalid("unid_sigla", "the acronym has already been taken"));
  }
  Ok(())
}

pub fn create(conn: &Connection, input: NewUnit) -> Result<Unit> {
  ensure_acronym_free(conn, &input.acronym, None)?;
  conn.execute(
    "INSERT INTO unidades (unid_nome, unid_sigla) VALUES (?1, ?2)",
    params![input.name, input.acronym],
  )?;
  let unit = Unit { id: conn.last_insert_rowid(), name: input.name, acronym: input.acronym };
  tracing::info!(unid_id = unit.id, sigla = %unit.acronym, "unit created");
  Ok(unit)
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Unit>> {
  find(conn, Entity::Unit, id, UNIT_COLUMNS, encode::unit)
}

pub fn update(conn: &Connection, id: i64, patch: UnitPatch) -> Result<Unit> {
  let mut unit = load(conn, Entity::Unit, id, UNIT_COLUMNS, encode::unit)?;
  if let Some(acronym) = &patch.acronym {
    ensure_acronym_free(conn, acronym, Some(id))?;
  }
  patch.apply(&mut unit);
  conn.execute(
    "UPDATE unidades SET unid_nome = ?1, unid_sigla = ?2 WHERE unid_id = ?3",
    params![unit.name, unit.acronym, id],
  )?;
  tracing::info!(unid_id = id, "unit updated");
  Ok(unit)
}

pub fn list(conn: &Connection, request: PageRequest) -> Result<Page<Unit>> {
  paginate(conn, "unidades", UNIT_COLUMNS, "unid_id", request, encode::unit)
}
