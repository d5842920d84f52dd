//! Postings of people to units.

use rusqlite::{Connection, params};

use quadro_core::{
  Entity,
  page::{Page, PageRequest},
  posting::{NewPosting, Posting, PostingPatch},
};

use super::{find, load, paginate};
use crate::{
  Result,
  encode::{self, POSTING_COLUMNS, encode_date, encode_opt_date},
  guard::Guard,
};

fn check_refs(conn: &Connection, person_id: i64, unit_id: i64) -> Result<()> {
  let guard = Guard(conn);
  guard.require_ref(Entity::Person, person_id, "pes_id")?;
  guard.require_ref(Entity::Unit, unit_id, "unid_id")?;
  Ok(())
}

pub fn create(conn: &Connection, input: NewPosting) -> Result<Posting> {
  check_refs(conn, input.person_id, input.unit_id)?;
  conn.execute(
    "INSERT INTO lotacoes (pes_id, unid_id, lot_data_lotacao, lot_data_remocao, lot_portaria)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      input.person_id,
      input.unit_id,
      encode_date(input.assigned_on),
      encode_opt_date(input.removed_on),
      input.order_ref,
    ],
  )?;
  let posting = Posting {
    id:          conn.last_insert_rowid(),
    person_id:   input.person_id,
    unit_id:     input.unit_id,
    assigned_on: input.assigned_on,
    removed_on:  input.removed_on,
    order_ref:   input.order_ref,
  };
  tracing::info!(lot_id = posting.id, pes_id = posting.person_id, unid_id = posting.unit_id, "posting created");
  Ok(posting)
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Posting>> {
  find(conn, Entity::Posting, id, POSTING_COLUMNS, encode::posting)
}

/// Merge the patch, then re-check references and dates on the result.
pub fn update(conn: &Connection, id: i64, patch: PostingPatch) -> Result<Posting> {
  let mut posting = load(conn, Entity::Posting, id, POSTING_COLUMNS, encode::posting)?;
  patch.apply(&mut posting);
  check_refs(conn, posting.person_id, posting.unit_id)?;
  posting.check_dates().map_err(quadro_core::Error::from)?;
  conn.execute(
    "UPDATE lotacoes SET
       pes_id = ?1, unid_id = ?2, lot_data_lotacao = ?3, lot_data_remocao = ?4, lot_portaria = ?5
     WHERE lot_id = ?6",
    params![
      posting.person_id,
      posting.unit_id,
      encode_date(posting.assigned_on),
      encode_opt_date(posting.removed_on),
      posting.order_ref,
      id,
    ],
  )?;
  tracing::info!(lot_id = id, "posting updated");
  Ok(posting)
}

pub fn list(conn: &Connection, request: PageRequest) -> Result<Page<Posting>> {
  paginate(conn, "lotacoes", POSTING_COLUMNS, "lot_id", request, encode::posting)
}

pub fn of_person(conn: &Connection, person_id: i64) -> Result<Vec<Posting>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {POSTING_COLUMNS} FROM lotacoes WHERE pes_id = ?1 ORDER BY lot_id"
  ))?;
  let rows = stmt
    .query_map([person_id], encode::posting)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}
