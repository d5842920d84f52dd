//! Synchronous SQL for each entity.
//!
//! Functions here take a borrowed [`Connection`] (in practice the open
//! [`Transaction`](rusqlite::Transaction) of the calling store method) and
//! never commit on their own.

use rusqlite::{Connection, OptionalExtension as _, Row, params};

use quadro_core::{
  Entity,
  dependency::DependencyChecker as _,
  page::{Page, PageRequest},
};

use crate::{Result, guard::{Guard, table}};

pub mod people;
pub mod places;
pub mod postings;
pub mod servants;
pub mod units;

/// One row of `entity` by primary key.
pub fn find<T>(
  conn: &Connection,
  entity: Entity,
  id: i64,
  columns: &str,
  map: impl FnOnce(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Option<T>> {
  let (table, key) = table(entity);
  let sql = format!("SELECT {columns} FROM {table} WHERE {key} = ?1");
  Ok(conn.query_row(&sql, [id], map).optional()?)
}

/// Like [`find`] but a missing row is `NotFound`.
pub fn load<T>(
  conn: &Connection,
  entity: Entity,
  id: i64,
  columns: &str,
  map: impl FnOnce(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<T> {
  find(conn, entity, id, columns, map)?
    .ok_or_else(|| quadro_core::Error::not_found(entity, id).into())
}

/// One page of `from` ordered by `order_by`. `from` may be a join.
pub fn paginate<T>(
  conn: &Connection,
  from: &str,
  columns: &str,
  order_by: &str,
  request: PageRequest,
  map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Page<T>> {
  let total: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {from}"), [], |r| r.get(0))?;
  let mut stmt = conn.prepare(&format!(
    "SELECT {columns} FROM {from} ORDER BY {order_by} LIMIT ?1 OFFSET ?2"
  ))?;
  let data = stmt
    .query_map([request.limit(), request.offset()], map)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(Page::new(data, request, u64::try_from(total).unwrap_or_default()))
}

/// Whether `value` is already used in `table.column` by a row other than
/// `except`.
pub fn is_taken(
  conn: &Connection,
  entity: Entity,
  column: &str,
  value: &str,
  except: Option<i64>,
) -> Result<bool> {
  let (table, key) = table(entity);
  let sql = format!("SELECT 1 FROM {table} WHERE {column} = ?1 AND {key} IS NOT ?2 LIMIT 1");
  Ok(conn.query_row(&sql, params![value, except], |_| Ok(())).optional()?.is_some())
}

/// Guarded delete: `NotFound`, `Conflict` on the first blocking dependent,
/// otherwise the row is removed.
pub fn delete(conn: &Connection, entity: Entity, id: i64) -> Result<()> {
  if let Err(e) = Guard(conn).ensure_deletable(entity, id) {
    tracing::debug!(%entity, id, error = %e, "delete refused");
    return Err(e);
  }
  let (table, key) = table(entity);
  conn.execute(&format!("DELETE FROM {table} WHERE {key} = ?1"), [id])?;
  tracing::info!(%entity, id, "deleted");
  Ok(())
}
