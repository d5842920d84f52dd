//! Cities and addresses.

use rusqlite::{Connection, params};

use quadro_core::{
  Entity,
  address::{Address, AddressPatch, City, CityPatch, NewAddress, NewCity},
  page::{Page, PageRequest},
};

use super::{find, load, paginate};
use crate::{
  Result,
  encode::{self, ADDRESS_COLUMNS, CITY_COLUMNS},
  guard::Guard,
};

// ─── Cities ──────────────────────────────────────────────────────────────────

pub fn create_city(conn: &Connection, input: NewCity) -> Result<City> {
  conn.execute(
    "INSERT INTO cidades (cid_nome, cid_uf) VALUES (?1, ?2)",
    params![input.name, input.state],
  )?;
  let city = City { id: conn.last_insert_rowid(), name: input.name, state: input.state };
  tracing::info!(cid_id = city.id, "city created");
  Ok(city)
}

pub fn get_city(conn: &Connection, id: i64) -> Result<Option<City>> {
  find(conn, Entity::City, id, CITY_COLUMNS, encode::city)
}

pub fn update_city(conn: &Connection, id: i64, patch: CityPatch) -> Result<City> {
  let mut city = load(conn, Entity::City, id, CITY_COLUMNS, encode::city)?;
  patch.apply(&mut city);
  conn.execute(
    "UPDATE cidades SET cid_nome = ?1, cid_uf = ?2 WHERE cid_id = ?3",
    params![city.name, city.state, id],
  )?;
  tracing::info!(cid_id = id, "city updated");
  Ok(city)
}

pub fn list_cities(conn: &Connection, request: PageRequest) -> Result<Page<City>> {
  paginate(conn, "cidades", CITY_COLUMNS, "cid_id", request, encode::city)
}

// ─── Addresses ───────────────────────────────────────────────────────────────

/// Insert an address; the city is checked as a field of the payload.
pub fn create_address(conn: &Connection, input: NewAddress) -> Result<Address> {
  Guard(conn).require_ref(Entity::City, input.city_id, "cid_id")?;
  conn.execute(
    "INSERT INTO enderecos (
       cid_id, end_tipo_logradouro, end_logradouro, end_numero, end_complemento, end_bairro
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      input.city_id,
      input.street_type,
      input.street,
      input.number,
      input.complement,
      input.neighborhood,
    ],
  )?;
  let address = Address {
    id:           conn.last_insert_rowid(),
    city_id:      input.city_id,
    street_type:  input.street_type,
    street:       input.street,
    number:       input.number,
    complement:   input.complement,
    neighborhood: input.neighborhood,
  };
  tracing::info!(end_id = address.id, "address created");
  Ok(address)
}

pub fn get_address(conn: &Connection, id: i64) -> Result<Option<Address>> {
  find(conn, Entity::Address, id, ADDRESS_COLUMNS, encode::address)
}

pub fn update_address(conn: &Connection, id: i64, patch: AddressPatch) -> Result<Address> {
  let mut address = load(conn, Entity::Address, id, ADDRESS_COLUMNS, encode::address)?;
  if let Some(city_id) = patch.city_id {
    Guard(conn).require_ref(Entity::City, city_id, "cid_id")?;
  }
  patch.apply(&mut address);
  conn.execute(
    "UPDATE enderecos SET
       cid_id = ?1, end_tipo_logradouro = ?2, end_logradouro = ?3,
       end_numero = ?4, end_complemento = ?5, end_bairro = ?6
     WHERE end_id = ?7",
    params![
      address.city_id,
      address.street_type,
      address.street,
      address.number,
      address.complement,
      address.neighborhood,
      id,
    ],
  )?;
  tracing::info!(end_id = id, "address updated");
  Ok(address)
}

pub fn list_addresses(conn: &Connection, request: PageRequest) -> Result<Page<Address>> {
  paginate(conn, "enderecos", ADDRESS_COLUMNS, "end_id", request, encode::address)
}

/// Addresses linked through a join table, e.g. `pessoas_enderecos` keyed by
/// `pes_id`.
pub fn linked_addresses(
  conn: &Connection,
  join_table: &str,
  owner_key: &str,
  owner_id: i64,
) -> Result<Vec<Address>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {ADDRESS_COLUMNS} FROM enderecos JOIN {join_table} USING (end_id)
     WHERE {owner_key} = ?1 ORDER BY end_id"
  ))?;
  let rows = stmt
    .query_map([owner_id], encode::address)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Link `address_id` to its owner. Both rows must exist; an existing link is
/// left as is.
pub fn attach(
  conn: &Connection,
  owner: Entity,
  join_table: &str,
  owner_key: &str,
  owner_id: i64,
  address_id: i64,
) -> Result<()> {
  let guard = Guard(conn);
  guard.require(owner, owner_id)?;
  guard.require(Entity::Address, address_id)?;
  let added = conn.execute(
    &format!("INSERT OR IGNORE INTO {join_table} ({owner_key}, end_id) VALUES (?1, ?2)"),
    [owner_id, address_id],
  )?;
  tracing::info!(%owner, owner_id, end_id = address_id, added = added > 0, "address attached");
  Ok(())
}

pub fn detach(
  conn: &Connection,
  owner: Entity,
  join_table: &str,
  owner_key: &str,
  owner_id: i64,
  address_id: i64,
) -> Result<()> {
  let guard = Guard(conn);
  guard.require(owner, owner_id)?;
  guard.require(Entity::Address, address_id)?;
  let removed = conn.execute(
    &format!("DELETE FROM {join_table} WHERE {owner_key} = ?1 AND end_id = ?2"),
    [owner_id, address_id],
  )?;
  tracing::info!(%owner, owner_id, end_id = address_id, removed = removed > 0, "address detached");
  Ok(())
}
