//! [`SqliteStore`]: the SQLite implementation of [`Registry`].

use std::path::Path;

use rusqlite::Connection;

use quadro_core::{
  Entity,
  address::{Address, AddressPatch, City, CityPatch, NewAddress, NewCity},
  page::{Page, PageRequest},
  person::{NewPerson, NewPhoto, Person, PersonDetail, PersonPatch, Photo},
  posting::{NewPosting, Posting, PostingPatch},
  servant::{
    PermanentOnboarded, PermanentOnboarding, PermanentServantDetail, PermanentServantPatch,
    TemporaryOnboarded, TemporaryOnboarding, TemporaryServantDetail, TemporaryServantPatch,
  },
  store::Registry,
  unit::{NewUnit, Unit, UnitPatch},
};

use crate::{
  Error, Result,
  repo::{self, people, places, postings, servants, units},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Quadro registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection handle is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open or create the database file at `path` and apply [`SCHEMA`].
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// A private in-memory database; used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `op` inside a transaction. The transaction commits only if `op`
  /// succeeds; on error it is dropped, which rolls it back.
  pub(crate) async fn write<T, F>(&self, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match op(&tx) {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          Err(e) => Ok(Err(e)),
        }
      })
      .await?
  }

  /// Run a read-only `op` on the connection.
  pub(crate) async fn read<T, F>(&self, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(op(conn))).await?
  }
}

// ─── Registry impl ───────────────────────────────────────────────────────────

impl Registry for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    self.write(move |conn| people::create(conn, input)).await
  }

  async fn get_person(&self, id: i64) -> Result<Option<PersonDetail>> {
    self.read(move |conn| people::get(conn, id)).await
  }

  async fn update_person(&self, id: i64, patch: PersonPatch) -> Result<Person> {
    self.write(move |conn| people::update(conn, id, patch)).await
  }

  async fn delete_person(&self, id: i64) -> Result<()> {
    self.write(move |conn| repo::delete(conn, Entity::Person, id)).await
  }

  async fn list_people(&self, page: PageRequest) -> Result<Page<PersonDetail>> {
    self.read(move |conn| people::list(conn, page)).await
  }

  async fn attach_person_address(&self, person_id: i64, address_id: i64) -> Result<()> {
    self
      .write(move |conn| {
        places::attach(conn, Entity::Person, "pessoas_enderecos", "pes_id", person_id, address_id)
      })
      .await
  }

  async fn detach_person_address(&self, person_id: i64, address_id: i64) -> Result<()> {
    self
      .write(move |conn| {
        places::detach(conn, Entity::Person, "pessoas_enderecos", "pes_id", person_id, address_id)
      })
      .await
  }

  // ── Photos ────────────────────────────────────────────────────────────────

  async fn add_photo(&self, person_id: i64, input: NewPhoto) -> Result<Photo> {
    self.write(move |conn| people::add_photo(conn, person_id, input)).await
  }

  async fn list_photos(&self, person_id: i64) -> Result<Vec<Photo>> {
    self.read(move |conn| people::list_photos(conn, person_id)).await
  }

  async fn delete_photo(&self, id: i64) -> Result<()> {
    self.write(move |conn| repo::delete(conn, Entity::Photo, id)).await
  }

  // ── Cities ────────────────────────────────────────────────────────────────

  async fn create_city(&self, input: NewCity) -> Result<City> {
    self.write(move |conn| places::create_city(conn, input)).await
  }

  async fn get_city(&self, id: i64) -> Result<Option<City>> {
    self.read(move |conn| places::get_city(conn, id)).await
  }

  async fn update_city(&self, id: i64, patch: CityPatch) -> Result<City> {
    self.write(move |conn| places::update_city(conn, id, patch)).await
  }

  async fn delete_city(&self, id: i64) -> Result<()> {
    self.write(move |conn| repo::delete(conn, Entity::City, id)).await
  }

  async fn list_cities(&self, page: PageRequest) -> Result<Page<City>> {
    self.read(move |conn| places::list_cities(conn, page)).await
  }

  // ── Addresses ─────────────────────────────────────────────────────────────

  async fn create_address(&self, input: NewAddress) -> Result<Address> {
    self.write(move |conn| places::create_address(conn, input)).await
  }

  async fn get_address(&self, id: i64) -> Result<Option<Address>> {
    self.read(move |conn| places::get_address(conn, id)).await
  }

  async fn update_address(&self, id: i64, patch: AddressPatch) -> Result<Address> {
    self.write(move |conn| places::update_address(conn, id, patch)).await
  }

  async fn delete_address(&self, id: i64) -> Result<()> {
    self.write(move |conn| repo::delete(conn, Entity::Address, id)).await
  }

  async fn list_addresses(&self, page: PageRequest) -> Result<Page<Address>> {
    self.read(move |conn| places::list_addresses(conn, page)).await
  }

  // ── Units ─────────────────────────────────────────────────────────────────

  async fn create_unit(&self, input: NewUnit) -> Result<Unit> {
    self.write(move |conn| units::create(conn, input)).await
  }

  async fn get_unit(&self, id: i64) -> Result<Option<Unit>> {
    self.read(move |conn| units::get(conn, id)).await
  }

  async fn update_unit(&self, id: i64, patch: UnitPatch) -> Result<Unit> {
    self.write(move |conn| units::update(conn, id, patch)).await
  }

  async fn delete_unit(&self, id: i64) -> Result<()> {
    self.write(move |conn| repo::delete(conn, Entity::Unit, id)).await
  }

  async fn list_units(&self, page: PageRequest) -> Result<Page<Unit>> {
    self.read(move |conn| units::list(conn, page)).await
  }

  async fn attach_unit_address(&self, unit_id: i64, address_id: i64) -> Result<()> {
    self
      .write(move |conn| {
        places::attach(conn, Entity::Unit, "unidades_enderecos", "unid_id", unit_id, address_id)
      })
      .await
  }

  async fn detach_unit_address(&self, unit_id: i64, address_id: i64) -> Result<()> {
    self
      .write(move |conn| {
        places::detach(conn, Entity::Unit, "unidades_enderecos", "unid_id", unit_id, address_id)
      })
      .await
  }

  // ── Postings ──────────────────────────────────────────────────────────────

  async fn create_posting(&self, input: NewPosting) -> Result<Posting> {
    self.write(move |conn| postings::create(conn, input)).await
  }

  async fn get_posting(&self, id: i64) -> Result<Option<Posting>> {
    self.read(move |conn| postings::get(conn, id)).await
  }

  async fn update_posting(&self, id: i64, patch: PostingPatch) -> Result<Posting> {
    self.write(move |conn| postings::update(conn, id, patch)).await
  }

  async fn delete_posting(&self, id: i64) -> Result<()> {
    self.write(move |conn| repo::delete(conn, Entity::Posting, id)).await
  }

  async fn list_postings(&self, page: PageRequest) -> Result<Page<Posting>> {
    self.read(move |conn| postings::list(conn, page)).await
  }

  // ── Permanent servants ────────────────────────────────────────────────────

  async fn onboard_permanent(&self, input: PermanentOnboarding) -> Result<PermanentOnboarded> {
    self.write(move |conn| servants::onboard_permanent(conn, input)).await
  }

  async fn get_permanent(&self, person_id: i64) -> Result<Option<PermanentServantDetail>> {
    self.read(move |conn| servants::get_permanent(conn, person_id)).await
  }

  async fn update_permanent(
    &self,
    person_id: i64,
    patch: PermanentServantPatch,
  ) -> Result<PermanentServantDetail> {
    self.write(move |conn| servants::update_permanent(conn, person_id, patch)).await
  }

  async fn delete_permanent(&self, person_id: i64) -> Result<()> {
    self
      .write(move |conn| repo::delete(conn, Entity::PermanentServant, person_id))
      .await
  }

  async fn list_permanent(&self, page: PageRequest) -> Result<Page<PermanentServantDetail>> {
    self.read(move |conn| servants::list_permanent(conn, page)).await
  }

  // ── Temporary servants ────────────────────────────────────────────────────

  async fn onboard_temporary(&self, input: TemporaryOnboarding) -> Result<TemporaryOnboarded> {
    self.write(move |conn| servants::onboard_temporary(conn, input)).await
  }

  async fn get_temporary(&self, person_id: i64) -> Result<Option<TemporaryServantDetail>> {
    self.read(move |conn| servants::get_temporary(conn, person_id)).await
  }

  async fn update_temporary(
    &self,
    person_id: i64,
    patch: TemporaryServantPatch,
  ) -> Result<TemporaryServantDetail> {
    self.write(move |conn| servants::update_temporary(conn, person_id, patch)).await
  }

  async fn delete_temporary(&self, person_id: i64) -> Result<()> {
    self
      .write(move |conn| repo::delete(conn, Entity::TemporaryServant, person_id))
      .await
  }

  async fn list_temporary(&self, page: PageRequest) -> Result<Page<TemporaryServantDetail>> {
    self.read(move |conn| servants::list_temporary(conn, page)).await
  }
}
