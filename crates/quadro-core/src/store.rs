//! The `Registry` trait: everything the HTTP layer needs from a backend.
//!
//! `quadro-api` is written against this trait; `quadro-store-sqlite`
//! provides the implementation. Each write is atomic, so either all of its
//! rows are persisted or none are. Deletes follow the
//! [`DependencyChecker`](crate::dependency::DependencyChecker) rules.

use std::future::Future;

use crate::{
  address::{Address, AddressPatch, City, CityPatch, NewAddress, NewCity},
  page::{Page, PageRequest},
  person::{NewPerson, NewPhoto, Person, PersonDetail, PersonPatch, Photo},
  posting::{NewPosting, Posting, PostingPatch},
  servant::{
    PermanentOnboarded, PermanentOnboarding, PermanentServantDetail,
    PermanentServantPatch, TemporaryOnboarded, TemporaryOnboarding,
    TemporaryServantDetail, TemporaryServantPatch,
  },
  unit::{NewUnit, Unit, UnitPatch},
};

/// Abstraction over a registry backend.
///
/// `get_*` methods return `None` for a missing id; `update_*`, `delete_*`
/// and link methods fail with [`Error::NotFound`](crate::Error::NotFound)
/// instead. Errors convert into the core taxonomy so callers can classify
/// them.
///
/// Futures are `Send` so handlers can run on a multi-threaded runtime.
pub trait Registry: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  // ── People ────────────────────────────────────────────────────────────

  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// A person with addresses and postings loaded.
  fn get_person(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PersonDetail>, Self::Error>> + Send + '_;

  fn update_person(
    &self,
    id: i64,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Refused while photos, postings, servant records or addresses exist.
  fn delete_person(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_people(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<PersonDetail>, Self::Error>> + Send + '_;

  /// Link an address to a person. Linking twice is a no-op.
  fn attach_person_address(
    &self,
    person_id: i64,
    address_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn detach_person_address(
    &self,
    person_id: i64,
    address_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Photos ────────────────────────────────────────────────────────────

  fn add_photo(
    &self,
    person_id: i64,
    input: NewPhoto,
  ) -> impl Future<Output = Result<Photo, Self::Error>> + Send + '_;

  /// Fails with `NotFound` if the person does not exist.
  fn list_photos(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Vec<Photo>, Self::Error>> + Send + '_;

  fn delete_photo(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Cities ────────────────────────────────────────────────────────────

  fn create_city(
    &self,
    input: NewCity,
  ) -> impl Future<Output = Result<City, Self::Error>> + Send + '_;

  fn get_city(&self, id: i64) -> impl Future<Output = Result<Option<City>, Self::Error>> + Send + '_;

  fn update_city(
    &self,
    id: i64,
    patch: CityPatch,
  ) -> impl Future<Output = Result<City, Self::Error>> + Send + '_;

  /// Refused while addresses reference the city.
  fn delete_city(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_cities(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<City>, Self::Error>> + Send + '_;

  // ── Addresses ─────────────────────────────────────────────────────────

  /// The referenced city must exist.
  fn create_address(
    &self,
    input: NewAddress,
  ) -> impl Future<Output = Result<Address, Self::Error>> + Send + '_;

  fn get_address(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Address>, Self::Error>> + Send + '_;

  fn update_address(
    &self,
    id: i64,
    patch: AddressPatch,
  ) -> impl Future<Output = Result<Address, Self::Error>> + Send + '_;

  /// Refused while units or people are linked to the address.
  fn delete_address(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_addresses(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Address>, Self::Error>> + Send + '_;

  // ── Units ─────────────────────────────────────────────────────────────

  /// The acronym must be unused.
  fn create_unit(
    &self,
    input: NewUnit,
  ) -> impl Future<Output = Result<Unit, Self::Error>> + Send + '_;

  fn get_unit(&self, id: i64) -> impl Future<Output = Result<Option<Unit>, Self::Error>> + Send + '_;

  fn update_unit(
    &self,
    id: i64,
    patch: UnitPatch,
  ) -> impl Future<Output = Result<Unit, Self::Error>> + Send + '_;

  /// Refused while addresses or postings are associated.
  fn delete_unit(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_units(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Unit>, Self::Error>> + Send + '_;

  fn attach_unit_address(
    &self,
    unit_id: i64,
    address_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn detach_unit_address(
    &self,
    unit_id: i64,
    address_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Postings ──────────────────────────────────────────────────────────

  /// Person and unit must exist; removal may not precede assignment.
  fn create_posting(
    &self,
    input: NewPosting,
  ) -> impl Future<Output = Result<Posting, Self::Error>> + Send + '_;

  fn get_posting(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Posting>, Self::Error>> + Send + '_;

  fn update_posting(
    &self,
    id: i64,
    patch: PostingPatch,
  ) -> impl Future<Output = Result<Posting, Self::Error>> + Send + '_;

  fn delete_posting(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_postings(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Posting>, Self::Error>> + Send + '_;

  // ── Permanent servants ────────────────────────────────────────────────

  /// Create (or load) the person, create and link the address, check the
  /// servant invariants and create the record, all in one transaction.
  fn onboard_permanent(
    &self,
    input: PermanentOnboarding,
  ) -> impl Future<Output = Result<PermanentOnboarded, Self::Error>> + Send + '_;

  fn get_permanent(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Option<PermanentServantDetail>, Self::Error>> + Send + '_;

  fn update_permanent(
    &self,
    person_id: i64,
    patch: PermanentServantPatch,
  ) -> impl Future<Output = Result<PermanentServantDetail, Self::Error>> + Send + '_;

  /// Refused while the person has active postings.
  fn delete_permanent(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_permanent(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<PermanentServantDetail>, Self::Error>> + Send + '_;

  // ── Temporary servants ────────────────────────────────────────────────

  fn onboard_temporary(
    &self,
    input: TemporaryOnboarding,
  ) -> impl Future<Output = Result<TemporaryOnboarded, Self::Error>> + Send + '_;

  fn get_temporary(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<Option<TemporaryServantDetail>, Self::Error>> + Send + '_;

  fn update_temporary(
    &self,
    person_id: i64,
    patch: TemporaryServantPatch,
  ) -> impl Future<Output = Result<TemporaryServantDetail, Self::Error>> + Send + '_;

  fn delete_temporary(
    &self,
    person_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_temporary(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<TemporaryServantDetail>, Self::Error>> + Send + '_;
}
