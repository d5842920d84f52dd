//! Handlers for `/enderecos` endpoints.
//!
//! Addresses are linked to people and units through the
//! `/pessoas/{id}/enderecos/{end_id}` and `/unidades/{id}/enderecos/{end_id}`
//! routes; an address with links cannot be deleted.

use axum::{
  extract::State,
  response::Response,
};
use quadro_core::{
  Entity,
  address::{AddressPatch, NewAddress},
  store::Registry,
};

use crate::{
  AppState,
  envelope,
  error::ApiError,
  extract::{PageParams, Path, Query, Valid},
};

pub async fn list<S: Registry>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
  let page = state
    .store
    .list_addresses(params.request())
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::page(page, "addresses"))
}

pub async fn create<S: Registry>(
  State(state): State<AppState<S>>,
  Valid(input): Valid<NewAddress>,
) -> Result<Response, ApiError> {
  let address = state.store.create_address(input).await.map_err(|e| state.fail(e))?;
  Ok(envelope::created(address, "address created"))
}

pub async fn get_one<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  let address = state
    .store
    .get_address(id)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(|| ApiError::not_found(Entity::Address, id))?;
  Ok(envelope::ok(address))
}

pub async fn update<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<AddressPatch>,
) -> Result<Response, ApiError> {
  let address = state
    .store
    .update_address(id, patch)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::ok(address))
}

pub async fn delete<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  state.store.delete_address(id).await.map_err(|e| state.fail(e))?;
  Ok(envelope::done("address deleted"))
}
