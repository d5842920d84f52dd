//! Handlers for `/cidades` endpoints.

use axum::{
  extract::State,
  response::Response,
};
use quadro_core::{
  Entity,
  address::{CityPatch, NewCity},
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
    .list_cities(params.request())
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::page(page, "cities"))
}

pub async fn create<S: Registry>(
  State(state): State<AppState<S>>,
  Valid(input): Valid<NewCity>,
) -> Result<Response, ApiError> {
  let city = state.store.create_city(input).await.map_err(|e| state.fail(e))?;
  Ok(envelope::created(city, "city created"))
}

pub async fn get_one<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  let city = state
    .store
    .get_city(id)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(|| ApiError::not_found(Entity::City, id))?;
  Ok(envelope::ok(city))
}

pub async fn update<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<CityPatch>,
) -> Result<Response, ApiError> {
  let city = state.store.update_city(id, patch).await.map_err(|e| state.fail(e))?;
  Ok(envelope::ok(city))
}

/// 400 while any address still points at the city.
pub async fn delete<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  state.store.delete_city(id).await.map_err(|e| state.fail(e))?;
  Ok(envelope::done("city deleted"))
}
