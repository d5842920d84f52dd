//! Handlers for `/unidades` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/unidades` | `?page=&per_page=` |
//! | `POST` | `/unidades` | 422 on a taken `unid_sigla` |
//! | `GET`  | `/unidades/{id}` | |
//! | `PUT\|PATCH` | `/unidades/{id}` | Partial update |
//! | `DELETE` | `/unidades/{id}` | 400 while addresses or postings remain |
//! | `POST\|DELETE` | `/unidades/{id}/enderecos/{end_id}` | Link / unlink an address |

use axum::{
  extract::State,
  response::Response,
};
use quadro_core::{
  Entity,
  store::Registry,
  unit::{NewUnit, UnitPatch},
};

use crate::{
  AppState,
  envelope,
  error::ApiError,
  extract::{PageParams, Path, Query, Valid},
};

/// `GET /unidades`
pub async fn list<S: Registry>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
  let page = state
    .store
    .list_units(params.request())
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::page(page, "units"))
}

/// `POST /unidades`
pub async fn create<S: Registry>(
  State(state): State<AppState<S>>,
  Valid(input): Valid<NewUnit>,
) -> Result<Response, ApiError> {
  let unit = state.store.create_unit(input).await.map_err(|e| state.fail(e))?;
  Ok(envelope::created(unit, "unit created"))
}

/// `GET /unidades/{id}`
pub async fn get_one<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  let unit = state
    .store
    .get_unit(id)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(|| ApiError::not_found(Entity::Unit, id))?;
  Ok(envelope::ok(unit))
}

/// `PUT|PATCH /unidades/{id}`
pub async fn update<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<UnitPatch>,
) -> Result<Response, ApiError> {
  let unit = state.store.update_unit(id, patch).await.map_err(|e| state.fail(e))?;
  Ok(envelope::ok(unit))
}

/// `DELETE /unidades/{id}`
pub async fn delete<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  state.store.delete_unit(id).await.map_err(|e| state.fail(e))?;
  Ok(envelope::done("unit deleted"))
}

/// `POST /unidades/{id}/enderecos/{end_id}`
pub async fn attach_address<S: Registry>(
  State(state): State<AppState<S>>,
  Path((id, address_id)): Path<(i64, i64)>,
) -> Result<Response, ApiError> {
  state
    .store
    .attach_unit_address(id, address_id)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::done("address linked to unit"))
}

/// `DELETE /unidades/{id}/enderecos/{end_id}`
pub async fn detach_address<S: Registry>(
  State(state): State<AppState<S>>,
  Path((id, address_id)): Path<(i64, i64)>,
) -> Result<Response, ApiError> {
  state
    .store
    .detach_unit_address(id, address_id)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::done("address unlinked from unit"))
}
