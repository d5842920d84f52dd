//! Handlers for `/servidores-efetivos` and `/servidores-temporarios`.
//!
//! `POST` runs the onboarding workflow: one body carries the person (or an
//! existing `pes_id`), the address and the servant fields, and the response
//! holds everything created. Servant ids are the person's `pes_id`.

use axum::{
  extract::State,
  response::Response,
};
use quadro_core::{
  Entity,
  servant::{
    PermanentOnboarding, PermanentServantPatch, TemporaryOnboarding, TemporaryServantPatch,
  },
  store::Registry,
};

use crate::{
  AppState,
  envelope,
  error::ApiError,
  extract::{PageParams, Path, Query, Valid},
};

// ─── Permanent ───────────────────────────────────────────────────────────────

pub async fn list_permanent<S: Registry>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
  let page = state
    .store
    .list_permanent(params.request())
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::page(page, "permanent servants"))
}

pub async fn onboard_permanent<S: Registry>(
  State(state): State<AppState<S>>,
  Valid(input): Valid<PermanentOnboarding>,
) -> Result<Response, ApiError> {
  let onboarded = state
    .store
    .onboard_permanent(input)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::created(onboarded, "permanent servant created"))
}

pub async fn get_permanent<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  let servant = state
    .store
    .get_permanent(id)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(|| ApiError::not_found(Entity::PermanentServant, id))?;
  Ok(envelope::ok(servant))
}

pub async fn update_permanent<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<PermanentServantPatch>,
) -> Result<Response, ApiError> {
  let servant = state
    .store
    .update_permanent(id, patch)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::ok(servant))
}

pub async fn delete_permanent<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  state.store.delete_permanent(id).await.map_err(|e| state.fail(e))?;
  Ok(envelope::done("permanent servant deleted"))
}

// ─── Temporary ───────────────────────────────────────────────────────────────

pub async fn list_temporary<S: Registry>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
  let page = state
    .store
    .list_temporary(params.request())
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::page(page, "temporary servants"))
}

pub async fn onboard_temporary<S: Registry>(
  State(state): State<AppState<S>>,
  Valid(input): Valid<TemporaryOnboarding>,
) -> Result<Response, ApiError> {
  let onboarded = state
    .store
    .onboard_temporary(input)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::created(onboarded, "temporary servant created"))
}

pub async fn get_temporary<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  let servant = state
    .store
    .get_temporary(id)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(|| ApiError::not_found(Entity::TemporaryServant, id))?;
  Ok(envelope::ok(servant))
}

/// Setting `st_data_demissao` dismisses the servant; changing it afterwards
/// is a 400.
pub async fn update_temporary<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<TemporaryServantPatch>,
) -> Result<Response, ApiError> {
  let servant = state
    .store
    .update_temporary(id, patch)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::ok(servant))
}

pub async fn delete_temporary<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  state.store.delete_temporary(id).await.map_err(|e| state.fail(e))?;
  Ok(envelope::done("temporary servant deleted"))
}
