//! Handlers for `/lotacoes` endpoints.

use axum::{
  extract::State,
  response::Response,
};
use quadro_core::{
  Entity,
  posting::{NewPosting, PostingPatch},
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
    .list_postings(params.request())
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::page(page, "postings"))
}

/// Unknown `pes_id` or `unid_id` is a 422 on that field.
pub async fn create<S: Registry>(
  State(state): State<AppState<S>>,
  Valid(input): Valid<NewPosting>,
) -> Result<Response, ApiError> {
  let posting = state.store.create_posting(input).await.map_err(|e| state.fail(e))?;
  Ok(envelope::created(posting, "posting created"))
}

pub async fn get_one<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  let posting = state
    .store
    .get_posting(id)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(|| ApiError::not_found(Entity::Posting, id))?;
  Ok(envelope::ok(posting))
}

pub async fn update<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<PostingPatch>,
) -> Result<Response, ApiError> {
  let posting = state
    .store
    .update_posting(id, patch)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::ok(posting))
}

pub async fn delete<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  state.store.delete_posting(id).await.map_err(|e| state.fail(e))?;
  Ok(envelope::done("posting deleted"))
}
