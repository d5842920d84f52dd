//! Handlers for `/pessoas` endpoints, their address links and photos.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/pessoas` | People with `enderecos` and `lotacoes` loaded |
//! | `POST` | `/pessoas` | |
//! | `GET`  | `/pessoas/{id}` | |
//! | `PUT\|PATCH` | `/pessoas/{id}` | Partial update |
//! | `DELETE` | `/pessoas/{id}` | 400 while any dependent remains |
//! | `POST\|DELETE` | `/pessoas/{id}/enderecos/{end_id}` | Link / unlink an address |
//! | `GET\|POST` | `/pessoas/{id}/fotos` | Photo metadata |
//! | `DELETE` | `/fotos/{id}` | |

use axum::{
  extract::State,
  response::Response,
};
use quadro_core::{
  Entity,
  person::{NewPerson, NewPhoto, PersonPatch},
  store::Registry,
};

use crate::{
  AppState,
  envelope,
  error::ApiError,
  extract::{PageParams, Path, Query, Valid},
};

// ─── People ──────────────────────────────────────────────────────────────────

/// `GET /pessoas`
pub async fn list<S: Registry>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
  let page = state
    .store
    .list_people(params.request())
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::page(page, "people"))
}

/// `POST /pessoas`
pub async fn create<S: Registry>(
  State(state): State<AppState<S>>,
  Valid(input): Valid<NewPerson>,
) -> Result<Response, ApiError> {
  let person = state.store.create_person(input).await.map_err(|e| state.fail(e))?;
  Ok(envelope::created(person, "person created"))
}

/// `GET /pessoas/{id}`
pub async fn get_one<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  let person = state
    .store
    .get_person(id)
    .await
    .map_err(|e| state.fail(e))?
    .ok_or_else(|| ApiError::not_found(Entity::Person, id))?;
  Ok(envelope::ok(person))
}

/// `PUT|PATCH /pessoas/{id}`
pub async fn update<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Valid(patch): Valid<PersonPatch>,
) -> Result<Response, ApiError> {
  let person = state
    .store
    .update_person(id, patch)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::ok(person))
}

/// `DELETE /pessoas/{id}`
pub async fn delete<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  state.store.delete_person(id).await.map_err(|e| state.fail(e))?;
  Ok(envelope::done("person deleted"))
}

// ─── Address links ───────────────────────────────────────────────────────────

pub async fn attach_address<S: Registry>(
  State(state): State<AppState<S>>,
  Path((id, address_id)): Path<(i64, i64)>,
) -> Result<Response, ApiError> {
  state
    .store
    .attach_person_address(id, address_id)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::done("address linked to person"))
}

pub async fn detach_address<S: Registry>(
  State(state): State<AppState<S>>,
  Path((id, address_id)): Path<(i64, i64)>,
) -> Result<Response, ApiError> {
  state
    .store
    .detach_person_address(id, address_id)
    .await
    .map_err(|e| state.fail(e))?;
  Ok(envelope::done("address unlinked from person"))
}

// ─── Photos ──────────────────────────────────────────────────────────────────

/// `GET /pessoas/{id}/fotos`: an empty list is a plain `200`, unlike the
/// paginated listings.
pub async fn photos<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  let photos = state.store.list_photos(id).await.map_err(|e| state.fail(e))?;
  Ok(envelope::ok(photos))
}

/// `POST /pessoas/{id}/fotos`
pub async fn add_photo<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Valid(input): Valid<NewPhoto>,
) -> Result<Response, ApiError> {
  let photo = state.store.add_photo(id, input).await.map_err(|e| state.fail(e))?;
  Ok(envelope::created(photo, "photo added"))
}

/// `DELETE /fotos/{id}`
pub async fn delete_photo<S: Registry>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Response, ApiError> {
  state.store.delete_photo(id).await.map_err(|e| state.fail(e))?;
  Ok(envelope::done("photo deleted"))
}
