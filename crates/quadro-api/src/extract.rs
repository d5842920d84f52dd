//! Request extractors.
//!
//! Handlers use these in place of axum's own so that every rejection,
//! including a malformed id or query string, is rendered as an envelope.

use axum::{
  Json,
  extract::{FromRequest, FromRequestParts, Request},
};
use quadro_core::{Validate, page::PageRequest};
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::ApiError;

/// A JSON body that parsed and passed [`Validate`]. Either failure is a
/// `422` listing the offending fields.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Validate + Send,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state).await?;
    value.validate().map_err(ApiError::Validation)?;
    Ok(Valid(value))
  }
}

/// [`axum::extract::Path`] with an [`ApiError`] rejection.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// [`axum::extract::Query`] with an [`ApiError`] rejection.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// `?page=&per_page=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub page:     Option<u32>,
  pub per_page: Option<u32>,
}

impl PageParams {
  pub fn request(&self) -> PageRequest { PageRequest::new(self.page, self.per_page) }
}
