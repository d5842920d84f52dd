//! The JSON body shape shared by every response.
//!
//! ```json
//! { "success": true, "message": "...", "data": {...}, "meta": {...} }
//! ```
//!
//! Absent members are omitted. Failures carry `message`, plus `errors` on
//! validation failures and `error` on internal failures in debug mode.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use quadro_core::{
  ValidationErrors,
  page::{Page, PageMeta},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T = ()> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub meta:    Option<PageMeta>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub errors:  Option<ValidationErrors>,
}

impl<T> Envelope<T> {
  fn new(success: bool, message: Option<String>, data: Option<T>) -> Self {
    Self { success, message, data, meta: None, error: None, errors: None }
  }
}

impl Envelope {
  pub fn failure(message: impl Into<String>) -> Self { Self::new(false, Some(message.into()), None) }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response { Json(self).into_response() }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// `200` with `data`.
pub fn ok<T: Serialize>(data: T) -> Response { Envelope::new(true, None, Some(data)).into_response() }

/// `201` with `data`.
pub fn created<T: Serialize>(data: T, message: &str) -> Response {
  (StatusCode::CREATED, Envelope::new(true, Some(message.to_owned()), Some(data))).into_response()
}

/// `200` with only a message.
pub fn done(message: impl Into<String>) -> Response {
  Envelope::<()>::new(true, Some(message.into()), None).into_response()
}

/// `200` with a page of `what`, or `404` with an empty `data` array when
/// there is nothing to list at all.
pub fn page<T: Serialize>(page: Page<T>, what: &str) -> Response {
  if page.is_empty() {
    let body = Envelope::new(false, Some(format!("no {what} found")), Some(page.data));
    return (StatusCode::NOT_FOUND, body).into_response();
  }
  Envelope {
    meta: Some(page.meta),
    ..Envelope::new(true, Some(format!("{what} retrieved")), Some(page.data))
  }
  .into_response()
}
