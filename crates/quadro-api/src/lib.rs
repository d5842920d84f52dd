//! JSON REST API for Quadro.
//!
//! Exposes an axum [`Router`] backed by any [`quadro_core::store::Registry`].
//! Every response uses the [`envelope`] body shape. Auth, TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(quadro_api::api_router(store.clone(), ApiOptions::default()))
//! ```

pub mod addresses;
pub mod cities;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod people;
pub mod postings;
pub mod servants;
pub mod units;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use quadro_core::store::Registry;

pub use error::ApiError;

/// Behaviour switches for the router.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiOptions {
  /// Include internal error detail in `500` bodies.
  pub debug: bool,
}

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub debug: bool,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store), debug: self.debug } }
}

impl<S: Registry> AppState<S> {
  /// Convert a store error into the HTTP error taxonomy.
  pub fn fail(&self, err: S::Error) -> ApiError { ApiError::from_core(err.into(), self.debug) }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged or nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>, options: ApiOptions) -> Router<()>
where
  S: Registry + 'static,
{
  let state = AppState { store, debug: options.debug };

  Router::new()
    // People
    .route("/pessoas", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/pessoas/{id}",
      get(people::get_one::<S>)
        .put(people::update::<S>)
        .patch(people::update::<S>)
        .delete(people::delete::<S>),
    )
    .route(
      "/pessoas/{id}/enderecos/{end_id}",
      post(people::attach_address::<S>).delete(people::detach_address::<S>),
    )
    .route("/pessoas/{id}/fotos", get(people::photos::<S>).post(people::add_photo::<S>))
    .route("/fotos/{id}", delete(people::delete_photo::<S>))
    // Addresses
    .route("/enderecos", get(addresses::list::<S>).post(addresses::create::<S>))
    .route(
      "/enderecos/{id}",
      get(addresses::get_one::<S>)
        .put(addresses::update::<S>)
        .patch(addresses::update::<S>)
        .delete(addresses::delete::<S>),
    )
    // Cities
    .route("/cidades", get(cities::list::<S>).post(cities::create::<S>))
    .route(
      "/cidades/{id}",
      get(cities::get_one::<S>)
        .put(cities::update::<S>)
        .patch(cities::update::<S>)
        .delete(cities::delete::<S>),
    )
    // Units
    .route("/unidades", get(units::list::<S>).post(units::create::<S>))
    .route(
      "/unidades/{id}",
      get(units::get_one::<S>)
        .put(units::update::<S>)
        .patch(units::update::<S>)
        .delete(units::delete::<S>),
    )
    .route(
      "/unidades/{id}/enderecos/{end_id}",
      post(units::attach_address::<S>).delete(units::detach_address::<S>),
    )
    // Postings
    .route("/lotacoes", get(postings::list::<S>).post(postings::create::<S>))
    .route(
      "/lotacoes/{id}",
      get(postings::get_one::<S>)
        .put(postings::update::<S>)
        .patch(postings::update::<S>)
        .delete(postings::delete::<S>),
    )
    // Servants
    .route(
      "/servidores-efetivos",
      get(servants::list_permanent::<S>).post(servants::onboard_permanent::<S>),
    )
    .route(
      "/servidores-efetivos/{id}",
      get(servants::get_permanent::<S>)
        .put(servants::update_permanent::<S>)
        .patch(servants::update_permanent::<S>)
        .delete(servants::delete_permanent::<S>),
    )
    .route(
      "/servidores-temporarios",
      get(servants::list_temporary::<S>).post(servants::onboard_temporary::<S>),
    )
    .route(
      "/servidores-temporarios/{id}",
      get(servants::get_temporary::<S>)
        .put(servants::update_temporary::<S>)
        .patch(servants::update_temporary::<S>)
        .delete(servants::delete_temporary::<S>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
  };
  use quadro_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store), ApiOptions::default())
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
  }

  async fn create_city(app: &Router) -> i64 {
    let (status, body) =
      send(app, "POST", "/cidades", Some(json!({ "cid_nome": "Cuiabá", "cid_uf": "MT" }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["cid_id"].as_i64().unwrap()
  }

  fn onboarding_body(cid_id: i64) -> Value {
    json!({
      "pes_nome": "Maria Souza",
      "pes_data_nascimento": "1988-04-12",
      "pes_sexo": "Feminino",
      "pes_mae": "Ana Souza",
      "pes_pai": "Paulo Souza",
      "cid_id": cid_id,
      "end_tipo_logradouro": "Avenida",
      "end_logradouro": "Getúlio Vargas",
      "end_numero": "1500",
      "end_bairro": "Centro",
      "se_matricula": "2024001",
    })
  }

  // ── Onboarding ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn onboarding_returns_linked_records() {
    let app = app().await;
    let cid = create_city(&app).await;

    let (status, body) = send(&app, "POST", "/servidores-efetivos", Some(onboarding_body(cid))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["success"], true);

    let pes_id = body["data"]["pessoa"]["pes_id"].as_i64().unwrap();
    let end_id = body["data"]["endereco"]["end_id"].as_i64().unwrap();
    assert_eq!(body["data"]["servidorEfetivo"]["pes_id"], pes_id);
    assert_eq!(body["data"]["servidorEfetivo"]["se_matricula"], "2024001");

    let (status, person) = send(&app, "GET", &format!("/pessoas/{pes_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(person["data"]["enderecos"][0]["end_id"], end_id);

    let (status, servant) = send(&app, "GET", &format!("/servidores-efetivos/{pes_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(servant["data"]["pessoa"]["pes_nome"], "Maria Souza");
  }

  #[tokio::test]
  async fn onboarding_reports_missing_person_fields() {
    let app = app().await;
    let cid = create_city(&app).await;
    let mut body = onboarding_body(cid);
    body.as_object_mut().unwrap().remove("pes_mae");

    let (status, resp) = send(&app, "POST", "/servidores-efetivos", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["success"], false);
    assert!(resp["errors"]["pes_mae"].is_array(), "{resp}");
  }

  #[tokio::test]
  async fn temporary_for_permanent_person_is_a_conflict() {
    let app = app().await;
    let cid = create_city(&app).await;
    let (_, body) = send(&app, "POST", "/servidores-efetivos", Some(onboarding_body(cid))).await;
    let pes_id = body["data"]["pessoa"]["pes_id"].as_i64().unwrap();

    let temp = json!({
      "pes_id": pes_id,
      "cid_id": cid,
      "end_tipo_logradouro": "Rua",
      "end_logradouro": "das Flores",
      "end_numero": "10",
      "end_bairro": "Porto",
      "st_data_admissao": "2024-01-01",
    });
    let (status, resp) = send(&app, "POST", "/servidores-temporarios", Some(temp)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");

    let (_, addresses) = send(&app, "GET", "/enderecos", None).await;
    assert_eq!(addresses["meta"]["total"], 1);
  }

  // ── Guarded deletes ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unit_with_active_posting_is_not_deleted() {
    let app = app().await;
    let (_, unit) = send(
      &app,
      "POST",
      "/unidades",
      Some(json!({ "unid_nome": "Secretaria de Planejamento", "unid_sigla": "SEPLAG" })),
    )
    .await;
    let unid_id = unit["data"]["unid_id"].as_i64().unwrap();
    let (_, person) = send(
      &app,
      "POST",
      "/pessoas",
      Some(json!({
        "pes_nome": "Carlos Lima",
        "pes_data_nascimento": "1985-09-12",
        "pes_sexo": "Masculino",
        "pes_mae": "Rita Lima",
        "pes_pai": "José Lima",
      })),
    )
    .await;
    let pes_id = person["data"]["pes_id"].as_i64().unwrap();
    let (status, _) = send(
      &app,
      "POST",
      "/lotacoes",
      Some(json!({
        "pes_id": pes_id,
        "unid_id": unid_id,
        "lot_data_lotacao": "2024-02-01",
        "lot_portaria": "Portaria 15/2024",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, resp) = send(&app, "DELETE", &format!("/unidades/{unid_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["success"], false);
    assert!(resp["message"].as_str().unwrap().contains("postings"), "{resp}");

    let (status, _) = send(&app, "GET", &format!("/unidades/{unid_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
  }

  // ── Status mapping ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn empty_list_is_404_with_empty_data() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/unidades", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], json!([]));
  }

  #[tokio::test]
  async fn list_carries_page_meta() {
    let app = app().await;
    for sigla in ["AAA", "BBB", "CCC"] {
      send(&app, "POST", "/unidades", Some(json!({ "unid_nome": "Unidade", "unid_sigla": sigla }))).await;
    }
    let (status, body) = send(&app, "GET", "/unidades?per_page=2&page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"], json!({ "current_page": 2, "per_page": 2, "total": 3, "last_page": 2 }));
  }

  #[tokio::test]
  async fn missing_record_is_404() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/pessoas/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "person 99 not found");

    let (status, _) = send(&app, "DELETE", "/lotacoes/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn malformed_json_is_422() {
    let app = app().await;
    let req = Request::builder()
      .method("POST")
      .uri("/unidades")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{\"unid_nome\": "))
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn unparsable_id_is_422_envelope() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/pessoas/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["errors"]["path"].is_array(), "{body}");

    let (status, body) = send(&app, "DELETE", "/unidades/1/enderecos/x", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["path"].is_array(), "{body}");
  }

  #[tokio::test]
  async fn unparsable_query_is_422_envelope() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/unidades?per_page=abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "the given data was invalid");
    assert!(body["errors"]["query"].is_array(), "{body}");
  }

  #[tokio::test]
  async fn duplicate_acronym_is_422_on_field() {
    let app = app().await;
    let unit = json!({ "unid_nome": "Secretaria de Saúde", "unid_sigla": "SES" });
    send(&app, "POST", "/unidades", Some(unit.clone())).await;
    let (status, body) = send(&app, "POST", "/unidades", Some(unit)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["unid_sigla"].is_array(), "{body}");
  }

  #[tokio::test]
  async fn posting_dates_are_validated() {
    let app = app().await;
    let (status, body) = send(
      &app,
      "POST",
      "/lotacoes",
      Some(json!({
        "pes_id": 1,
        "unid_id": 1,
        "lot_data_lotacao": "2024-02-01",
        "lot_data_remocao": "2024-01-01",
        "lot_portaria": "Portaria 15/2024",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["lot_data_remocao"].is_array(), "{body}");
  }

  #[tokio::test]
  async fn photos_are_listed_per_person() {
    let app = app().await;
    let (_, person) = send(
      &app,
      "POST",
      "/pessoas",
      Some(json!({
        "pes_nome": "Carlos Lima",
        "pes_data_nascimento": "1985-09-12",
        "pes_sexo": "Masculino",
        "pes_mae": "Rita Lima",
        "pes_pai": "José Lima",
      })),
    )
    .await;
    let pes_id = person["data"]["pes_id"].as_i64().unwrap();

    let photo = json!({ "ft_data": "2024-05-02", "ft_bucket": "fotos", "ft_hash": "abc123" });
    let (status, created) = send(&app, "POST", &format!("/pessoas/{pes_id}/fotos"), Some(photo)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");

    let (status, list) = send(&app, "GET", &format!("/pessoas/{pes_id}/fotos"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"][0]["ft_hash"], "abc123");

    let (status, _) = send(&app, "DELETE", &format!("/pessoas/{pes_id}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let ft_id = created["data"]["ft_id"].as_i64().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/fotos/{ft_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/pessoas/{pes_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
  }

  #[test]
  fn internal_detail_only_in_debug() {
    let hidden = ApiError::from_core(quadro_core::Error::Internal("disk full".into()), false);
    let shown = ApiError::from_core(quadro_core::Error::Internal("disk full".into()), true);
    assert!(matches!(hidden, ApiError::Internal { expose: false, .. }));
    assert!(matches!(shown, ApiError::Internal { expose: true, .. }));
    assert_eq!(shown.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
