//! Addresses and the cities they belong to.

use serde::{Deserialize, Serialize};

use crate::validate::{Validate, ValidationErrors};

// ─── City ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
  #[serde(rename = "cid_id")]
  pub id:    i64,
  #[serde(rename = "cid_nome")]
  pub name:  String,
  /// Two-letter state code, e.g. `MT`.
  #[serde(rename = "cid_uf")]
  pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCity {
  #[serde(rename = "cid_nome")]
  pub name:  String,
  #[serde(rename = "cid_uf")]
  pub state: String,
}

impl Validate for NewCity {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_len("cid_nome", &self.name, 2, 200);
    check_state(&mut errors, &self.state);
    errors.into_result()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPatch {
  #[serde(rename = "cid_nome", default)]
  pub name:  Option<String>,
  #[serde(rename = "cid_uf", default)]
  pub state: Option<String>,
}

impl CityPatch {
  pub fn apply(self, city: &mut City) {
    if let Some(v) = self.name {
      city.name = v;
    }
    if let Some(v) = self.state {
      city.state = v;
    }
  }
}

impl Validate for CityPatch {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_opt_len("cid_nome", self.name.as_deref(), 2, 200);
    if let Some(state) = &self.state {
      check_state(&mut errors, state);
    }
    errors.into_result()
  }
}

fn check_state(errors: &mut ValidationErrors, state: &str) {
  if state.len() != 2 || !state.chars().all(|c| c.is_ascii_uppercase()) {
    errors.add("cid_uf", "must be a two-letter uppercase state code");
  }
}

// ─── Address ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  #[serde(rename = "end_id")]
  pub id:           i64,
  #[serde(rename = "cid_id")]
  pub city_id:      i64,
  /// Kind of thoroughfare, e.g. "Rua", "Avenida".
  #[serde(rename = "end_tipo_logradouro")]
  pub street_type:  String,
  #[serde(rename = "end_logradouro")]
  pub street:       String,
  #[serde(rename = "end_numero")]
  pub number:       String,
  #[serde(rename = "end_complemento")]
  pub complement:   Option<String>,
  #[serde(rename = "end_bairro")]
  pub neighborhood: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddress {
  #[serde(rename = "cid_id")]
  pub city_id:      i64,
  #[serde(rename = "end_tipo_logradouro")]
  pub street_type:  String,
  #[serde(rename = "end_logradouro")]
  pub street:       String,
  #[serde(rename = "end_numero")]
  pub number:       String,
  #[serde(rename = "end_complemento", default)]
  pub complement:   Option<String>,
  #[serde(rename = "end_bairro")]
  pub neighborhood: String,
}

impl NewAddress {
  pub(crate) fn check(&self, errors: &mut ValidationErrors) {
    errors.check_len("end_tipo_logradouro", &self.street_type, 3, 50);
    errors.check_len("end_logradouro", &self.street, 3, 200);
    errors.check_len("end_numero", &self.number, 1, 20);
    errors.check_opt_len("end_complemento", self.complement.as_deref(), 1, 100);
    errors.check_len("end_bairro", &self.neighborhood, 3, 100);
  }
}

impl Validate for NewAddress {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    self.check(&mut errors);
    errors.into_result()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPatch {
  #[serde(rename = "cid_id", default)]
  pub city_id:      Option<i64>,
  #[serde(rename = "end_tipo_logradouro", default)]
  pub street_type:  Option<String>,
  #[serde(rename = "end_logradouro", default)]
  pub street:       Option<String>,
  #[serde(rename = "end_numero", default)]
  pub number:       Option<String>,
  /// `null` removes the complement.
  #[serde(
    rename = "end_complemento",
    default,
    deserialize_with = "crate::patch::nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub complement:   Option<Option<String>>,
  #[serde(rename = "end_bairro", default)]
  pub neighborhood: Option<String>,
}

impl AddressPatch {
  pub fn apply(self, address: &mut Address) {
    if let Some(v) = self.city_id {
      address.city_id = v;
    }
    if let Some(v) = self.street_type {
      address.street_type = v;
    }
    if let Some(v) = self.street {
      address.street = v;
    }
    if let Some(v) = self.number {
      address.number = v;
    }
    if let Some(v) = self.complement {
      address.complement = v;
    }
    if let Some(v) = self.neighborhood {
      address.neighborhood = v;
    }
  }
}

impl Validate for AddressPatch {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_opt_len("end_tipo_logradouro", self.street_type.as_deref(), 3, 50);
    errors.check_opt_len("end_logradouro", self.street.as_deref(), 3, 200);
    errors.check_opt_len("end_numero", self.number.as_deref(), 1, 20);
    errors.check_opt_len(
      "end_complemento",
      self.complement.as_ref().and_then(Option::as_deref),
      1,
      100,
    );
    errors.check_opt_len("end_bairro", self.neighborhood.as_deref(), 3, 100);
    errors.into_result()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn state_code_must_be_two_uppercase_letters() {
    let ok = NewCity { name: "Cuiabá".into(), state: "MT".into() };
    assert!(ok.validate().is_ok());

    let bad = NewCity { name: "Cuiabá".into(), state: "mt".into() };
    assert!(bad.validate().unwrap_err().contains("cid_uf"));

    let long = CityPatch { state: Some("MTX".into()), ..Default::default() };
    assert!(long.validate().unwrap_err().contains("cid_uf"));
  }

  #[test]
  fn complement_is_optional() {
    let input = NewAddress {
      city_id:      1,
      street_type:  "Rua".into(),
      street:       "das Flores".into(),
      number:       "S/N".into(),
      complement:   None,
      neighborhood: "Centro".into(),
    };
    assert!(input.validate().is_ok());
  }

  #[test]
  fn null_complement_clears_it() {
    let mut address = Address {
      id:           1,
      city_id:      1,
      street_type:  "Rua".into(),
      street:       "das Flores".into(),
      number:       "12".into(),
      complement:   Some("Bloco B".into()),
      neighborhood: "Centro".into(),
    };

    let untouched: AddressPatch = serde_json::from_str(r#"{"end_numero": "14"}"#).unwrap();
    untouched.apply(&mut address);
    assert_eq!(address.complement.as_deref(), Some("Bloco B"));

    let cleared: AddressPatch = serde_json::from_str(r#"{"end_complemento": null}"#).unwrap();
    assert!(cleared.validate().is_ok());
    cleared.apply(&mut address);
    assert_eq!(address.complement, None);
  }

  #[test]
  fn short_street_type_is_rejected() {
    let patch = AddressPatch { street_type: Some("R".into()), ..Default::default() };
    assert!(patch.validate().unwrap_err().contains("end_tipo_logradouro"));
  }
}
