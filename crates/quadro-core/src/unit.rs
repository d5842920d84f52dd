//! Organizational units.

use serde::{Deserialize, Serialize};

use crate::validate::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
  #[serde(rename = "unid_id")]
  pub id:      i64,
  #[serde(rename = "unid_nome")]
  pub name:    String,
  /// Unique short name, e.g. `SEPLAG`.
  #[serde(rename = "unid_sigla")]
  pub acronym: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUnit {
  #[serde(rename = "unid_nome")]
  pub name:    String,
  #[serde(rename = "unid_sigla")]
  pub acronym: String,
}

impl Validate for NewUnit {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_len("unid_nome", &self.name, 3, 200);
    errors.check_len("unid_sigla", &self.acronym, 3, 20);
    errors.into_result()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPatch {
  #[serde(rename = "unid_nome", default)]
  pub name:    Option<String>,
  #[serde(rename = "unid_sigla", default)]
  pub acronym: Option<String>,
}

impl UnitPatch {
  pub fn apply(self, unit: &mut Unit) {
    if let Some(v) = self.name {
      unit.name = v;
    }
    if let Some(v) = self.acronym {
      unit.acronym = v;
    }
  }
}

impl Validate for UnitPatch {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_opt_len("unid_nome", self.name.as_deref(), 3, 200);
    errors.check_opt_len("unid_sigla", self.acronym.as_deref(), 3, 20);
    errors.into_result()
  }
}
