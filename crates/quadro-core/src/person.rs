//! People and their photos.
//!
//! A [`Person`] is the root record: addresses, postings, servant records and
//! photos all hang off its id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  address::Address,
  posting::Posting,
  validate::{Validate, ValidationErrors},
};

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  #[serde(rename = "pes_id")]
  pub id:          i64,
  #[serde(rename = "pes_nome")]
  pub name:        String,
  #[serde(rename = "pes_data_nascimento")]
  pub birth_date:  NaiveDate,
  #[serde(rename = "pes_sexo")]
  pub sex:         String,
  #[serde(rename = "pes_mae")]
  pub mother_name: String,
  #[serde(rename = "pes_pai")]
  pub father_name: String,
  /// Eleven digits, no punctuation. Unique when present.
  #[serde(rename = "pes_cpf")]
  pub cpf:         Option<String>,
}

/// Fields accepted when creating a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  #[serde(rename = "pes_nome")]
  pub name:        String,
  #[serde(rename = "pes_data_nascimento")]
  pub birth_date:  NaiveDate,
  #[serde(rename = "pes_sexo")]
  pub sex:         String,
  #[serde(rename = "pes_mae")]
  pub mother_name: String,
  #[serde(rename = "pes_pai")]
  pub father_name: String,
  #[serde(rename = "pes_cpf", default)]
  pub cpf:         Option<String>,
}

impl NewPerson {
  pub(crate) fn check(&self, errors: &mut ValidationErrors) {
    errors.check_len("pes_nome", &self.name, 3, 200);
    errors.check_len("pes_sexo", &self.sex, 1, 9);
    errors.check_len("pes_mae", &self.mother_name, 3, 200);
    errors.check_len("pes_pai", &self.father_name, 3, 200);
    if let Some(cpf) = &self.cpf {
      check_cpf(errors, cpf);
    }
  }
}

fn check_cpf(errors: &mut ValidationErrors, cpf: &str) {
  if cpf.len() != 11 || !cpf.bytes().all(|b| b.is_ascii_digit()) {
    errors.add("pes_cpf", "must be exactly 11 digits");
  }
}

impl Validate for NewPerson {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    self.check(&mut errors);
    errors.into_result()
  }
}

/// A partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPatch {
  #[serde(rename = "pes_nome", default)]
  pub name:        Option<String>,
  #[serde(rename = "pes_data_nascimento", default)]
  pub birth_date:  Option<NaiveDate>,
  #[serde(rename = "pes_sexo", default)]
  pub sex:         Option<String>,
  #[serde(rename = "pes_mae", default)]
  pub mother_name: Option<String>,
  #[serde(rename = "pes_pai", default)]
  pub father_name: Option<String>,
  /// `null` removes the CPF.
  #[serde(
    rename = "pes_cpf",
    default,
    deserialize_with = "crate::patch::nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub cpf:         Option<Option<String>>,
}

impl PersonPatch {
  pub fn is_empty(&self) -> bool { self == &Self::default() }

  pub fn apply(self, person: &mut Person) {
    if let Some(v) = self.name {
      person.name = v;
    }
    if let Some(v) = self.birth_date {
      person.birth_date = v;
    }
    if let Some(v) = self.sex {
      person.sex = v;
    }
    if let Some(v) = self.mother_name {
      person.mother_name = v;
    }
    if let Some(v) = self.father_name {
      person.father_name = v;
    }
    if let Some(v) = self.cpf {
      person.cpf = v;
    }
  }

  pub(crate) fn check(&self, errors: &mut ValidationErrors) {
    errors.check_opt_len("pes_nome", self.name.as_deref(), 3, 200);
    errors.check_opt_len("pes_sexo", self.sex.as_deref(), 1, 9);
    errors.check_opt_len("pes_mae", self.mother_name.as_deref(), 3, 200);
    errors.check_opt_len("pes_pai", self.father_name.as_deref(), 3, 200);
    if let Some(Some(cpf)) = &self.cpf {
      check_cpf(errors, cpf);
    }
  }
}

impl Validate for PersonPatch {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    self.check(&mut errors);
    errors.into_result()
  }
}

/// A person with the relations loaded for reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDetail {
  #[serde(flatten)]
  pub person:    Person,
  #[serde(rename = "enderecos")]
  pub addresses: Vec<Address>,
  #[serde(rename = "lotacoes")]
  pub postings:  Vec<Posting>,
}

// ─── Photos ──────────────────────────────────────────────────────────────────

/// Metadata for a photo kept in an external object bucket; no image bytes
/// live in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
  #[serde(rename = "ft_id")]
  pub id:        i64,
  #[serde(rename = "pes_id")]
  pub person_id: i64,
  #[serde(rename = "ft_data")]
  pub taken_on:  NaiveDate,
  #[serde(rename = "ft_bucket")]
  pub bucket:    String,
  /// Content digest; unique across all photos.
  #[serde(rename = "ft_hash")]
  pub hash:      String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhoto {
  #[serde(rename = "ft_data")]
  pub taken_on: NaiveDate,
  #[serde(rename = "ft_bucket")]
  pub bucket:   String,
  #[serde(rename = "ft_hash")]
  pub hash:     String,
}

impl Validate for NewPhoto {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_len("ft_bucket", &self.bucket, 1, 50);
    errors.check_len("ft_hash", &self.hash, 1, 64);
    errors.into_result()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn person() -> Person {
    Person {
      id:          1,
      name:        "Maria da Silva".into(),
      birth_date:  NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
      sex:         "Feminino".into(),
      mother_name: "Ana da Silva".into(),
      father_name: "João da Silva".into(),
      cpf:         Some("12345678901".into()),
    }
  }

  #[test]
  fn new_person_reports_every_bad_field() {
    let input = NewPerson {
      name:        "Al".into(),
      birth_date:  NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
      sex:         "Não informado".into(),
      mother_name: String::new(),
      father_name: "Pedro".into(),
      cpf:         Some("123.456.789-01".into()),
    };
    let errors = input.validate().unwrap_err();
    assert!(errors.contains("pes_nome"));
    assert!(errors.contains("pes_sexo"));
    assert!(errors.contains("pes_mae"));
    assert!(errors.contains("pes_cpf"));
    assert!(!errors.contains("pes_pai"));
  }

  #[test]
  fn cpf_is_optional_and_clearable() {
    let input: NewPerson = serde_json::from_value(serde_json::json!({
      "pes_nome": "Maria da Silva",
      "pes_data_nascimento": "1990-05-17",
      "pes_sexo": "Feminino",
      "pes_mae": "Ana da Silva",
      "pes_pai": "João da Silva",
    }))
    .unwrap();
    assert_eq!(input.cpf, None);
    assert!(input.validate().is_ok());

    let mut p = person();
    let patch: PersonPatch = serde_json::from_str(r#"{"pes_cpf": null}"#).unwrap();
    assert!(!patch.is_empty());
    patch.apply(&mut p);
    assert_eq!(p.cpf, None);
  }

  #[test]
  fn patch_applies_only_present_fields() {
    let mut p = person();
    PersonPatch { name: Some("Maria Souza".into()), ..Default::default() }.apply(&mut p);
    assert_eq!(p.name, "Maria Souza");
    assert_eq!(p.mother_name, "Ana da Silva");
  }

  #[test]
  fn empty_patch_is_detected() {
    assert!(PersonPatch::default().is_empty());
    assert!(PersonPatch::default().validate().is_ok());
  }

  #[test]
  fn wire_names_follow_columns() {
    let json = serde_json::to_value(person()).unwrap();
    assert_eq!(json["pes_id"], 1);
    assert_eq!(json["pes_data_nascimento"], "1990-05-17");
  }
}
