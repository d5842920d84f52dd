//! Servant records and the onboarding inputs that create them.
//!
//! Both kinds are one-to-one extensions of a [`Person`], keyed by the
//! person's id. A person may hold at most one record of each kind, and the
//! two kinds exclude each other while a temporary record is active:
//!
//! - a person with an *active* temporary record cannot become permanent;
//! - a person with a permanent record cannot become temporary.
//!
//! A temporary record moves one way, from active to dismissed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error,
  address::{Address, NewAddress},
  entity::Entity,
  person::{NewPerson, Person, PersonPatch},
  validate::{Validate, ValidationErrors},
};

// ─── Kinds ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServantKind {
  Permanent,
  Temporary,
}

impl ServantKind {
  pub fn entity(self) -> Entity {
    match self {
      Self::Permanent => Entity::PermanentServant,
      Self::Temporary => Entity::TemporaryServant,
    }
  }

  pub fn other(self) -> Self {
    match self {
      Self::Permanent => Self::Temporary,
      Self::Temporary => Self::Permanent,
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentServant {
  #[serde(rename = "pes_id")]
  pub person_id:    i64,
  /// Unique registration number ("matrícula").
  #[serde(rename = "se_matricula")]
  pub registration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryServant {
  #[serde(rename = "pes_id")]
  pub person_id:    i64,
  #[serde(rename = "st_data_admissao")]
  pub admitted_on:  NaiveDate,
  #[serde(rename = "st_data_demissao")]
  pub dismissed_on: Option<NaiveDate>,
}

/// Lifecycle of a temporary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServantStatus {
  Active,
  Dismissed { since: NaiveDate },
}

impl TemporaryServant {
  pub fn status(&self) -> ServantStatus {
    match self.dismissed_on {
      None => ServantStatus::Active,
      Some(since) => ServantStatus::Dismissed { since },
    }
  }

  pub fn is_active(&self) -> bool { self.dismissed_on.is_none() }

  /// Move to `Dismissed`. Repeating the same date is a no-op; any other
  /// date on an already dismissed record is a conflict.
  pub fn dismiss(&mut self, on: NaiveDate) -> Result<(), Error> {
    match self.dismissed_on {
      Some(current) if current == on => Ok(()),
      Some(current) => Err(Error::conflict(format!(
        "temporary servant {} was already dismissed on {current}",
        self.person_id
      ))),
      None => {
        self.dismissed_on = Some(on);
        Ok(())
      }
    }
  }

  fn check_dates(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_order(
      "st_data_demissao",
      self.admitted_on,
      self.dismissed_on,
      "st_data_admissao",
    );
    errors.into_result()
  }
}

/// A servant record with its person, for reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermanentServantDetail {
  #[serde(flatten)]
  pub servant: PermanentServant,
  #[serde(rename = "pessoa")]
  pub person:  Person,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporaryServantDetail {
  #[serde(flatten)]
  pub servant: TemporaryServant,
  #[serde(rename = "pessoa")]
  pub person:  Person,
}

// ─── Onboarding input ────────────────────────────────────────────────────────

/// Who the new servant record is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServantSubject {
  /// Attach to a person that already exists.
  Existing(i64),
  /// Create the person in the same transaction.
  New(NewPerson),
}

/// The person half of an onboarding payload, as it arrives on the wire:
/// either `pes_id`, or every person field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectFields {
  #[serde(default)]
  pub pes_id:              Option<i64>,
  #[serde(default)]
  pub pes_nome:            Option<String>,
  #[serde(default)]
  pub pes_data_nascimento: Option<NaiveDate>,
  #[serde(default)]
  pub pes_sexo:            Option<String>,
  #[serde(default)]
  pub pes_mae:             Option<String>,
  #[serde(default)]
  pub pes_pai:             Option<String>,
  #[serde(default)]
  pub pes_cpf:             Option<String>,
}

impl SubjectFields {
  pub fn existing(pes_id: i64) -> Self { Self { pes_id: Some(pes_id), ..Default::default() } }

  pub fn new_person(person: NewPerson) -> Self {
    Self {
      pes_id:              None,
      pes_nome:            Some(person.name),
      pes_data_nascimento: Some(person.birth_date),
      pes_sexo:            Some(person.sex),
      pes_mae:             Some(person.mother_name),
      pes_pai:             Some(person.father_name),
      pes_cpf:             person.cpf,
    }
  }

  /// Decide between an existing and a new person. Person fields are ignored
  /// when `pes_id` is present.
  pub fn resolve(&self) -> Result<ServantSubject, ValidationErrors> {
    if let Some(id) = self.pes_id {
      return Ok(ServantSubject::Existing(id));
    }

    let mut errors = ValidationErrors::new();
    let name = errors.required("pes_nome", self.pes_nome.clone());
    let birth_date = errors.required("pes_data_nascimento", self.pes_data_nascimento);
    let sex = errors.required("pes_sexo", self.pes_sexo.clone());
    let mother_name = errors.required("pes_mae", self.pes_mae.clone());
    let father_name = errors.required("pes_pai", self.pes_pai.clone());

    match (name, birth_date, sex, mother_name, father_name) {
      (Some(name), Some(birth_date), Some(sex), Some(mother_name), Some(father_name)) => {
        let person = NewPerson {
          name,
          birth_date,
          sex,
          mother_name,
          father_name,
          cpf: self.pes_cpf.clone(),
        };
        person.check(&mut errors);
        errors.into_result().map(|()| ServantSubject::New(person))
      }
      _ => Err(errors),
    }
  }
}

/// Payload for onboarding a permanent servant: person, address and
/// registration, created together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentOnboarding {
  #[serde(flatten)]
  pub subject:      SubjectFields,
  #[serde(flatten)]
  pub address:      NewAddress,
  #[serde(rename = "se_matricula")]
  pub registration: String,
}

impl Validate for PermanentOnboarding {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Err(e) = self.subject.resolve() {
      errors.merge(e);
    }
    self.address.check(&mut errors);
    errors.check_len("se_matricula", &self.registration, 3, 20);
    errors.into_result()
  }
}

/// Payload for onboarding a temporary servant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryOnboarding {
  #[serde(flatten)]
  pub subject:      SubjectFields,
  #[serde(flatten)]
  pub address:      NewAddress,
  #[serde(rename = "st_data_admissao")]
  pub admitted_on:  NaiveDate,
  #[serde(rename = "st_data_demissao", default)]
  pub dismissed_on: Option<NaiveDate>,
}

impl Validate for TemporaryOnboarding {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Err(e) = self.subject.resolve() {
      errors.merge(e);
    }
    self.address.check(&mut errors);
    errors.check_order(
      "st_data_demissao",
      self.admitted_on,
      self.dismissed_on,
      "st_data_admissao",
    );
    errors.into_result()
  }
}

/// Everything written by a successful permanent onboarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermanentOnboarded {
  #[serde(rename = "pessoa")]
  pub person:  Person,
  #[serde(rename = "endereco")]
  pub address: Address,
  #[serde(rename = "servidorEfetivo")]
  pub servant: PermanentServant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporaryOnboarded {
  #[serde(rename = "pessoa")]
  pub person:  Person,
  #[serde(rename = "endereco")]
  pub address: Address,
  #[serde(rename = "servidorTemporario")]
  pub servant: TemporaryServant,
}

// ─── Updates ─────────────────────────────────────────────────────────────────

/// Update for a permanent record and, in the same transaction, its person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentServantPatch {
  #[serde(rename = "se_matricula", default)]
  pub registration: Option<String>,
  #[serde(flatten)]
  pub person:       PersonPatch,
}

impl Validate for PermanentServantPatch {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_opt_len("se_matricula", self.registration.as_deref(), 3, 20);
    self.person.check(&mut errors);
    errors.into_result()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryServantPatch {
  #[serde(rename = "st_data_admissao", default)]
  pub admitted_on:  Option<NaiveDate>,
  /// Setting this dismisses the servant; it can never be cleared.
  #[serde(rename = "st_data_demissao", default)]
  pub dismissed_on: Option<NaiveDate>,
  #[serde(flatten)]
  pub person:       PersonPatch,
}

impl TemporaryServantPatch {
  /// Merge the servant fields into `servant`, enforcing the one-way
  /// dismissal, and hand back the person part for the caller to apply.
  pub fn apply(self, servant: &mut TemporaryServant) -> Result<PersonPatch, Error> {
    if let Some(admitted) = self.admitted_on {
      servant.admitted_on = admitted;
    }
    if let Some(dismissed) = self.dismissed_on {
      servant.dismiss(dismissed)?;
    }
    servant.check_dates()?;
    Ok(self.person)
  }
}

impl Validate for TemporaryServantPatch {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(admitted) = self.admitted_on {
      errors.check_order("st_data_demissao", admitted, self.dismissed_on, "st_data_admissao");
    }
    self.person.check(&mut errors);
    errors.into_result()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn temporary() -> TemporaryServant {
    TemporaryServant { person_id: 7, admitted_on: date(2023, 2, 1), dismissed_on: None }
  }

  fn address_json() -> serde_json::Value {
    serde_json::json!({
      "cid_id": 1,
      "end_tipo_logradouro": "Rua",
      "end_logradouro": "das Palmeiras",
      "end_numero": "120",
      "end_bairro": "Centro",
    })
  }

  #[test]
  fn dismissal_is_one_way() {
    let mut s = temporary();
    assert_eq!(s.status(), ServantStatus::Active);

    s.dismiss(date(2024, 1, 31)).unwrap();
    assert_eq!(s.status(), ServantStatus::Dismissed { since: date(2024, 1, 31) });

    // Same date again is idempotent; a different one is refused.
    s.dismiss(date(2024, 1, 31)).unwrap();
    assert!(matches!(s.dismiss(date(2024, 2, 1)), Err(Error::Conflict(_))));
  }

  #[test]
  fn patch_cannot_dismiss_before_admission() {
    let mut s = temporary();
    let patch = TemporaryServantPatch { dismissed_on: Some(date(2022, 1, 1)), ..Default::default() };
    assert!(matches!(patch.apply(&mut s), Err(Error::Validation(_))));
  }

  #[test]
  fn patch_returns_person_part() {
    let mut s = temporary();
    let patch = TemporaryServantPatch {
      dismissed_on: Some(date(2024, 6, 30)),
      person: PersonPatch { name: Some("Carlos Lima".into()), ..Default::default() },
      ..Default::default()
    };
    let person = patch.apply(&mut s).unwrap();
    assert!(!s.is_active());
    assert_eq!(person.name.as_deref(), Some("Carlos Lima"));
  }

  #[test]
  fn subject_requires_all_person_fields_without_pes_id() {
    let fields = SubjectFields { pes_nome: Some("Carlos Lima".into()), ..Default::default() };
    let errors = fields.resolve().unwrap_err();
    assert!(errors.contains("pes_data_nascimento"));
    assert!(errors.contains("pes_mae"));
    assert!(!errors.contains("pes_nome"));

    assert_eq!(SubjectFields::existing(3).resolve().unwrap(), ServantSubject::Existing(3));
  }

  #[test]
  fn onboarding_payload_is_flat() {
    let mut body = address_json();
    body["pes_nome"] = "Carlos Lima".into();
    body["pes_data_nascimento"] = "1985-09-12".into();
    body["pes_sexo"] = "Masculino".into();
    body["pes_mae"] = "Rita Lima".into();
    body["pes_pai"] = "José Lima".into();
    body["pes_cpf"] = "98765432100".into();
    body["se_matricula"] = "2024001".into();

    let payload: PermanentOnboarding = serde_json::from_value(body).unwrap();
    assert!(payload.validate().is_ok());
    match payload.subject.resolve() {
      Ok(ServantSubject::New(person)) => assert_eq!(person.cpf.as_deref(), Some("98765432100")),
      other => panic!("expected a new person, got {other:?}"),
    }
    assert_eq!(payload.address.city_id, 1);
  }

  #[test]
  fn onboarding_rejects_dismissal_before_admission() {
    let mut body = address_json();
    body["pes_id"] = 4.into();
    body["st_data_admissao"] = "2024-03-01".into();
    body["st_data_demissao"] = "2024-02-01".into();

    let payload: TemporaryOnboarding = serde_json::from_value(body).unwrap();
    assert!(payload.validate().unwrap_err().contains("st_data_demissao"));
  }
}
