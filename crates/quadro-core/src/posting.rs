//! Postings ("lotações"): a person assigned to a unit for a date range.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validate::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
  #[serde(rename = "lot_id")]
  pub id:          i64,
  #[serde(rename = "pes_id")]
  pub person_id:   i64,
  #[serde(rename = "unid_id")]
  pub unit_id:     i64,
  #[serde(rename = "lot_data_lotacao")]
  pub assigned_on: NaiveDate,
  #[serde(rename = "lot_data_remocao")]
  pub removed_on:  Option<NaiveDate>,
  /// Reference of the administrative order backing the posting.
  #[serde(rename = "lot_portaria")]
  pub order_ref:   String,
}

impl Posting {
  /// A posting is active until a removal date is recorded.
  pub fn is_active(&self) -> bool { self.removed_on.is_none() }

  /// Re-check the date invariant after a patch has been merged in.
  pub fn check_dates(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_order(
      "lot_data_remocao",
      self.assigned_on,
      self.removed_on,
      "lot_data_lotacao",
    );
    errors.into_result()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPosting {
  #[serde(rename = "pes_id")]
  pub person_id:   i64,
  #[serde(rename = "unid_id")]
  pub unit_id:     i64,
  #[serde(rename = "lot_data_lotacao")]
  pub assigned_on: NaiveDate,
  #[serde(rename = "lot_data_remocao", default)]
  pub removed_on:  Option<NaiveDate>,
  #[serde(rename = "lot_portaria")]
  pub order_ref:   String,
}

impl Validate for NewPosting {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_len("lot_portaria", &self.order_ref, 3, 100);
    errors.check_order(
      "lot_data_remocao",
      self.assigned_on,
      self.removed_on,
      "lot_data_lotacao",
    );
    errors.into_result()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingPatch {
  #[serde(rename = "pes_id", default)]
  pub person_id:   Option<i64>,
  #[serde(rename = "unid_id", default)]
  pub unit_id:     Option<i64>,
  #[serde(rename = "lot_data_lotacao", default)]
  pub assigned_on: Option<NaiveDate>,
  /// `null` reopens the posting.
  #[serde(
    rename = "lot_data_remocao",
    default,
    deserialize_with = "crate::patch::nullable",
    skip_serializing_if = "Option::is_none"
  )]
  pub removed_on:  Option<Option<NaiveDate>>,
  #[serde(rename = "lot_portaria", default)]
  pub order_ref:   Option<String>,
}

impl PostingPatch {
  pub fn apply(self, posting: &mut Posting) {
    if let Some(v) = self.person_id {
      posting.person_id = v;
    }
    if let Some(v) = self.unit_id {
      posting.unit_id = v;
    }
    if let Some(v) = self.assigned_on {
      posting.assigned_on = v;
    }
    if let Some(v) = self.removed_on {
      posting.removed_on = v;
    }
    if let Some(v) = self.order_ref {
      posting.order_ref = v;
    }
  }
}

impl Validate for PostingPatch {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check_opt_len("lot_portaria", self.order_ref.as_deref(), 3, 100);
    if let Some(assigned) = self.assigned_on {
      errors.check_order(
        "lot_data_remocao",
        assigned,
        self.removed_on.flatten(),
        "lot_data_lotacao",
      );
    }
    errors.into_result()
  }
}
