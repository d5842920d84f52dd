//! Field-level validation for incoming records.
//!
//! Input types implement [`Validate`] and report every failing field at once,
//! keyed by the wire name of the field, so a client can render all messages
//! in a single round trip.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::Serialize;

/// Per-field validation messages, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  /// A set holding a single message.
  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  pub fn merge(&mut self, other: ValidationErrors) {
    for (field, messages) in other.0 {
      self.0.entry(field).or_default().extend(messages);
    }
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }

  // ── Rule helpers ────────────────────────────────────────────────────────

  /// Require `value` to be between `min` and `max` characters after
  /// trimming.
  pub fn check_len(&mut self, field: &str, value: &str, min: usize, max: usize) {
    let len = value.trim().chars().count();
    if len == 0 {
      self.add(field, "this field is required");
    } else if len < min {
      self.add(field, format!("must be at least {min} characters"));
    } else if len > max {
      self.add(field, format!("may not be longer than {max} characters"));
    }
  }

  /// Like [`check_len`](Self::check_len) but only when a value is present.
  pub fn check_opt_len(
    &mut self,
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
  ) {
    if let Some(v) = value {
      self.check_len(field, v, min, max);
    }
  }

  /// Require `later` (if set) not to precede `earlier`.
  pub fn check_order(
    &mut self,
    field: &str,
    earlier: NaiveDate,
    later: Option<NaiveDate>,
    earlier_field: &str,
  ) {
    if let Some(later) = later
      && later < earlier
    {
      self.add(field, format!("must be on or after {earlier_field}"));
    }
  }

  pub fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
      self.add(field, "this field is required");
    }
    value
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

/// Boundary validation for an input record.
pub trait Validate {
  fn validate(&self) -> Result<(), ValidationErrors>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn length_rules() {
    let mut e = ValidationErrors::new();
    e.check_len("a", "  ", 3, 10);
    e.check_len("b", "ab", 3, 10);
    e.check_len("c", "abcdefghijk", 3, 10);
    e.check_len("d", "abc", 3, 10);

    assert_eq!(e.get("a"), Some(&["this field is required".to_string()][..]));
    assert!(e.contains("b"));
    assert!(e.contains("c"));
    assert!(!e.contains("d"));
  }

  #[test]
  fn length_counts_characters_not_bytes() {
    let mut e = ValidationErrors::new();
    e.check_len("name", "José", 3, 4);
    assert!(e.is_empty());
  }

  #[test]
  fn order_rule_accepts_same_day() {
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let mut e = ValidationErrors::new();
    e.check_order("end", day, Some(day), "start");
    assert!(e.is_empty());

    e.check_order("end", day, day.pred_opt(), "start");
    assert!(e.contains("end"));
  }

  #[test]
  fn display_joins_all_messages() {
    let mut e = ValidationErrors::single("x", "bad");
    e.add("y", "worse");
    assert_eq!(e.to_string(), "x: bad; y: worse");
  }

  #[test]
  fn serializes_as_field_map() {
    let e = ValidationErrors::single("unid_sigla", "already in use");
    let json = serde_json::to_value(&e).unwrap();
    assert_eq!(json, serde_json::json!({ "unid_sigla": ["already in use"] }));
  }
}
