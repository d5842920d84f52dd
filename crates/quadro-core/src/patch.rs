//! Serde support for patch fields that can be cleared.
//!
//! A nullable patch field is `Option<Option<T>>`: a missing key leaves the
//! stored value alone, `null` clears it and any other value replaces it.
//! Declare such fields with
//! `#[serde(default, deserialize_with = "crate::patch::nullable", skip_serializing_if = "Option::is_none")]`.

use serde::{Deserialize, Deserializer};

/// Only called when the key is present, so its result is always `Some`.
pub fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  #[derive(Debug, Deserialize)]
  struct Patch {
    #[serde(default, deserialize_with = "super::nullable")]
    note: Option<Option<String>>,
  }

  fn parse(json: &str) -> Option<Option<String>> {
    serde_json::from_str::<Patch>(json).unwrap().note
  }

  #[test]
  fn absent_null_and_value_are_distinct() {
    assert_eq!(parse("{}"), None);
    assert_eq!(parse(r#"{"note": null}"#), Some(None));
    assert_eq!(parse(r#"{"note": "x"}"#), Some(Some("x".into())));
  }
}
