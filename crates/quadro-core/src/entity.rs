//! Entity discriminants shared by errors, guards and the storage layer.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Every kind of row the registry manages.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter,
  Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
  #[strum(serialize = "person")]
  Person,
  #[strum(serialize = "address")]
  Address,
  #[strum(serialize = "city")]
  City,
  #[strum(serialize = "unit")]
  Unit,
  #[strum(serialize = "posting")]
  Posting,
  #[strum(serialize = "permanent servant")]
  PermanentServant,
  #[strum(serialize = "temporary servant")]
  TemporaryServant,
  #[strum(serialize = "photo")]
  Photo,
}
