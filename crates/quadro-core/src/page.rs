//! Offset pagination shared by every list operation.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// Which slice of a listing to return. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
  pub page:     u32,
  pub per_page: u32,
}

impl PageRequest {
  /// Build a request, substituting defaults and clamping `per_page` to
  /// `1..=MAX_PER_PAGE`.
  pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
    Self {
      page:     page.unwrap_or(1).max(1),
      per_page: per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE),
    }
  }

  pub fn limit(&self) -> i64 { i64::from(self.per_page) }

  pub fn offset(&self) -> i64 {
    i64::from(self.page - 1) * i64::from(self.per_page)
  }
}

impl Default for PageRequest {
  fn default() -> Self { Self::new(None, None) }
}

/// Position of a [`Page`] within the full listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
  pub current_page: u32,
  pub per_page:     u32,
  pub total:        u64,
  pub last_page:    u32,
}

/// One page of results plus its position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
  pub data: Vec<T>,
  pub meta: PageMeta,
}

impl<T> Page<T> {
  pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
    let per_page = u64::from(request.per_page);
    let last_page = total.div_ceil(per_page).max(1);
    Self {
      data,
      meta: PageMeta {
        current_page: request.page,
        per_page:     request.per_page,
        total,
        last_page:    u32::try_from(last_page).unwrap_or(u32::MAX),
      },
    }
  }

  pub fn is_empty(&self) -> bool { self.meta.total == 0 }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page { data: self.data.into_iter().map(f).collect(), meta: self.meta }
  }
}
