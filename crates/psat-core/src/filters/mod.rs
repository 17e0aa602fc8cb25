//! Filter catalog and evaluation over a frame-scoped cookie set.
//!
//! - `dimension`: the filterable dimensions and per-cookie value resolution
//! - `catalog`: which values exist in scope, with counts
//! - `evaluate`: applying a selection and search term

mod catalog;
mod dimension;
mod evaluate;

pub use catalog::build_catalog;
pub use dimension::{FilterKey, SiteContext, UNCATEGORISED};
pub use evaluate::{filter_cookies, matches_search, matches_selection};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One selectable value of a filter and how many cookies in scope carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct FilterValue {
    pub label: String,
    pub count: usize,
}

/// A filter dimension with the values present in the current scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct Filter {
    pub key: FilterKey,
    pub title: String,
    pub values: Vec<FilterValue>,
}

impl Filter {
    pub fn value(&self, label: &str) -> Option<&FilterValue> {
        self.values.iter().find(|value| value.label == label)
    }
}
