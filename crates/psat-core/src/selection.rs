//! Per-frame filter selections.
//!
//! Each frame key keeps its own [`SelectedFilters`]. Switching frames only
//! changes which entry is read; nothing is cleared.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::filters::FilterKey;

// =============================================================================
// Selected Filters
// =============================================================================

/// Filter key -> chosen values. An absent key or an empty set means the key
/// imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct SelectedFilters(BTreeMap<FilterKey, BTreeSet<String>>);

/// Whether a frame's selection constrains anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Unfiltered,
    Filtered,
}

impl SelectedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        if self.constraints().next().is_some() {
            SelectionState::Filtered
        } else {
            SelectionState::Unfiltered
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.state() == SelectionState::Filtered
    }

    /// Keys with at least one selected value.
    pub fn constraints(&self) -> impl Iterator<Item = (FilterKey, &BTreeSet<String>)> {
        self.0
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, values)| (*key, values))
    }

    pub fn values(&self, key: FilterKey) -> Option<&BTreeSet<String>> {
        self.0.get(&key)
    }

    pub fn is_selected(&self, key: FilterKey, value: &str) -> bool {
        self.0.get(&key).is_some_and(|values| values.contains(value))
    }

    pub fn with_value(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.0.entry(key).or_default().insert(value.into());
        self
    }

    pub fn with_values<I, S>(mut self, key: FilterKey, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(key)
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn without_value(mut self, key: FilterKey, value: &str) -> Self {
        if let Some(values) = self.0.get_mut(&key) {
            values.remove(value);
            if values.is_empty() {
                self.0.remove(&key);
            }
        }
        self
    }

    /// Select `value` if it is not selected, deselect it otherwise.
    pub fn toggled(self, key: FilterKey, value: &str) -> Self {
        if self.is_selected(key, value) {
            self.without_value(key, value)
        } else {
            self.with_value(key, value)
        }
    }

    pub fn without_key(mut self, key: FilterKey) -> Self {
        self.0.remove(&key);
        self
    }
}

impl<S: Into<String>> FromIterator<(FilterKey, S)> for SelectedFilters {
    fn from_iter<T: IntoIterator<Item = (FilterKey, S)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::default(), |selected, (key, value)| selected.with_value(key, value))
    }
}

// =============================================================================
// Frame Selections
// =============================================================================

/// Selections keyed by frame key.
#[derive(Debug, Clone, Default)]
pub struct FrameSelections {
    by_frame: HashMap<String, SelectedFilters>,
    revision: u64,
}

impl FrameSelections {
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame's selection; frames never touched read as empty.
    pub fn get(&self, frame_key: &str) -> SelectedFilters {
        self.by_frame.get(frame_key).cloned().unwrap_or_default()
    }

    /// Apply `update` to one frame's selection, leaving the others untouched.
    pub fn update<F>(&mut self, frame_key: &str, update: F)
    where
        F: FnOnce(SelectedFilters) -> SelectedFilters,
    {
        let next = update(self.get(frame_key));
        log::debug!("selection for frame {frame_key}: {:?}", next.state());
        self.by_frame.insert(frame_key.to_string(), next);
        self.revision += 1;
    }

    /// Bumped on every update; used as a memo key.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.by_frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_frame.is_empty()
    }
}
