//! PSAT Core Library
//!
//! This crate provides the data core behind the PSAT DevTools panel: it takes
//! the cookie state the extension collects for a tab and derives, for the
//! frame the user is looking at, which filters exist and which cookies pass
//! the user's selection.
//!
//! # Architecture
//!
//! Everything is a pure function of the tab state, the selected frame and the
//! user's choices. [`FilterManagementStore`] wires the stages together and
//! memoizes them; it never mutates the cookie map it was given.
//!
//! # Modules
//!
//! - `types`: Cookie records, frame topology and tab state as the store sends them
//! - `scope`: Projecting tab cookies onto one frame
//! - `filters`: Filter catalog and evaluation
//! - `selection`: Per-frame filter selections
//! - `store`: Memoized pipeline exposed to the panel
//! - `psl`: eTLD+1 extraction for first/third-party classification
//! - `url`: Allocation-free URL slicing
//! - `overlay`: Content-script hover messages and frame overlay placement

pub mod error;
pub mod filters;
pub mod overlay;
pub mod psl;
pub mod scope;
pub mod selection;
pub mod store;
pub mod types;
pub mod url;

#[cfg(test)]
mod test_fixtures;

// Re-export commonly used types
pub use error::{Error, Result};
pub use filters::{build_catalog, filter_cookies, Filter, FilterKey, FilterValue, SiteContext};
pub use overlay::{plan_overlay, HoverMessage, OverlayPlan};
pub use scope::scope_to_frame;
pub use selection::{FrameSelections, SelectedFilters, SelectionState};
pub use store::{FilterManagementStore, FilterState};
pub use types::{CookieMap, CookieRecord, FrameId, Party, PsApiKey, TabFrames, TabState};
