//! Filter management store
//!
//! Owns the tab state handed over by the cookie store, the per-frame
//! selections and the search term, and derives what the panel renders:
//!
//! ```text
//! TabState ──> scope_to_frame ──┬──> build_catalog  ──> filters
//!                               └──> filter_cookies ──> filteredCookies
//! ```
//!
//! Every stage is memoized on the identity of its inputs. A cached value is
//! only ever replaced, never edited, and the catalog and the evaluator always
//! read the same scoped map.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use ts_rs::TS;

use crate::filters::{build_catalog, filter_cookies, Filter, SiteContext};
use crate::psl::psl_generation;
use crate::scope::scope_to_frame;
use crate::selection::{FrameSelections, SelectedFilters};
use crate::types::{CookieMap, CookieRecord, TabState};

// =============================================================================
// Exposed State
// =============================================================================

/// What the rendering layer reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub selected_filters: SelectedFilters,
    pub filters: Vec<Filter>,
    pub filtered_cookies: Vec<Arc<CookieRecord>>,
    pub search_term: String,
}

// =============================================================================
// Memo
// =============================================================================

/// Single-slot cache keyed by input identity.
#[derive(Debug)]
struct Memo<K, V> {
    slot: RefCell<Option<(K, V)>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { slot: RefCell::new(None) }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    fn get_or_compute(&self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some((cached_key, value)) = self.slot.borrow().as_ref() {
            if *cached_key == key {
                return value.clone();
            }
        }

        let value = compute();
        *self.slot.borrow_mut() = Some((key, value.clone()));
        value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScopeKey {
    generation: u64,
    frame: Option<String>,
}

/// Tab generation and suffix list generation; party labels depend on both.
type SiteKey = (u64, u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilteredKey {
    scope: ScopeKey,
    psl_generation: u64,
    selection_revision: u64,
    search_revision: u64,
}

// =============================================================================
// Store
// =============================================================================

/// Derives per-frame filters and filtered cookies from the tab's cookie state.
#[derive(Debug, Default)]
pub struct FilterManagementStore {
    tab: Arc<TabState>,
    site: Memo<SiteKey, SiteContext>,
    generation: u64,
    selections: FrameSelections,
    search_term: String,
    search_revision: u64,
    scoped: Memo<ScopeKey, Arc<CookieMap>>,
    // Kept per frame so revisiting a frame reuses its catalog.
    catalogs: RefCell<HashMap<String, (SiteKey, Arc<Vec<Filter>>)>>,
    filtered: Memo<FilteredKey, Arc<Vec<Arc<CookieRecord>>>>,
}

impl FilterManagementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab_state(tab: TabState) -> Self {
        let mut store = Self::new();
        store.set_tab_state(tab);
        store
    }

    /// Replace the tab state wholesale, e.g. after the cookie store updates.
    ///
    /// Selections and the search term survive.
    pub fn set_tab_state(&mut self, tab: TabState) {
        self.generation += 1;
        log::debug!(
            "tab state {}: {} cookies, {} frames, selected {:?}",
            self.generation,
            tab.tab_cookies.len(),
            tab.tab_frames.len(),
            tab.selected_frame
        );
        self.tab = Arc::new(tab);
    }

    pub fn tab_state(&self) -> &TabState {
        &self.tab
    }

    pub fn selected_frame(&self) -> Option<&str> {
        self.tab.selected_frame.as_deref()
    }

    /// Switch the frame being viewed. No selection is cleared.
    pub fn select_frame(&mut self, frame: Option<String>) {
        log::debug!("selected frame -> {:?}", frame);
        Arc::make_mut(&mut self.tab).selected_frame = frame;
    }

    fn site_key(&self) -> SiteKey {
        (self.generation, psl_generation())
    }

    /// The tab's site, re-resolved once a new suffix list is loaded.
    pub fn site(&self) -> SiteContext {
        self.site.get_or_compute(self.site_key(), || {
            SiteContext::from_tab_url(self.tab.tab_url.as_deref())
        })
    }

    fn scope_key(&self) -> ScopeKey {
        ScopeKey {
            generation: self.generation,
            frame: self.tab.selected_frame.clone(),
        }
    }

    /// Cookies of the selected frame.
    pub fn scoped_cookies(&self) -> Arc<CookieMap> {
        self.scoped.get_or_compute(self.scope_key(), || {
            let tab = &self.tab;
            Arc::new(scope_to_frame(
                &tab.tab_cookies,
                tab.selected_frame.as_deref(),
                &tab.tab_frames,
            ))
        })
    }

    /// Filter catalog of the selected frame; empty without a frame.
    pub fn filters(&self) -> Arc<Vec<Filter>> {
        let Some(frame) = self.selected_frame() else {
            return Arc::default();
        };

        let site_key = self.site_key();
        if let Some((key, filters)) = self.catalogs.borrow().get(frame) {
            if *key == site_key {
                return Arc::clone(filters);
            }
        }

        let scoped = self.scoped_cookies();
        let filters = Arc::new(build_catalog(&scoped, &self.site()));
        self.catalogs
            .borrow_mut()
            .insert(frame.to_string(), (site_key, Arc::clone(&filters)));
        filters
    }

    /// Cookies of the selected frame passing its selection and the search term.
    pub fn filtered_cookies(&self) -> Arc<Vec<Arc<CookieRecord>>> {
        let Some(frame) = self.selected_frame() else {
            return Arc::default();
        };

        let key = FilteredKey {
            scope: self.scope_key(),
            psl_generation: psl_generation(),
            selection_revision: self.selections.revision(),
            search_revision: self.search_revision,
        };
        self.filtered.get_or_compute(key, || {
            let scoped = self.scoped_cookies();
            let selected = self.selections.get(frame);
            Arc::new(filter_cookies(&scoped, &selected, &self.search_term, &self.site()))
        })
    }

    /// Selection of the selected frame; empty without a frame.
    pub fn selected_filters(&self) -> SelectedFilters {
        self.selected_frame()
            .map(|frame| self.selections.get(frame))
            .unwrap_or_default()
    }

    /// Update the selected frame's selection from its previous value.
    ///
    /// Does nothing while no frame is selected.
    pub fn set_selected_filters<F>(&mut self, update: F)
    where
        F: FnOnce(SelectedFilters) -> SelectedFilters,
    {
        match self.tab.selected_frame.as_deref() {
            Some(frame) => self.selections.update(frame, update),
            None => log::debug!("selection update ignored: no frame selected"),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value != self.search_term {
            self.search_term = value;
            self.search_revision += 1;
        }
    }

    /// Snapshot of everything the panel renders.
    pub fn state(&self) -> FilterState {
        FilterState {
            selected_filters: self.selected_filters(),
            filters: self.filters().as_ref().clone(),
            filtered_cookies: self.filtered_cookies().as_ref().clone(),
            search_term: self.search_term.clone(),
        }
    }
}
