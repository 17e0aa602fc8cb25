use std::sync::Arc;

use super::dimension::SiteContext;
use crate::selection::SelectedFilters;
use crate::types::{CookieMap, CookieRecord};

/// Cookies in `scoped` passing both the selection and the search term, in
/// their original order.
pub fn filter_cookies(
    scoped: &CookieMap,
    selected: &SelectedFilters,
    search_term: &str,
    site: &SiteContext,
) -> Vec<Arc<CookieRecord>> {
    let needle = search_term.trim().to_lowercase();

    scoped
        .values()
        .filter(|cookie| matches_search(cookie, &needle) && matches_selection(cookie, selected, site))
        .cloned()
        .collect()
}

/// AND across filter keys, OR within one key's values.
///
/// Keys with no selected values impose nothing.
pub fn matches_selection(cookie: &CookieRecord, selected: &SelectedFilters, site: &SiteContext) -> bool {
    selected.constraints().all(|(key, values)| {
        key.value_of(cookie, site)
            .is_some_and(|value| values.contains(&*value))
    })
}

/// Case-insensitive substring match on the cookie name. `needle` must already
/// be lowercased; an empty needle matches everything.
pub fn matches_search(cookie: &CookieRecord, needle: &str) -> bool {
    needle.is_empty() || cookie.name().to_lowercase().contains(needle)
}
