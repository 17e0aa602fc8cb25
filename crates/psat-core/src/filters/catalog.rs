use std::cmp::Reverse;
use std::collections::HashMap;

use super::dimension::{FilterKey, SiteContext};
use super::{Filter, FilterValue};
use crate::types::CookieMap;

/// Enumerate the values present in `scoped` for every filter dimension.
///
/// Values are sorted by descending count, then by label. Dimensions with no
/// value in scope are left out.
pub fn build_catalog(scoped: &CookieMap, site: &SiteContext) -> Vec<Filter> {
    let mut filters = Vec::new();

    for key in FilterKey::ALL {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for cookie in scoped.values() {
            if let Some(value) = key.value_of(cookie, site) {
                *counts.entry(value.into_owned()).or_default() += 1;
            }
        }

        if counts.is_empty() {
            continue;
        }

        let mut values: Vec<FilterValue> = counts
            .into_iter()
            .map(|(label, count)| FilterValue { label, count })
            .collect();
        values.sort_by(|a, b| (Reverse(a.count), &a.label).cmp(&(Reverse(b.count), &b.label)));

        filters.push(Filter {
            key,
            title: key.title().to_string(),
            values,
        });
    }

    log::trace!("catalog built: {} filters over {} cookies", filters.len(), scoped.len());
    filters
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::filters::UNCATEGORISED;
    use crate::test_fixtures::cnn_tab;
    use crate::types::{CookieRecord, ParsedCookie};

    fn catalog() -> Vec<Filter> {
        let tab = cnn_tab();
        build_catalog(&tab.tab_cookies, &SiteContext::from_tab_url(tab.tab_url.as_deref()))
    }

    fn labels(filter: &Filter) -> Vec<(&str, usize)> {
        filter.values.iter().map(|v| (v.label.as_str(), v.count)).collect()
    }

    #[test]
    fn category_filter_counts_marketing_and_uncategorised() {
        let filters = catalog();
        let category = filters
            .iter()
            .find(|f| f.key == FilterKey::Category)
            .expect("category filter present");

        assert_eq!(category.title, "Category");
        assert_eq!(labels(category), vec![("Marketing", 2), (UNCATEGORISED, 2)]);
    }

    #[test]
    fn party_filter_follows_tab_site() {
        let filters = catalog();
        let party = filters
            .iter()
            .find(|f| f.key == FilterKey::Party)
            .expect("party filter present");
        assert_eq!(labels(party), vec![("First Party", 2), ("Third Party", 2)]);
    }

    #[test]
    fn values_sorted_by_count_then_label() {
        let filters = catalog();
        let platform = filters
            .iter()
            .find(|f| f.key == FilterKey::Platform)
            .expect("platform filter present");
        assert_eq!(labels(platform), vec![("PubMatic", 1), ("Quantcast", 1)]);

        let domain = filters
            .iter()
            .find(|f| f.key == FilterKey::Domain)
            .expect("domain filter present");
        assert_eq!(domain.value(".cnn.com").map(|v| v.count), Some(2));
        assert_eq!(domain.values[0].label, ".cnn.com");
    }

    #[test]
    fn empty_dimensions_are_omitted() {
        let filters = catalog();
        let keys: Vec<FilterKey> = filters.iter().map(|f| f.key).collect();

        assert!(!keys.contains(&FilterKey::SameSite));
        assert_eq!(keys.first(), Some(&FilterKey::Category));
    }

    #[test]
    fn empty_scope_yields_no_filters() {
        assert!(build_catalog(&CookieMap::new(), &SiteContext::default()).is_empty());
    }

    #[test]
    fn deterministic_for_fixed_input() {
        let mut scoped = CookieMap::new();
        for name in ["b", "a", "c"] {
            scoped.insert(
                name.to_string(),
                Arc::new(CookieRecord {
                    parsed_cookie: ParsedCookie {
                        name: name.to_string(),
                        domain: format!("{name}.example"),
                        ..Default::default()
                    },
                    ..Default::default()
                }),
            );
        }
        let site = SiteContext::default();
        let first = build_catalog(&scoped, &site);
        assert_eq!(first, build_catalog(&scoped, &site));

        let domain = first.iter().find(|f| f.key == FilterKey::Domain).expect("domain filter");
        let order: Vec<&str> = domain.values.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(order, vec!["a.example", "b.example", "c.example"]);
    }
}
