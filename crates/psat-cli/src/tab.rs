use std::fmt::Write as _;
use std::fs;
use std::sync::Arc;

use serde::Serialize;

use psat_core::scope::frame_cookie_counts;
use psat_core::{CookieRecord, Filter, FilterKey, SelectedFilters, SiteContext, TabState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSummary {
    pub frame: String,
    pub cookies: usize,
    pub selected: bool,
}

pub fn load_tab(path: &str) -> Result<TabState, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    let tab = TabState::from_json(&text).map_err(|e| format!("'{}': {}", path, e))?;
    log::debug!("loaded {} cookies from '{}'", tab.tab_cookies.len(), path);
    Ok(tab)
}

/// Point the tab at `frame`, or keep the exported selection.
pub fn with_frame(mut tab: TabState, frame: Option<String>) -> TabState {
    if frame.is_some() {
        tab.selected_frame = frame;
    }
    tab
}

/// Fold repeated `--filter key=value` flags into one selection.
pub fn parse_filters(pairs: &[String]) -> Result<SelectedFilters, String> {
    pairs.iter().try_fold(SelectedFilters::new(), |selected, pair| {
        let (key, value) = FilterKey::parse_selection(pair).map_err(|e| e.to_string())?;
        Ok(selected.with_value(key, value))
    })
}

pub fn frame_summaries(tab: &TabState) -> Vec<FrameSummary> {
    frame_cookie_counts(&tab.tab_cookies, &tab.tab_frames)
        .into_iter()
        .map(|(frame, cookies)| FrameSummary {
            selected: tab.selected_frame.as_deref() == Some(frame.as_str()),
            frame,
            cookies,
        })
        .collect()
}

pub fn format_frames(frames: &[FrameSummary]) -> String {
    let mut out = String::new();
    for summary in frames {
        let marker = if summary.selected { "*" } else { " " };
        let _ = writeln!(out, "{} {:>5}  {}", marker, summary.cookies, summary.frame);
    }
    out
}

pub fn format_catalog(filters: &[Filter]) -> String {
    let mut out = String::new();
    for filter in filters {
        let _ = writeln!(out, "{} ({})", filter.title, filter.key);
        for value in &filter.values {
            let _ = writeln!(out, "  {:>5}  {}", value.count, value.label);
        }
    }
    out
}

pub fn format_cookies(cookies: &[Arc<CookieRecord>], site: &SiteContext) -> String {
    let mut out = String::new();
    for cookie in cookies {
        let category = FilterKey::Category
            .value_of(cookie, site)
            .unwrap_or_default();
        let party = site.party_of(cookie).map(|p| p.label()).unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<32} {:<28} {:<16} {}",
            cookie.name(),
            cookie.host().unwrap_or("-"),
            category,
            party
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: &str = r#"{
        "tabUrl": "https://edition.cnn.com/",
        "selectedFrame": "https://edition.cnn.com",
        "tabFrames": {
            "https://edition.cnn.com": { "frameIds": [0] },
            "https://ads.pubmatic.com": { "frameIds": [3, 5] }
        },
        "tabCookies": {
            "_cb": { "parsedCookie": { "name": "_cb", "domain": ".cnn.com" }, "frameIdList": [0] },
            "KRTBCOOKIE_290": {
                "parsedCookie": { "name": "KRTBCOOKIE_290", "domain": ".pubmatic.com" },
                "analytics": { "platform": "PubMatic", "category": "Marketing" },
                "frameIdList": [5, 0]
            }
        }
    }"#;

    fn tab() -> TabState {
        TabState::from_json(TAB).expect("fixture parses")
    }

    #[test]
    fn parses_repeated_filters() {
        let selected = parse_filters(&[
            "category=Marketing".to_string(),
            "category=Uncategorised".to_string(),
            "party=Third Party".to_string(),
        ])
        .expect("valid filters");

        assert!(selected.is_selected(FilterKey::Category, "Marketing"));
        assert!(selected.is_selected(FilterKey::Category, "Uncategorised"));
        assert!(selected.is_selected(FilterKey::Party, "Third Party"));
    }

    #[test]
    fn rejects_malformed_filters() {
        assert!(parse_filters(&["category".to_string()]).is_err());
        assert!(parse_filters(&["colour=Blue".to_string()]).is_err());
        assert_eq!(parse_filters(&[]).expect("empty is fine"), SelectedFilters::new());
    }

    #[test]
    fn frame_flag_overrides_exported_selection() {
        let kept = with_frame(tab(), None);
        assert_eq!(kept.selected_frame.as_deref(), Some("https://edition.cnn.com"));

        let switched = with_frame(tab(), Some("https://ads.pubmatic.com".to_string()));
        assert_eq!(switched.selected_frame.as_deref(), Some("https://ads.pubmatic.com"));
    }

    #[test]
    fn summarizes_frames_in_topology_order() {
        let frames = frame_summaries(&tab());
        assert_eq!(
            frames,
            vec![
                FrameSummary { frame: "https://edition.cnn.com".to_string(), cookies: 2, selected: true },
                FrameSummary { frame: "https://ads.pubmatic.com".to_string(), cookies: 1, selected: false },
            ]
        );
        assert!(format_frames(&frames).starts_with("*     2  https://edition.cnn.com"));
    }

    #[test]
    fn cookie_rows_show_category_and_party() {
        let tab = tab();
        let site = SiteContext::from_tab_url(tab.tab_url.as_deref());
        let cookies: Vec<_> = tab.tab_cookies.values().cloned().collect();
        let text = format_cookies(&cookies, &site);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("_cb"));
        assert!(lines[0].contains("Uncategorised"));
        assert!(lines[0].ends_with("First Party"));
        assert!(lines[1].contains("Marketing"));
        assert!(lines[1].ends_with("Third Party"));
    }
}
