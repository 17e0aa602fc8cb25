//! Shared test data: a CNN page with a PubMatic ad iframe.

use std::sync::Arc;

use crate::types::{
    CookieAnalytics, CookieMap, CookieRecord, FrameId, FrameInfo, HeaderType, ParsedCookie, TabFrames, TabState,
};

pub const TOP_FRAME: &str = "https://edition.cnn.com";
pub const ADS_FRAME: &str = "https://ads.pubmatic.com";

fn record(
    name: &str,
    domain: &str,
    url: &str,
    analytics: CookieAnalytics,
    frame_ids: &[i64],
) -> (String, Arc<CookieRecord>) {
    let cookie = CookieRecord {
        parsed_cookie: ParsedCookie {
            name: name.to_string(),
            value: format!("{name}-value"),
            domain: domain.to_string(),
            ..Default::default()
        },
        analytics: Some(analytics),
        url: url.to_string(),
        header_type: HeaderType::Response,
        frame_id_list: Some(frame_ids.iter().copied().map(FrameId::from).collect()),
    };
    (name.to_string(), Arc::new(cookie))
}

fn known(platform: &str, category: &str, retention: &str, controller: &str) -> CookieAnalytics {
    CookieAnalytics {
        platform: platform.to_string(),
        category: category.to_string(),
        retention: retention.to_string(),
        data_controller: controller.to_string(),
        ..Default::default()
    }
}

/// `_cb` and `__qca` first-party, `pubsyncexp` and `KRTBCOOKIE_290`
/// third-party; the last two are also seen inside the ad iframe.
pub fn cnn_tab() -> TabState {
    let cookies: CookieMap = [
        record("_cb", ".cnn.com", "https://edition.cnn.com/whatever/api", CookieAnalytics::default(), &[0]),
        record(
            "pubsyncexp",
            ".ads.pubmatic.com",
            "https://api.pubmatic.com/whatever/api",
            CookieAnalytics::default(),
            &[0, 3],
        ),
        record(
            "__qca",
            ".cnn.com",
            "https://edition.cnn.com/whatever/api",
            known("Quantcast", "Marketing", "1 year", "Quantcast"),
            &[0],
        ),
        record(
            "KRTBCOOKIE_290",
            ".pubmatic.com",
            "https://api.pubmatic.com/whatever/api",
            known("PubMatic", "Marketing", "29 days", "Pubmatic"),
            &[5, 0],
        ),
    ]
    .into_iter()
    .collect();

    let mut frames = TabFrames::new();
    frames.insert(
        TOP_FRAME.to_string(),
        FrameInfo { frame_ids: Some(vec![FrameId::from(0)]) },
    );
    frames.insert(
        ADS_FRAME.to_string(),
        FrameInfo { frame_ids: Some(vec![FrameId::from(3), FrameId::from(5)]) },
    );

    TabState {
        tab_cookies: cookies,
        tab_url: Some("https://edition.cnn.com/".to_string()),
        selected_frame: Some(TOP_FRAME.to_string()),
        tab_frames: frames,
    }
}
