//! Frame scoping: project the tab's cookies onto one frame.

use std::collections::HashSet;
use std::sync::Arc;

use crate::types::{CookieMap, FrameId, TabFrames};

/// Cookies observed in any of the selected frame's frame ids.
///
/// Returns an empty map when no frame is selected, the frame is unknown to
/// `tab_frames`, or it has no frame ids. Cookies without a frame-id list are
/// never included. Input order is preserved.
pub fn scope_to_frame(cookies: &CookieMap, selected_frame: Option<&str>, tab_frames: &TabFrames) -> CookieMap {
    let frame_ids = selected_frame
        .and_then(|key| tab_frames.get(key))
        .and_then(|frame| frame.frame_ids.as_deref())
        .unwrap_or_default();

    if frame_ids.is_empty() {
        return CookieMap::new();
    }

    let wanted: HashSet<&FrameId> = frame_ids.iter().collect();

    cookies
        .iter()
        .filter(|(_, cookie)| {
            cookie
                .frame_id_list
                .as_deref()
                .is_some_and(|ids| ids.iter().any(|id| wanted.contains(id)))
        })
        .map(|(name, cookie)| (name.clone(), Arc::clone(cookie)))
        .collect()
}

/// Number of cookies visible in each frame, in topology order.
pub fn frame_cookie_counts(cookies: &CookieMap, tab_frames: &TabFrames) -> Vec<(String, usize)> {
    tab_frames
        .keys()
        .map(|key| (key.clone(), scope_to_frame(cookies, Some(key), tab_frames).len()))
        .collect()
}
