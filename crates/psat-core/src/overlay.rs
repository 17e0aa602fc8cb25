//! Frame overlay bridge
//!
//! The content script posts a [`HoverMessage`] over the `psat-tool` port
//! whenever the pointer enters or leaves an iframe. When the panel selects a
//! frame, the page draws a translucent box over the matching iframe; the
//! decision of which iframe, and where, is made here by [`plan_overlay`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::url::same_host_ignoring_www;

/// Name of the long-lived runtime port between content script and extension.
pub const PORT_NAME: &str = "psat-tool";

/// Class name given to overlay elements so they can all be removed.
pub const OVERLAY_CLASS: &str = "ps-overlay";

pub const OVERLAY_COLOR: &str = "#33be3377";

/// Largest z-index browsers accept.
pub const MAX_Z_INDEX: i64 = 2_147_483_647;

// =============================================================================
// Hover Messages
// =============================================================================

/// Payload posted when the pointer enters (`hover`) or leaves an iframe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct HoverMessage {
    pub hover: bool,
    pub attributes: BTreeMap<String, String>,
}

impl HoverMessage {
    /// Build the message for a `mouseover`/`mouseout` event.
    ///
    /// Returns `None` unless the target is an iframe. Later duplicates of an
    /// attribute name win.
    pub fn from_mouse_event<I, K, V>(event_type: &str, tag_name: &str, attributes: I) -> Option<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if !tag_name.eq_ignore_ascii_case("iframe") {
            return None;
        }

        Some(Self {
            hover: event_type == "mouseover",
            attributes: attributes
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        })
    }

    pub fn src(&self) -> Option<&str> {
        self.attributes.get("src").map(String::as_str)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Bounding client rect of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Document scroll position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Absolute placement of an overlay in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
pub struct OverlayStyle {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayStyle {
    /// `None` for elements with no area.
    pub fn for_rect(rect: Rect, scroll: ScrollOffset) -> Option<Self> {
        if rect.is_empty() {
            return None;
        }
        Some(Self {
            top: rect.y + scroll.y,
            left: rect.x + scroll.x,
            width: rect.width,
            height: rect.height,
        })
    }

    /// Inline style properties for the overlay element.
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("position", "absolute".to_string()),
            ("backgroundColor", OVERLAY_COLOR.to_string()),
            ("zIndex", MAX_Z_INDEX.to_string()),
            ("pointerEvents", "none".to_string()),
            ("width", format!("{}px", self.width)),
            ("height", format!("{}px", self.height)),
            ("top", format!("{}px", self.top)),
            ("left", format!("{}px", self.left)),
        ]
    }
}

// =============================================================================
// Planning
// =============================================================================

/// An iframe on the page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct IframeCandidate {
    pub src: Option<String>,
    pub rect: Rect,
}

/// What the page should do with its overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum OverlayPlan {
    /// Remove existing overlays, draw this one, scroll the iframe into view.
    Show { index: usize, style: OverlayStyle },
    /// A matching iframe has no area yet; leave the page as it is.
    Unchanged,
    /// No iframe matches the selected frame; remove all overlays.
    Clear,
}

/// Whether an iframe's `src` belongs to the selected frame.
pub fn frame_matches(iframe_src: &str, selected_frame: &str) -> bool {
    same_host_ignoring_www(iframe_src, selected_frame)
}

/// Decide which iframe gets the overlay for `selected_frame`.
///
/// Matching iframes are walked in document order and the last one with an
/// area wins. A matching iframe without an area ends the walk, keeping
/// whatever was decided before it.
pub fn plan_overlay(iframes: &[IframeCandidate], selected_frame: &str, scroll: ScrollOffset) -> OverlayPlan {
    let mut found = false;
    let mut plan = OverlayPlan::Unchanged;

    for (index, iframe) in iframes.iter().enumerate() {
        let src = iframe.src.as_deref().unwrap_or_default();
        if !frame_matches(src, selected_frame) {
            continue;
        }

        match OverlayStyle::for_rect(iframe.rect, scroll) {
            Some(style) => {
                found = true;
                plan = OverlayPlan::Show { index, style };
            }
            None => return plan,
        }
    }

    if found {
        plan
    } else {
        OverlayPlan::Clear
    }
}
