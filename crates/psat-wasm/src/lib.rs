//! WebAssembly bindings for the PSAT DevTools panel

use std::collections::BTreeMap;
use std::sync::Once;

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use psat_core::{
    overlay::{self, IframeCandidate, ScrollOffset, PORT_NAME},
    psl::{self, get_etld1},
    FilterKey, FilterManagementStore, HoverMessage, PsApiKey, SelectedFilters, TabState,
};

fn from_js<T: DeserializeOwned>(value: &JsValue, what: &str) -> Result<T, JsValue> {
    let text = js_sys::JSON::stringify(value)
        .map_err(|_| JsValue::from_str(&format!("{} is not serializable", what)))?
        .as_string()
        .ok_or_else(|| JsValue::from_str(&format!("Invalid {}: expected a JSON value", what)))?;
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize: {}", e)))?;
    js_sys::JSON::parse(&text)
}

fn core_error(e: psat_core::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

static LOGGER: Once = Once::new();

fn install_logger() {
    // Records are filtered by `log::max_level`, so the console logger passes everything.
    LOGGER.call_once(|| wasm_logger::init(wasm_logger::Config::new(log::Level::Trace)));
}

/// Parse a level name, defaulting to `warn` for anything unknown.
fn parse_level(level: &str) -> log::LevelFilter {
    level.trim().parse().unwrap_or(log::LevelFilter::Warn)
}

// Set up panic hook and console logging when the module loads
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    install_logger();
    log::set_max_level(log::LevelFilter::Warn);
}

#[wasm_bindgen]
pub fn init_logging(level: &str) {
    install_logger();
    log::set_max_level(parse_level(level));
}

#[wasm_bindgen]
pub fn init_psl(list_text: &str) -> Result<(), JsValue> {
    psl::init_psl(list_text).map_err(core_error)
}

// =============================================================================
// Filter Management
// =============================================================================

/// Filter state for the cookies tab, one instance per panel.
#[wasm_bindgen]
pub struct FilterManager {
    store: FilterManagementStore,
}

impl Default for FilterManager {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FilterManager {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FilterManager {
        FilterManager {
            store: FilterManagementStore::new(),
        }
    }

    /// `{ tabCookies, tabUrl, selectedFrame, tabFrames }` from the cookie store.
    #[wasm_bindgen(js_name = setTabState)]
    pub fn set_tab_state(&mut self, tab: &JsValue) -> Result<(), JsValue> {
        let tab: TabState = from_js(tab, "tab state")?;
        self.store.set_tab_state(tab);
        Ok(())
    }

    #[wasm_bindgen(js_name = selectFrame)]
    pub fn select_frame(&mut self, frame: Option<String>) {
        self.store.select_frame(frame);
    }

    /// Calls `update(previous)` and stores what it returns for the selected frame.
    #[wasm_bindgen(js_name = setSelectedFilters)]
    pub fn set_selected_filters(&mut self, update: &js_sys::Function) -> Result<(), JsValue> {
        if self.store.selected_frame().is_none() {
            return Ok(());
        }
        let previous = to_js(&self.store.selected_filters())?;
        let next = update.call1(&JsValue::NULL, &previous)?;
        let next: SelectedFilters = from_js(&next, "selected filters")?;
        self.store.set_selected_filters(|_| next);
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleFilter)]
    pub fn toggle_filter(&mut self, key: &str, value: &str) -> Result<(), JsValue> {
        let key: FilterKey = key.parse().map_err(core_error)?;
        self.store.set_selected_filters(|prev| prev.toggled(key, value));
        Ok(())
    }

    /// Drop every selected value of one filter key.
    #[wasm_bindgen(js_name = clearFilter)]
    pub fn clear_filter(&mut self, key: &str) -> Result<(), JsValue> {
        let key: FilterKey = key.parse().map_err(core_error)?;
        self.store.set_selected_filters(|prev| prev.without_key(key));
        Ok(())
    }

    #[wasm_bindgen(js_name = clearFilters)]
    pub fn clear_filters(&mut self) {
        self.store.set_selected_filters(|_| SelectedFilters::new());
    }

    #[wasm_bindgen(js_name = setSearchTerm)]
    pub fn set_search_term(&mut self, value: String) {
        self.store.set_search_term(value);
    }

    /// `{ selectedFilters, filters, filteredCookies, searchTerm }`
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.store.state())
    }
}

// =============================================================================
// Frame Overlay
// =============================================================================

#[wasm_bindgen]
pub fn port_name() -> String {
    PORT_NAME.to_string()
}

/// Message for the content script to post, or `undefined` for non-iframe targets.
#[wasm_bindgen]
pub fn hover_message(event_type: &str, tag_name: &str, attributes: &JsValue) -> Result<JsValue, JsValue> {
    let attributes: BTreeMap<String, String> = from_js(attributes, "attributes")?;
    match HoverMessage::from_mouse_event(event_type, tag_name, attributes) {
        Some(message) => to_js(&message),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// `iframes` is `[{ src, rect: { x, y, width, height } }]` in document order.
#[wasm_bindgen]
pub fn plan_overlay(
    iframes: &JsValue,
    selected_frame: &str,
    scroll_x: f64,
    scroll_y: f64,
) -> Result<JsValue, JsValue> {
    let iframes: Vec<IframeCandidate> = from_js(iframes, "iframes")?;
    let plan = overlay::plan_overlay(&iframes, selected_frame, ScrollOffset { x: scroll_x, y: scroll_y });
    to_js(&plan)
}

#[wasm_bindgen]
pub fn overlay_css(style: &JsValue) -> Result<JsValue, JsValue> {
    let style: overlay::OverlayStyle = from_js(style, "overlay style")?;
    let css: BTreeMap<&str, String> = style.css_properties().into_iter().collect();
    to_js(&css)
}

// =============================================================================
// Misc
// =============================================================================

#[wasm_bindgen]
pub fn ps_api_keys() -> js_sys::Array {
    PsApiKey::ALL
        .iter()
        .map(|key| JsValue::from_str(key.as_str()))
        .collect()
}

#[wasm_bindgen]
pub fn get_etld1_js(host: &str) -> String {
    get_etld1(host)
}

#[wasm_bindgen]
pub fn is_third_party_js(site_host: &str, cookie_domain: &str) -> bool {
    psl::is_third_party(site_host, cookie_domain)
}
