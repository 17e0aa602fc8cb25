#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use psat_wasm::{hover_message, plan_overlay, FilterManager};

wasm_bindgen_test_configure!(run_in_browser);

const TAB: &str = r#"{
    "tabUrl": "https://edition.cnn.com/",
    "selectedFrame": "https://edition.cnn.com",
    "tabFrames": {
        "https://edition.cnn.com": { "frameIds": [0] },
        "https://ads.pubmatic.com": { "frameIds": [3, 5] }
    },
    "tabCookies": {
        "_cb": { "parsedCookie": { "name": "_cb", "domain": ".cnn.com" }, "frameIdList": [0] },
        "__qca": {
            "parsedCookie": { "name": "__qca", "domain": ".cnn.com" },
            "analytics": { "platform": "Quantcast", "category": "Marketing" },
            "frameIdList": [0]
        },
        "KRTBCOOKIE_290": {
            "parsedCookie": { "name": "KRTBCOOKIE_290", "domain": ".pubmatic.com" },
            "analytics": { "platform": "PubMatic", "category": "Marketing" },
            "frameIdList": [5]
        }
    }
}"#;

fn json(text: &str) -> JsValue {
    js_sys::JSON::parse(text).expect("valid json")
}

fn stringify(value: &JsValue) -> String {
    js_sys::JSON::stringify(value).expect("serializable").into()
}

fn filtered_names(manager: &FilterManager) -> Vec<String> {
    let state: serde_json::Value = serde_json::from_str(&stringify(&manager.state().expect("state"))).expect("json");
    state["filteredCookies"]
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["parsedCookie"]["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[wasm_bindgen_test]
fn manager_filters_selected_frame() {
    let mut manager = FilterManager::new();
    manager.set_tab_state(&json(TAB)).expect("tab state");
    assert_eq!(filtered_names(&manager), vec!["_cb", "__qca"]);

    manager.toggle_filter("category", "Marketing").expect("known key");
    assert_eq!(filtered_names(&manager), vec!["__qca"]);

    manager.select_frame(Some("https://ads.pubmatic.com".to_string()));
    assert_eq!(filtered_names(&manager), vec!["KRTBCOOKIE_290"]);
}

#[wasm_bindgen_test]
fn set_selected_filters_uses_callback_result() {
    let mut manager = FilterManager::new();
    manager.set_tab_state(&json(TAB)).expect("tab state");

    let update = js_sys::Function::new_with_args("prev", "return { ...prev, platform: ['Quantcast'] };");
    manager.set_selected_filters(&update).expect("update applies");
    assert_eq!(filtered_names(&manager), vec!["__qca"]);
}

#[wasm_bindgen_test]
fn undefined_callback_result_is_a_readable_error() {
    let mut manager = FilterManager::new();
    manager.set_tab_state(&json(TAB)).expect("tab state");

    let update = js_sys::Function::new_with_args("prev", "return undefined;");
    let err = manager.set_selected_filters(&update).expect_err("undefined is rejected");
    let message = err.as_string().unwrap_or_default();
    assert!(message.starts_with("Invalid selected filters"), "{message}");
    assert_eq!(filtered_names(&manager), vec!["_cb", "__qca"]);
}

#[wasm_bindgen_test]
fn clear_filter_drops_one_key() {
    let mut manager = FilterManager::new();
    manager.set_tab_state(&json(TAB)).expect("tab state");
    manager.toggle_filter("category", "Marketing").expect("known key");
    manager.toggle_filter("platform", "Quantcast").expect("known key");
    assert_eq!(filtered_names(&manager), vec!["__qca"]);

    manager.clear_filter("platform").expect("known key");
    assert_eq!(filtered_names(&manager), vec!["__qca"]);
    manager.clear_filter("category").expect("known key");
    assert_eq!(filtered_names(&manager), vec!["_cb", "__qca"]);
}

#[wasm_bindgen_test]
fn rejects_unknown_filter_key() {
    let mut manager = FilterManager::new();
    manager.set_tab_state(&json(TAB)).expect("tab state");
    assert!(manager.toggle_filter("colour", "Blue").is_err());
}

#[wasm_bindgen_test]
fn hover_and_overlay_round_trip_through_js() {
    let message = hover_message("mouseover", "IFRAME", &json(r#"{"src":"https://ads.pubmatic.com/ad"}"#))
        .expect("hover message");
    assert_eq!(stringify(&message), r#"{"hover":true,"attributes":{"src":"https://ads.pubmatic.com/ad"}}"#);
    assert!(hover_message("mouseover", "DIV", &json("{}")).expect("no message").is_undefined());

    let iframes = json(r#"[{"src":"https://ads.pubmatic.com/ad","rect":{"x":0,"y":10,"width":300,"height":250}}]"#);
    let plan = plan_overlay(&iframes, "https://ads.pubmatic.com", 0.0, 5.0).expect("plan");
    let plan: serde_json::Value = serde_json::from_str(&stringify(&plan)).expect("json");
    assert_eq!(plan["action"], "show");
    assert_eq!(plan["style"]["top"], 15.0);
}
