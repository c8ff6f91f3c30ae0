// Browser-side checks for the JS facade. Run with `wasm-pack test --headless --firefox ui_core`.

#![cfg(target_arch = "wasm32")]

use ui_core::{preview_card, UiEngine};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn engine_shows_tooltip_after_delay() {
    let mut engine = UiEngine::new(r#"{"particles":{"seed":3}}"#).unwrap();
    engine
        .show_tooltip(
            0.0,
            Some(r#"{"rect":{"left":10,"top":100,"width":40,"height":20}}"#.to_string()),
            "top",
        )
        .unwrap();

    let early: serde_json::Value = serde_json::from_str(&engine.tick(100.0).unwrap()).unwrap();
    assert_eq!(early["tooltip_visible"], false);

    let shown: serde_json::Value = serde_json::from_str(&engine.tick(180.0).unwrap()).unwrap();
    assert_eq!(shown["tooltip_visible"], true);
    assert_eq!(shown["tooltip"]["x"], 30.0);
    assert_eq!(shown["tooltip"]["y"], 92.0);
    assert_eq!(shown["tooltip_anchor"], serde_json::json!([-0.5, -1.0]));
}

#[wasm_bindgen_test]
fn engine_bursts_and_clears_particles() {
    let mut engine = UiEngine::new(r#"{"particles":{"seed":3}}"#).unwrap();
    engine
        .emit_effects(0.0, r#"[{"type":"death","x":5,"y":5}]"#)
        .unwrap();
    let frame: serde_json::Value = serde_json::from_str(&engine.tick(1.0).unwrap()).unwrap();
    assert_eq!(frame["particles"].as_array().unwrap().len(), 12);

    let later: serde_json::Value = serde_json::from_str(&engine.tick(10_000.0).unwrap()).unwrap();
    assert!(later["particles"].as_array().unwrap().is_empty());
}

#[wasm_bindgen_test]
fn bad_json_is_rejected() {
    assert!(UiEngine::new("not json").is_err());
    assert!(preview_card("{").is_err());
}

#[wasm_bindgen_test]
fn preview_card_from_js() {
    let out = preview_card(r#"{"card":{"block":5},"player":{"dexterity":3,"frail":1}}"#).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["block"], 6);
    assert_eq!(json["tone"], "buffed");
}
