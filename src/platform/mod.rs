//! Browser bindings (wasm only)
//!
//! - `listener`: DOM event subscriptions that unsubscribe when dropped
//! - `dom`: word display, on-screen keyboard and scoreboard
//! - `stage_view`: the ragdoll canvas, attached and detached on demand

pub mod dom;
pub mod listener;
pub mod stage_view;

pub use listener::Listener;
pub use stage_view::StageView;

use wasm_bindgen::JsValue;

/// Browser `window`, as an error instead of a panic
pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<web_sys::Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Milliseconds since the epoch
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}
