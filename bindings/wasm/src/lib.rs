//! Browser exports for the player bridge.
//!
//! One bridge per page, held in a thread-local and created by `initialize`.
//! Requests return booleans and never throw; registration errors are thrown
//! as `Error` objects.

mod error;

use std::cell::RefCell;

use serde::Serialize;
use serde_json::Value;
use vpbridge_host::{Bridge, BridgeConfig};
use vpbridge_protocol::{PlayerId, WireMode, DEFAULT_TRUSTED_ORIGIN};
use vpbridge_transport::WebPage;
use wasm_bindgen::prelude::*;

use crate::error::{not_initialized, to_js_error};

thread_local! {
    static BRIDGE: RefCell<Option<Bridge<WebPage>>> = const { RefCell::new(None) };
}

/// Clone the page bridge out of the thread-local so no borrow is held while
/// callbacks run.
fn current() -> Option<Bridge<WebPage>> {
    BRIDGE.with(|slot| slot.borrow().clone())
}

fn to_js(value: &Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

/// `undefined` and `null` both mean "no parameter".
fn from_js(value: JsValue) -> Result<Option<Value>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|err| to_js_error("parameter is not JSON-serializable", err))
}

/// Create the page bridge and attach its message listener.
///
/// Returns false when the bridge was already initialized; the first
/// configuration stays in effect.
#[wasm_bindgen]
pub fn initialize(trusted_origin: Option<String>, mode: Option<String>) -> Result<bool, JsValue> {
    if let Some(bridge) = current() {
        return bridge
            .initialize()
            .map_err(|err| to_js_error("listener attach failed", err));
    }

    let mode = match mode.as_deref() {
        Some(raw) => raw
            .parse::<WireMode>()
            .map_err(|err| to_js_error("invalid mode", err))?,
        None => WireMode::default(),
    };
    let origin = trusted_origin.unwrap_or_else(|| DEFAULT_TRUSTED_ORIGIN.to_string());

    let page = WebPage::from_global().map_err(|err| to_js_error("no window", err))?;
    let bridge = Bridge::new(page, BridgeConfig::new(origin, mode));
    let attached = bridge
        .initialize()
        .map_err(|err| to_js_error("listener attach failed", err))?;

    BRIDGE.with(|slot| *slot.borrow_mut() = Some(bridge));
    Ok(attached)
}

/// Register `callback` under `name`. The player may then ask the host to run
/// it with a `callback` message.
#[wasm_bindgen(js_name = registerCallback)]
pub fn register_callback(name: &str, callback: js_sys::Function) -> Result<(), JsValue> {
    let bridge = current().ok_or_else(not_initialized)?;
    bridge
        .register_callback(name, move |argument| {
            // Exceptions thrown by the callback stay inside the callback.
            let _ = callback.call1(&JsValue::NULL, &to_js(argument.value()));
        })
        .map_err(|err| to_js_error("invalid callback name", err))
}

#[wasm_bindgen(js_name = unregisterCallback)]
pub fn unregister_callback(name: &str) -> bool {
    current().is_some_and(|bridge| bridge.unregister_callback(name))
}

/// Observe discarded messages and refused requests. The hook receives
/// `{direction, kind, detail}`.
#[wasm_bindgen(js_name = setDiagnostics)]
pub fn set_diagnostics(hook: js_sys::Function) -> Result<(), JsValue> {
    let bridge = current().ok_or_else(not_initialized)?;
    bridge.set_diagnostics(move |rejection| {
        let value = rejection
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .unwrap_or(JsValue::NULL);
        let _ = hook.call1(&JsValue::NULL, &value);
    });
    Ok(())
}

/// Tracked mode: ask the player in `iframe_id` to perform `action`.
#[wasm_bindgen]
pub fn request(
    iframe_id: &str,
    action: &str,
    embed_id: &str,
    parameter1: JsValue,
    parameter2: JsValue,
) -> bool {
    let Some(bridge) = current() else {
        return false;
    };
    let (Ok(parameter1), Ok(parameter2)) = (from_js(parameter1), from_js(parameter2)) else {
        return false;
    };
    bridge.request_action(iframe_id, action, embed_id, parameter1, parameter2)
}

/// Callback mode: ask the player in `iframe_id` to run `function_name`.
#[wasm_bindgen(js_name = requestFunction)]
pub fn request_function(
    iframe_id: &str,
    function_name: &str,
    function_parameter: JsValue,
    callback_name: Option<String>,
) -> bool {
    let Some(bridge) = current() else {
        return false;
    };
    let Ok(function_parameter) = from_js(function_parameter) else {
        return false;
    };
    bridge.request_function(
        iframe_id,
        function_name,
        function_parameter,
        callback_name.as_deref(),
    )
}

#[wasm_bindgen(js_name = isReady)]
pub fn is_ready(embed_id: &str) -> bool {
    let Some(bridge) = current() else {
        return false;
    };
    PlayerId::parse(embed_id).is_ok_and(|id| bridge.is_ready(&id))
}

#[wasm_bindgen(js_name = readyPlayers)]
pub fn ready_players() -> Vec<String> {
    current()
        .map(|bridge| {
            bridge
                .ready_players()
                .iter()
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
