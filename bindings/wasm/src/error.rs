use wasm_bindgen::JsValue;

pub(crate) fn to_js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&format!("{context}: {err}")).into()
}

pub(crate) fn not_initialized() -> JsValue {
    js_sys::Error::new("bridge is not initialized; call initialize() first").into()
}
