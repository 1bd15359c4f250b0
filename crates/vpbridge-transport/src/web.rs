//! Browser page backed by `web_sys::Window`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlIFrameElement, MessageEvent, Window};

use crate::error::{Result, TransportError};
use crate::traits::{HostPage, InboundEvent, MessageHandler};

/// The document the bridge script is running in.
pub struct WebPage {
    window: Window,
}

impl WebPage {
    /// Bind to the global `window`.
    pub fn from_global() -> Result<Self> {
        let window = web_sys::window().ok_or(TransportError::NoWindow)?;
        Ok(Self { window })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl HostPage for WebPage {
    type Frame = HtmlIFrameElement;

    fn supports_serialization(&self) -> bool {
        let json = match js_sys::Reflect::get(&self.window, &JsValue::from_str("JSON")) {
            Ok(json) if json.is_object() => json,
            _ => return false,
        };
        js_sys::Reflect::get(&json, &JsValue::from_str("stringify"))
            .map(|stringify| stringify.is_function())
            .unwrap_or(false)
    }

    fn frame_by_id(&self, element_id: &str) -> Option<HtmlIFrameElement> {
        self.window
            .document()?
            .get_element_by_id(element_id)?
            .dyn_into::<HtmlIFrameElement>()
            .ok()
    }

    fn post_message(
        &self,
        frame: &HtmlIFrameElement,
        message: &str,
        target_origin: &str,
    ) -> Result<()> {
        let target = frame
            .content_window()
            .ok_or_else(|| TransportError::NoContentWindow(frame.id()))?;
        target
            .post_message(&JsValue::from_str(message), target_origin)
            .map_err(|err| TransportError::PostFailed(format!("{err:?}")))
    }

    fn add_message_listener(&self, mut handler: MessageHandler) -> Result<()> {
        let closure = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            // Structured-clone payloads are not part of the protocol; an empty
            // payload fails to parse and is discarded downstream.
            let data = event.data().as_string().unwrap_or_default();
            handler(InboundEvent::new(event.origin(), data));
        });

        self.window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .map_err(|err| TransportError::ListenerAttach(format!("{err:?}")))?;

        // Attached for the lifetime of the page; there is no teardown.
        closure.forget();
        Ok(())
    }
}
