use crate::error::Result;

/// A cross-document message as delivered to the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Origin of the sending document, e.g. `https://vidbeo.com`.
    pub origin: String,
    /// Raw text payload.
    pub data: String,
}

impl InboundEvent {
    pub fn new(origin: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            data: data.into(),
        }
    }
}

/// Callback the page invokes for every inbound message.
pub type MessageHandler = Box<dyn FnMut(InboundEvent)>;

/// The page the bridge is embedded in.
///
/// Delivery is single-threaded: handlers run to completion one event at a time,
/// so implementations are free to use `Rc`/`RefCell` internally.
pub trait HostPage {
    /// Handle to a resolved frame element.
    type Frame;

    /// Whether the page can serialize structured data to text.
    fn supports_serialization(&self) -> bool;

    /// Resolve a frame element by its id.
    ///
    /// Returns `None` when the element is missing, is not a frame, or is a
    /// lazily-loaded embed that has not been activated yet.
    fn frame_by_id(&self, element_id: &str) -> Option<Self::Frame>;

    /// Post `message` to the frame's content window.
    ///
    /// Only a document whose origin equals `target_origin` receives it; that
    /// filtering is the page's job, not the caller's.
    fn post_message(&self, frame: &Self::Frame, message: &str, target_origin: &str) -> Result<()>;

    /// Attach a handler for all inbound cross-document messages.
    fn add_message_listener(&self, handler: MessageHandler) -> Result<()>;
}
