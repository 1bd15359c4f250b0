//! In-process page used by tests and the CLI.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Result, TransportError};
use crate::traits::{HostPage, InboundEvent, MessageHandler};

/// A message that reached a frame's document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub message: String,
    pub target_origin: String,
}

#[derive(Debug, Default)]
struct FrameState {
    delivered: Vec<PostedMessage>,
    dropped: Vec<PostedMessage>,
}

/// An embedded frame whose document lives at a fixed origin.
///
/// Cloning yields another handle to the same frame.
#[derive(Debug, Clone)]
pub struct MemoryFrame {
    id: String,
    origin: String,
    state: Rc<RefCell<FrameState>>,
}

impl MemoryFrame {
    fn new(id: &str, origin: &str) -> Self {
        Self {
            id: id.to_string(),
            origin: origin.to_string(),
            state: Rc::new(RefCell::new(FrameState::default())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Messages the frame's document received.
    pub fn delivered(&self) -> Vec<PostedMessage> {
        self.state.borrow().delivered.clone()
    }

    /// Messages posted with a target origin the document did not match.
    pub fn dropped(&self) -> Vec<PostedMessage> {
        self.state.borrow().dropped.clone()
    }

    fn receive(&self, message: &str, target_origin: &str) {
        let posted = PostedMessage {
            message: message.to_string(),
            target_origin: target_origin.to_string(),
        };
        let mut state = self.state.borrow_mut();
        if target_origin == "*" || target_origin == self.origin {
            state.delivered.push(posted);
        } else {
            tracing::trace!(frame = %self.id, target_origin, "target origin mismatch, dropping");
            state.dropped.push(posted);
        }
    }
}

/// A page with a set of frames and a list of message listeners.
///
/// Cloning yields another handle to the same page.
#[derive(Clone)]
pub struct MemoryPage {
    frames: Rc<RefCell<HashMap<String, MemoryFrame>>>,
    listeners: Rc<RefCell<Vec<MessageHandler>>>,
    serialization: Rc<Cell<bool>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self {
            frames: Rc::new(RefCell::new(HashMap::new())),
            listeners: Rc::new(RefCell::new(Vec::new())),
            serialization: Rc::new(Cell::new(true)),
        }
    }

    /// Insert a frame element whose document is served from `origin`.
    pub fn insert_frame(&self, element_id: &str, origin: &str) -> MemoryFrame {
        let frame = MemoryFrame::new(element_id, origin);
        self.frames
            .borrow_mut()
            .insert(element_id.to_string(), frame.clone());
        frame
    }

    pub fn remove_frame(&self, element_id: &str) -> Option<MemoryFrame> {
        self.frames.borrow_mut().remove(element_id)
    }

    pub fn frame(&self, element_id: &str) -> Option<MemoryFrame> {
        self.frames.borrow().get(element_id).cloned()
    }

    /// Toggle structured serialization support.
    pub fn set_serialization(&self, supported: bool) {
        self.serialization.set(supported);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Dispatch an inbound message to every attached listener.
    ///
    /// Returns the number of listeners that ran. Listeners attached while the
    /// event is being dispatched only see later events.
    pub fn deliver(&self, origin: &str, data: &str) -> usize {
        let mut running = std::mem::take(&mut *self.listeners.borrow_mut());
        for handler in running.iter_mut() {
            handler(InboundEvent::new(origin, data));
        }
        let count = running.len();

        let mut listeners = self.listeners.borrow_mut();
        running.append(&mut listeners);
        *listeners = running;
        count
    }
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryPage")
            .field("frames", &self.frames.borrow().len())
            .field("listeners", &self.listeners.borrow().len())
            .field("serialization", &self.serialization.get())
            .finish()
    }
}

impl HostPage for MemoryPage {
    type Frame = MemoryFrame;

    fn supports_serialization(&self) -> bool {
        self.serialization.get()
    }

    fn frame_by_id(&self, element_id: &str) -> Option<MemoryFrame> {
        self.frame(element_id)
    }

    fn post_message(&self, frame: &MemoryFrame, message: &str, target_origin: &str) -> Result<()> {
        if !self.frames.borrow().contains_key(frame.id()) {
            return Err(TransportError::NoContentWindow(frame.id().to_string()));
        }
        frame.receive(message, target_origin);
        Ok(())
    }

    fn add_message_listener(&self, handler: MessageHandler) -> Result<()> {
        self.listeners.borrow_mut().push(handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://player.example";

    #[test]
    fn frame_lookup_by_id() {
        let page = MemoryPage::new();
        page.insert_frame("frame1", ORIGIN);

        assert!(page.frame_by_id("frame1").is_some());
        assert!(page.frame_by_id("frame2").is_none());

        page.remove_frame("frame1");
        assert!(page.frame_by_id("frame1").is_none());
    }

    #[test]
    fn post_respects_target_origin() {
        let page = MemoryPage::new();
        let frame = page.insert_frame("frame1", ORIGIN);

        page.post_message(&frame, "hello", ORIGIN).unwrap();
        page.post_message(&frame, "sneaky", "https://other.example")
            .unwrap();

        assert_eq!(frame.delivered().len(), 1);
        assert_eq!(frame.delivered()[0].message, "hello");
        assert_eq!(frame.dropped().len(), 1);
    }

    #[test]
    fn post_to_detached_frame_fails() {
        let page = MemoryPage::new();
        let frame = page.insert_frame("frame1", ORIGIN);
        page.remove_frame("frame1");

        assert!(matches!(
            page.post_message(&frame, "hello", ORIGIN),
            Err(TransportError::NoContentWindow(_))
        ));
    }

    #[test]
    fn deliver_reaches_all_listeners() {
        let page = MemoryPage::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..2 {
            let seen = seen.clone();
            page.add_message_listener(Box::new(move |event| {
                seen.borrow_mut().push(event);
            }))
            .unwrap();
        }

        assert_eq!(page.deliver(ORIGIN, "{}"), 2);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[0], InboundEvent::new(ORIGIN, "{}"));
    }

    #[test]
    fn listener_added_during_delivery_is_kept() {
        let page = MemoryPage::new();
        let inner_page = page.clone();
        page.add_message_listener(Box::new(move |_| {
            if inner_page.listener_count() == 0 {
                let _ = inner_page.add_message_listener(Box::new(|_| {}));
            }
        }))
        .unwrap();

        assert_eq!(page.deliver(ORIGIN, "{}"), 1);
        assert_eq!(page.listener_count(), 2);
    }

    #[test]
    fn serialization_toggle() {
        let page = MemoryPage::new();
        assert!(page.supports_serialization());
        page.set_serialization(false);
        assert!(!page.supports_serialization());
    }
}
