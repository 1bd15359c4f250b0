//! Host page abstraction for the player bridge.
//!
//! The bridge needs four things from the page it runs in:
//! - a way to tell whether structured data can be serialized
//! - frame lookup by element id
//! - `postMessage` to a frame's content window with a target origin
//! - a listener slot for inbound cross-document messages
//!
//! [`HostPage`] captures exactly that. [`MemoryPage`] implements it in-process
//! for tests and tooling; `WebPage` (feature `web`) implements it over the
//! browser's `window`.

pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "web")]
pub mod web;

pub use error::{Result, TransportError};
pub use memory::{MemoryFrame, MemoryPage, PostedMessage};
pub use traits::{HostPage, InboundEvent, MessageHandler};

#[cfg(feature = "web")]
pub use web::WebPage;
