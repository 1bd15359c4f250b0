//! Host side of the embedded player bridge.
//!
//! A [`Bridge`] sits in the host page and does two things:
//! - the inbound listener accepts messages from the trusted origin, records
//!   player readiness, and runs allow-listed host callbacks by name
//! - the outbound requester posts a request to one player frame, after checking
//!   the frame exists and (in tracked mode) that the player reported ready
//!
//! Every failure is local. Inbound messages that fail a check are dropped;
//! outbound requests that fail a precondition return `false`.

pub mod bridge;
pub mod config;
pub mod error;
pub mod listener;
pub mod readiness;
pub mod registry;
pub mod requester;

pub use bridge::{Bridge, DiagnosticHook};
pub use config::BridgeConfig;
pub use error::{Direction, HostError, Rejection, RejectionKind, Result};
pub use listener::Dispatch;
pub use readiness::{PlayerState, ReadinessTable};
pub use registry::{Callback, CallbackRegistry};
