//! Wire protocol for the embedded player message bridge.
//!
//! Messages travel as JSON text over the browser's cross-document messaging
//! channel. This crate owns both directions:
//! - inbound `ready`/`callback` messages from player frames
//! - outbound requests to a player frame, in one of two shapes
//!
//! Nothing here touches a page. Validation is pure, so the same rules apply in
//! the browser, in tests, and in the CLI.

pub mod error;
pub mod ident;
pub mod inbound;
pub mod mode;
pub mod origin;
pub mod outbound;

pub use error::{ProtocolError, Result};
pub use ident::{is_alphanumeric, FunctionName, PlayerId, PLAYER_ID_LEN};
pub use inbound::{
    decode_inbound, encode_inbound, CallbackArgument, InboundMessage, FIELD_FUNCTION_NAME,
    FIELD_FUNCTION_PARAMETER, FIELD_TYPE,
};
pub use mode::{MessageType, WireMode, TYPE_CALLBACK, TYPE_READY};
pub use origin::{TrustedOrigin, DEFAULT_TRUSTED_ORIGIN};
pub use outbound::{encode_outbound, ActionRequest, FunctionRequest, OutboundRequest};
