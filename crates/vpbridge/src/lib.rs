//! Cross-document message bridge between a host page and embedded video players.
//!
//! The host page asks a player frame to do something with a request; player
//! frames report readiness and ask the host to run callbacks with inbound
//! messages. Everything travels as JSON text over `postMessage`, scoped to one
//! trusted origin.
//!
//! # Crate Structure
//!
//! - [`protocol`]: Wire shapes, identifier rules, wire modes
//! - [`transport`]: Host page abstraction (in-memory page, browser page behind `web`)
//! - [`schema`]: Optional callback argument schemas (behind `schema` feature)
//! - [`host`]: The bridge itself: listener, requester, readiness (behind `host` feature)

/// Re-export protocol types.
pub mod protocol {
    pub use vpbridge_protocol::*;
}

/// Re-export transport types.
pub mod transport {
    pub use vpbridge_transport::*;
}

/// Re-export schema types (requires `schema` feature).
#[cfg(feature = "schema")]
pub mod schema {
    pub use vpbridge_schema::*;
}

/// Re-export host types (requires `host` feature).
#[cfg(feature = "host")]
pub mod host {
    pub use vpbridge_host::*;
}
