//! Wire modes and message type literals.
//!
//! A bridge runs in exactly one mode. The mode fixes both the inbound `type`
//! values that are accepted and the outbound request shape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Inbound type: a player reports it is ready to receive requests.
pub const TYPE_READY: &str = "ready";

/// Inbound type: a player asks the host to run a named callback.
pub const TYPE_CALLBACK: &str = "callback";

/// Inbound message kind after the type check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Ready,
    Callback,
}

impl MessageType {
    pub fn from_literal(value: &str) -> Option<Self> {
        match value {
            TYPE_READY => Some(Self::Ready),
            TYPE_CALLBACK => Some(Self::Callback),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => TYPE_READY,
            Self::Callback => TYPE_CALLBACK,
        }
    }
}

/// Active wire protocol configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireMode {
    /// Callbacks only; outbound `{functionName, functionParameter, callbackName}`.
    Callback,
    /// Readiness-tracked; outbound `{action, embedId, parameter1, parameter2}`.
    #[default]
    Tracked,
}

impl WireMode {
    /// Whether `kind` is accepted on the inbound side.
    pub fn accepts(self, kind: MessageType) -> bool {
        match self {
            Self::Callback => kind == MessageType::Callback,
            Self::Tracked => true,
        }
    }

    /// Whether outbound requests require the target player to be ready.
    pub fn tracks_readiness(self) -> bool {
        matches!(self, Self::Tracked)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Callback => "callback",
            Self::Tracked => "tracked",
        }
    }
}

impl fmt::Display for WireMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireMode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "callback" | "a" => Ok(Self::Callback),
            "tracked" | "b" => Ok(Self::Tracked),
            _ => Err(ProtocolError::InvalidIdentifier {
                what: "wire mode",
                value: s.to_string(),
            }),
        }
    }
}
