use std::fmt;

use serde::Serialize;
use vpbridge_protocol::{FunctionName, PlayerId, ProtocolError};
use vpbridge_transport::TransportError;

/// Errors that can occur in bridge operations.
///
/// None of these reach the page: inbound failures are discarded and outbound
/// failures collapse to `false`. The typed error is available through the
/// `try_*` methods and the diagnostic hook.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Message or request failed protocol validation.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Page-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The target player has not reported ready.
    #[error("player {0} is not ready")]
    NotReady(PlayerId),

    /// No callback is registered under this name.
    #[error("no callback registered as {0}")]
    UnknownCallback(FunctionName),

    /// Callback argument failed its parameter schema.
    #[cfg(feature = "schema")]
    #[error("schema validation error: {0}")]
    Schema(#[from] vpbridge_schema::SchemaError),
}

impl HostError {
    /// Classify this error.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::Protocol(err) => match err {
                ProtocolError::UntrustedOrigin(_) => RejectionKind::UntrustedOrigin,
                ProtocolError::UnsupportedType { .. } => RejectionKind::UnsupportedType,
                ProtocolError::InvalidIdentifier { .. } => RejectionKind::InvalidIdentifier,
                ProtocolError::InvalidJson(_)
                | ProtocolError::NotAnObject
                | ProtocolError::MissingField(_)
                | ProtocolError::ShapeMismatch { .. } => RejectionKind::MalformedPayload,
            },
            Self::Transport(TransportError::SerializationUnsupported) => {
                RejectionKind::SerializationUnsupported
            }
            Self::Transport(_) | Self::NotReady(_) => RejectionKind::TargetUnavailable,
            Self::UnknownCallback(_) => RejectionKind::InvalidIdentifier,
            #[cfg(feature = "schema")]
            Self::Schema(_) => RejectionKind::MalformedPayload,
        }
    }
}

pub type Result<T> = std::result::Result<T, HostError>;

/// Why a message was discarded or a request was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    UntrustedOrigin,
    MalformedPayload,
    UnsupportedType,
    InvalidIdentifier,
    TargetUnavailable,
    SerializationUnsupported,
}

impl RejectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UntrustedOrigin => "untrusted_origin",
            Self::MalformedPayload => "malformed_payload",
            Self::UnsupportedType => "unsupported_type",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::TargetUnavailable => "target_unavailable",
            Self::SerializationUnsupported => "serialization_unsupported",
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the bridge produced a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// A discarded message or refused request, as seen by a diagnostic hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub direction: Direction,
    pub kind: RejectionKind,
    pub detail: String,
}

impl Rejection {
    pub fn from_error(direction: Direction, err: &HostError) -> Self {
        Self {
            direction,
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_protocol_errors() {
        let err = HostError::from(ProtocolError::UntrustedOrigin("https://x".into()));
        assert_eq!(err.kind(), RejectionKind::UntrustedOrigin);

        let err = HostError::from(ProtocolError::MissingField("type"));
        assert_eq!(err.kind(), RejectionKind::MalformedPayload);

        let err = HostError::from(ProtocolError::NotAnObject);
        assert_eq!(err.kind(), RejectionKind::MalformedPayload);
    }

    #[test]
    fn classifies_outbound_errors() {
        let err = HostError::from(TransportError::SerializationUnsupported);
        assert_eq!(err.kind(), RejectionKind::SerializationUnsupported);

        let err = HostError::from(TransportError::FrameNotFound("frame1".into()));
        assert_eq!(err.kind(), RejectionKind::TargetUnavailable);

        let err = HostError::NotReady(PlayerId::parse("ab12CD34ef").unwrap());
        assert_eq!(err.kind(), RejectionKind::TargetUnavailable);
    }

    #[test]
    fn rejection_serializes_snake_case() {
        let rejection = Rejection {
            direction: Direction::Inbound,
            kind: RejectionKind::UnsupportedType,
            detail: "x".into(),
        };
        let json = serde_json::to_value(&rejection).unwrap();
        assert_eq!(json["kind"], "unsupported_type");
        assert_eq!(json["direction"], "inbound");
    }
}
