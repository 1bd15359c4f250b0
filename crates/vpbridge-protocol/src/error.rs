use crate::mode::WireMode;

/// Errors that can occur while decoding or encoding bridge messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The message did not come from the trusted origin.
    #[error("untrusted origin: {0}")]
    UntrustedOrigin(String),

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The payload parsed to `null` or to something other than an object.
    #[error("payload is not a message object")]
    NotAnObject,

    /// A required top-level field is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// The `type` field is not accepted by the active wire mode.
    #[error("message type {kind:?} not supported in {mode} mode")]
    UnsupportedType { kind: String, mode: WireMode },

    /// A function name or player id failed the identifier rules.
    #[error("invalid {what}: {value:?}")]
    InvalidIdentifier { what: &'static str, value: String },

    /// The outbound request shape does not belong to the active wire mode.
    #[error("{shape} request cannot be sent in {mode} mode")]
    ShapeMismatch { shape: &'static str, mode: WireMode },
}

impl ProtocolError {
    pub(crate) fn invalid(what: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            what,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
