/// Errors that can occur while talking to the host page.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The page has no global window (not running in a browser document).
    #[error("no global window available")]
    NoWindow,

    /// No frame element with this id exists on the page.
    #[error("frame element not found: {0}")]
    FrameNotFound(String),

    /// The frame element exists but has no content window yet.
    #[error("frame {0} has no content window")]
    NoContentWindow(String),

    /// The page cannot serialize structured data to text.
    #[error("structured serialization unavailable")]
    SerializationUnsupported,

    /// Posting the message to the frame window failed.
    #[error("post to frame failed: {0}")]
    PostFailed(String),

    /// The message listener could not be attached to the page.
    #[error("failed to attach message listener: {0}")]
    ListenerAttach(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
