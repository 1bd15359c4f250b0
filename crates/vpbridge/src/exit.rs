use std::fmt;
use std::io;

use vpbridge_host::{HostError, RejectionKind};
use vpbridge_schema::SchemaError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
/// The bridge discarded a message or refused a request.
pub const REJECTED: i32 = 2;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => FAILURE,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn host_error(context: &str, err: HostError) -> CliError {
    let code = match err.kind() {
        RejectionKind::UntrustedOrigin
        | RejectionKind::MalformedPayload
        | RejectionKind::UnsupportedType
        | RejectionKind::InvalidIdentifier => USAGE,
        RejectionKind::TargetUnavailable | RejectionKind::SerializationUnsupported => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    match err {
        SchemaError::LoadFailed(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}
