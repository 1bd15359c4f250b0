use std::fmt;

use serde::{Deserialize, Serialize};

/// Origin the embedded players are served from.
pub const DEFAULT_TRUSTED_ORIGIN: &str = "https://vidbeo.com";

/// The single origin accepted inbound and targeted outbound.
///
/// Comparison is exact string equality, the same check the browser applies to
/// `MessageEvent.origin`. No normalization is performed, so a trailing slash or
/// a different scheme never matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustedOrigin(String);

impl TrustedOrigin {
    pub fn new(origin: impl Into<String>) -> Self {
        Self(origin.into())
    }

    pub fn matches(&self, origin: &str) -> bool {
        self.0 == origin
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TrustedOrigin {
    fn default() -> Self {
        Self::new(DEFAULT_TRUSTED_ORIGIN)
    }
}

impl fmt::Display for TrustedOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
