use vpbridge_protocol::{TrustedOrigin, WireMode};

/// Bridge configuration, fixed when the bridge is built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BridgeConfig {
    /// Only origin accepted inbound and targeted outbound.
    pub trusted_origin: TrustedOrigin,
    /// Wire protocol variant.
    pub mode: WireMode,
}

impl BridgeConfig {
    pub fn new(trusted_origin: impl Into<String>, mode: WireMode) -> Self {
        Self {
            trusted_origin: TrustedOrigin::new(trusted_origin),
            mode,
        }
    }

    /// Override the trusted origin.
    pub fn with_trusted_origin(mut self, origin: impl Into<String>) -> Self {
        self.trusted_origin = TrustedOrigin::new(origin);
        self
    }

    /// Override the wire mode.
    pub fn with_mode(mut self, mode: WireMode) -> Self {
        self.mode = mode;
        self
    }
}
