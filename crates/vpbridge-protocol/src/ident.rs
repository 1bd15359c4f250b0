//! Identifier rules shared by both directions of the bridge.
//!
//! Function names and player ids are the only message fields that reach
//! dispatch, so both are restricted to `[a-zA-Z0-9]+`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ProtocolError, Result};

/// Exact length of an embedded player id.
pub const PLAYER_ID_LEN: usize = 10;

/// Returns true if `value` is non-empty and every byte is an ASCII letter or digit.
pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Identifier of one embedded player instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Validate and wrap a player id.
    pub fn parse(value: &str) -> Result<Self> {
        if value.len() != PLAYER_ID_LEN || !is_alphanumeric(value) {
            return Err(ProtocolError::invalid("player id", value));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Name of a host-side callback, as carried in `functionName`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FunctionName(String);

impl FunctionName {
    /// Validate and wrap a function name.
    pub fn parse(value: &str) -> Result<Self> {
        if !is_alphanumeric(value) {
            return Err(ProtocolError::invalid("function name", value));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for FunctionName {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
