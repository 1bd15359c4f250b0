//! Outbound request shapes.
//!
//! Two incompatible shapes exist, one per [`WireMode`]. Optional fields are
//! always present on the wire and serialize as `null` when unset.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProtocolError, Result};
use crate::ident::PlayerId;
use crate::mode::WireMode;

/// Request sent to a player frame in callback mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRequest {
    pub function_name: String,
    pub function_parameter: Option<Value>,
    pub callback_name: Option<String>,
}

/// Request sent to a player frame in tracked mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub action: String,
    pub embed_id: PlayerId,
    pub parameter1: Option<Value>,
    pub parameter2: Option<Value>,
}

/// An outbound request in either wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundRequest {
    Function(FunctionRequest),
    Action(ActionRequest),
}

impl OutboundRequest {
    pub fn function(
        function_name: impl Into<String>,
        function_parameter: Option<Value>,
        callback_name: Option<String>,
    ) -> Self {
        Self::Function(FunctionRequest {
            function_name: function_name.into(),
            function_parameter,
            callback_name,
        })
    }

    pub fn action(
        action: impl Into<String>,
        embed_id: PlayerId,
        parameter1: Option<Value>,
        parameter2: Option<Value>,
    ) -> Self {
        Self::Action(ActionRequest {
            action: action.into(),
            embed_id,
            parameter1,
            parameter2,
        })
    }

    /// The wire mode this shape belongs to.
    pub fn mode(&self) -> WireMode {
        match self {
            Self::Function(_) => WireMode::Callback,
            Self::Action(_) => WireMode::Tracked,
        }
    }

    /// Player the request is addressed to, when the shape carries one.
    pub fn embed_id(&self) -> Option<&PlayerId> {
        match self {
            Self::Function(_) => None,
            Self::Action(request) => Some(&request.embed_id),
        }
    }

    /// Short name of the shape, for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Action(_) => "action",
        }
    }
}

/// Serialize `request` for the given mode, rejecting the other mode's shape.
pub fn encode_outbound(request: &OutboundRequest, mode: WireMode) -> Result<String> {
    if request.mode() != mode {
        return Err(ProtocolError::ShapeMismatch {
            shape: request.shape_name(),
            mode,
        });
    }
    Ok(serde_json::to_string(request)?)
}
