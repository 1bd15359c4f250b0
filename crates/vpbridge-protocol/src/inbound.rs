//! Inbound message decoding.
//!
//! Wire shape: `{"type": ..., "functionName": ..., "functionParameter": ...}`
//! carried as JSON text. Decoding runs the checks in a fixed order: parse,
//! shape, type, then the identifier rule for the message type.

use serde_json::{Map, Value};

use crate::error::{ProtocolError, Result};
use crate::ident::{FunctionName, PlayerId};
use crate::mode::{MessageType, WireMode};

pub const FIELD_TYPE: &str = "type";
pub const FIELD_FUNCTION_NAME: &str = "functionName";
pub const FIELD_FUNCTION_PARAMETER: &str = "functionParameter";

/// A validated inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// The player with this id is ready.
    Ready(PlayerId),
    /// Run the named host callback with this argument.
    Callback {
        name: FunctionName,
        argument: CallbackArgument,
    },
}

impl InboundMessage {
    pub fn kind(&self) -> MessageType {
        match self {
            Self::Ready(_) => MessageType::Ready,
            Self::Callback { .. } => MessageType::Callback,
        }
    }
}

/// Argument handed to a host callback.
///
/// Players send the parameter as it would appear inside a call expression, so a
/// string holding a scalar literal (`"42"`, `"true"`, `"null"`) is passed as that
/// scalar. Any other string is passed as text. Non-string values pass unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackArgument(Value);

impl CallbackArgument {
    pub fn from_wire(value: Value) -> Self {
        match value {
            Value::String(text) => match serde_json::from_str::<Value>(&text) {
                Ok(scalar @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => Self(scalar),
                _ => Self(Value::String(text)),
            },
            other => Self(other),
        }
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_i64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.as_f64()
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl From<Value> for CallbackArgument {
    fn from(value: Value) -> Self {
        Self::from_wire(value)
    }
}

/// Decode and validate an inbound payload for the given wire mode.
pub fn decode_inbound(payload: &str, mode: WireMode) -> Result<InboundMessage> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Object(mut object) = value else {
        return Err(ProtocolError::NotAnObject);
    };

    let kind = take_field(&mut object, FIELD_TYPE)?;
    let name = take_field(&mut object, FIELD_FUNCTION_NAME)?;
    let parameter = take_field(&mut object, FIELD_FUNCTION_PARAMETER)?;

    let kind = match kind.as_str().and_then(MessageType::from_literal) {
        Some(kind) if mode.accepts(kind) => kind,
        _ => {
            return Err(ProtocolError::UnsupportedType {
                kind: literal_text(&kind),
                mode,
            })
        }
    };

    match kind {
        MessageType::Ready => {
            let id = match parameter.as_str() {
                Some(text) => PlayerId::parse(text)?,
                None => {
                    return Err(ProtocolError::InvalidIdentifier {
                        what: "player id",
                        value: parameter.to_string(),
                    })
                }
            };
            Ok(InboundMessage::Ready(id))
        }
        MessageType::Callback => {
            let name = match name.as_str() {
                Some(text) => FunctionName::parse(text)?,
                None => {
                    return Err(ProtocolError::InvalidIdentifier {
                        what: "function name",
                        value: name.to_string(),
                    })
                }
            };
            Ok(InboundMessage::Callback {
                name,
                argument: CallbackArgument::from_wire(parameter),
            })
        }
    }
}

/// Build the wire text of an inbound message. Used by tests and tooling that
/// play the player side of the bridge.
pub fn encode_inbound(kind: MessageType, function_name: &str, parameter: Value) -> String {
    serde_json::json!({
        FIELD_TYPE: kind.as_str(),
        FIELD_FUNCTION_NAME: function_name,
        FIELD_FUNCTION_PARAMETER: parameter,
    })
    .to_string()
}

fn take_field(object: &mut Map<String, Value>, field: &'static str) -> Result<Value> {
    object
        .remove(field)
        .ok_or(ProtocolError::MissingField(field))
}

fn literal_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
