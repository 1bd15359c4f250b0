//! Outbound requester. Fire-and-forget: a request is either posted now or
//! refused now, never queued or retried.

use serde_json::Value;
use vpbridge_protocol::{encode_outbound, OutboundRequest, PlayerId, ProtocolError};
use vpbridge_transport::{HostPage, TransportError};

use crate::bridge::Bridge;
use crate::error::{Direction, HostError, Result};

impl<P: HostPage> Bridge<P> {
    /// Send `request` to the player frame with element id `frame_id`.
    ///
    /// Returns false, without posting, when any precondition fails.
    pub fn request(&self, frame_id: &str, request: &OutboundRequest) -> bool {
        self.try_request(frame_id, request).is_ok()
    }

    /// Like [`Bridge::request`], but reports why a request was not sent.
    pub fn try_request(&self, frame_id: &str, request: &OutboundRequest) -> Result<()> {
        let result = self.send(frame_id, request);
        if let Err(err) = &result {
            self.report(Direction::Outbound, err);
        }
        result
    }

    /// Tracked mode: `{action, embedId, parameter1, parameter2}`.
    pub fn request_action(
        &self,
        frame_id: &str,
        action: &str,
        embed_id: &str,
        parameter1: Option<Value>,
        parameter2: Option<Value>,
    ) -> bool {
        let embed_id = match PlayerId::parse(embed_id) {
            Ok(id) => id,
            Err(err) => {
                self.report(Direction::Outbound, &HostError::from(err));
                return false;
            }
        };
        self.request(
            frame_id,
            &OutboundRequest::action(action, embed_id, parameter1, parameter2),
        )
    }

    /// Callback mode: `{functionName, functionParameter, callbackName}`.
    pub fn request_function(
        &self,
        frame_id: &str,
        function_name: &str,
        function_parameter: Option<Value>,
        callback_name: Option<&str>,
    ) -> bool {
        self.request(
            frame_id,
            &OutboundRequest::function(
                function_name,
                function_parameter,
                callback_name.map(str::to_string),
            ),
        )
    }

    fn send(&self, frame_id: &str, request: &OutboundRequest) -> Result<()> {
        let shared = &self.shared;
        let mode = shared.config.mode;

        if !shared.page.supports_serialization() {
            return Err(TransportError::SerializationUnsupported.into());
        }
        if request.mode() != mode {
            return Err(ProtocolError::ShapeMismatch {
                shape: request.shape_name(),
                mode,
            }
            .into());
        }
        if mode.tracks_readiness() {
            if let Some(player) = request.embed_id() {
                if !shared.readiness.borrow().is_ready(player) {
                    return Err(HostError::NotReady(player.clone()));
                }
            }
        }

        let frame = shared
            .page
            .frame_by_id(frame_id)
            .ok_or_else(|| TransportError::FrameNotFound(frame_id.to_string()))?;

        let message = encode_outbound(request, mode)?;
        let origin = shared.config.trusted_origin.as_str();
        shared.page.post_message(&frame, &message, origin)?;
        tracing::debug!(frame = frame_id, %origin, "request posted");
        Ok(())
    }
}
