//! Inbound listener: origin check, decode, then record readiness or run a
//! callback. Every failure is a silent discard.

use vpbridge_protocol::{decode_inbound, FunctionName, InboundMessage, PlayerId, ProtocolError};
use vpbridge_transport::{HostPage, InboundEvent};

use crate::bridge::Bridge;
use crate::error::{Direction, HostError, Result};

/// What the listener did with an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A readiness notification was recorded.
    Ready {
        player: PlayerId,
        /// False when the player was already ready.
        newly_ready: bool,
    },
    /// A host callback ran.
    Invoked { function: FunctionName },
}

impl<P: HostPage> Bridge<P> {
    /// Process one inbound message.
    ///
    /// The attached page listener ignores the result; it is returned for
    /// callers that drive the bridge directly. Failures are also reported to the
    /// diagnostic hook, if one is installed.
    pub fn handle_message(&self, event: &InboundEvent) -> Result<Dispatch> {
        let result = self.dispatch(event);
        if let Err(err) = &result {
            self.report(Direction::Inbound, err);
        }
        result
    }

    fn dispatch(&self, event: &InboundEvent) -> Result<Dispatch> {
        let config = &self.shared.config;
        if !config.trusted_origin.matches(&event.origin) {
            return Err(ProtocolError::UntrustedOrigin(event.origin.clone()).into());
        }

        match decode_inbound(&event.data, config.mode)? {
            InboundMessage::Ready(player) => {
                let newly_ready = self
                    .shared
                    .readiness
                    .borrow_mut()
                    .mark_ready(player.clone());
                if newly_ready {
                    tracing::debug!(%player, "player ready");
                }
                Ok(Dispatch::Ready {
                    player,
                    newly_ready,
                })
            }
            InboundMessage::Callback { name, argument } => {
                // Clone the handle out so the callback may re-enter the bridge.
                let callback = self.shared.callbacks.borrow().get(&name);
                let callback = callback.ok_or_else(|| HostError::UnknownCallback(name.clone()))?;

                #[cfg(feature = "schema")]
                if let Some(schemas) = self.shared.schemas.borrow().as_ref() {
                    schemas.validate(name.as_str(), argument.value())?;
                }

                callback(&argument);
                tracing::debug!(function = %name, "callback invoked");
                Ok(Dispatch::Invoked { function: name })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::{json, Value};
    use vpbridge_protocol::{encode_inbound, MessageType, WireMode, DEFAULT_TRUSTED_ORIGIN};
    use vpbridge_transport::MemoryPage;

    use super::*;
    use crate::config::BridgeConfig;
    use crate::error::{Rejection, RejectionKind};

    const PLAYER: &str = "ab12CD34ef";

    fn bridge(mode: WireMode) -> Bridge<MemoryPage> {
        Bridge::new(MemoryPage::new(), BridgeConfig::default().with_mode(mode))
    }

    fn event(data: &str) -> InboundEvent {
        InboundEvent::new(DEFAULT_TRUSTED_ORIGIN, data)
    }

    fn recorder(bridge: &Bridge<MemoryPage>, name: &str) -> Rc<RefCell<Vec<Value>>> {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        bridge
            .register_callback(name, move |arg| sink.borrow_mut().push(arg.value().clone()))
            .unwrap();
        calls
    }

    #[test]
    fn ready_message_marks_player() {
        let bridge = bridge(WireMode::Tracked);
        let dispatch = bridge
            .handle_message(&event(
                r#"{"type":"ready","functionName":"","functionParameter":"ab12CD34ef"}"#,
            ))
            .unwrap();

        let player = PlayerId::parse(PLAYER).unwrap();
        assert_eq!(
            dispatch,
            Dispatch::Ready {
                player: player.clone(),
                newly_ready: true
            }
        );
        assert!(bridge.is_ready(&player));
    }

    #[test]
    fn repeated_ready_is_idempotent() {
        let bridge = bridge(WireMode::Tracked);
        let msg = encode_inbound(MessageType::Ready, "", json!(PLAYER));

        bridge.handle_message(&event(&msg)).unwrap();
        let second = bridge.handle_message(&event(&msg)).unwrap();

        assert!(matches!(second, Dispatch::Ready { newly_ready: false, .. }));
        assert_eq!(bridge.ready_players(), vec![PlayerId::parse(PLAYER).unwrap()]);
    }

    #[test]
    fn callback_invoked_with_literal_argument() {
        let bridge = bridge(WireMode::Tracked);
        let calls = recorder(&bridge, "onPlayerReady");

        bridge
            .handle_message(&event(
                r#"{"type":"callback","functionName":"onPlayerReady","functionParameter":"42"}"#,
            ))
            .unwrap();

        assert_eq!(*calls.borrow(), vec![json!(42)]);
    }

    #[test]
    fn untrusted_origin_has_no_effect() {
        let bridge = bridge(WireMode::Tracked);
        let calls = recorder(&bridge, "onPlay");

        for origin in ["https://evil.example", "https://vidbeo.com/", "null", ""] {
            for data in [
                encode_inbound(MessageType::Ready, "", json!(PLAYER)),
                encode_inbound(MessageType::Callback, "onPlay", json!(1)),
            ] {
                let err = bridge
                    .handle_message(&InboundEvent::new(origin, data))
                    .unwrap_err();
                assert_eq!(err.kind(), RejectionKind::UntrustedOrigin);
            }
        }

        assert!(bridge.ready_players().is_empty());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn missing_fields_are_discarded() {
        let bridge = bridge(WireMode::Tracked);
        let calls = recorder(&bridge, "onPlay");

        for data in [
            r#"{"functionName":"onPlay","functionParameter":1}"#,
            r#"{"type":"callback","functionParameter":1}"#,
            r#"{"type":"callback","functionName":"onPlay"}"#,
            r#"{"type":"ready","functionName":""}"#,
            "null",
            "",
            "{",
        ] {
            let err = bridge.handle_message(&event(data)).unwrap_err();
            assert_eq!(err.kind(), RejectionKind::MalformedPayload, "{data}");
        }

        assert!(bridge.ready_players().is_empty());
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn injected_function_name_never_runs() {
        let bridge = bridge(WireMode::Tracked);
        let calls = recorder(&bridge, "alert");

        let err = bridge
            .handle_message(&event(
                r#"{"type":"callback","functionName":"alert(1);x","functionParameter":null}"#,
            ))
            .unwrap_err();

        assert_eq!(err.kind(), RejectionKind::InvalidIdentifier);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn unregistered_callback_is_discarded() {
        let bridge = bridge(WireMode::Tracked);
        let err = bridge
            .handle_message(&event(&encode_inbound(
                MessageType::Callback,
                "onMissing",
                json!(null),
            )))
            .unwrap_err();
        assert!(
            matches!(err, HostError::UnknownCallback(ref name) if name.as_str() == "onMissing")
        );
    }

    #[test]
    fn bad_player_ids_leave_table_unchanged() {
        let bridge = bridge(WireMode::Tracked);
        for id in ["ab12CD34e", "ab12CD34efg", "ab12-D34ef"] {
            let msg = encode_inbound(MessageType::Ready, "", json!(id));
            let err = bridge.handle_message(&event(&msg)).unwrap_err();
            assert_eq!(err.kind(), RejectionKind::InvalidIdentifier);
        }
        assert!(bridge.ready_players().is_empty());
    }

    #[test]
    fn ready_unsupported_in_callback_mode() {
        let bridge = bridge(WireMode::Callback);
        let msg = encode_inbound(MessageType::Ready, "", json!(PLAYER));
        let err = bridge.handle_message(&event(&msg)).unwrap_err();

        assert_eq!(err.kind(), RejectionKind::UnsupportedType);
        assert!(bridge.ready_players().is_empty());
    }

    #[test]
    fn diagnostics_observe_discards() {
        let bridge = bridge(WireMode::Tracked);
        let seen: Rc<RefCell<Vec<Rejection>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bridge.set_diagnostics(move |rejection| sink.borrow_mut().push(rejection.clone()));

        let _ = bridge.handle_message(&InboundEvent::new("https://evil.example", "{}"));
        let _ = bridge.handle_message(&event(
            r#"{"type":"x","functionName":"a","functionParameter":1}"#,
        ));

        let kinds: Vec<RejectionKind> = seen.borrow().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RejectionKind::UntrustedOrigin, RejectionKind::UnsupportedType]
        );
    }

    #[test]
    fn attached_listener_dispatches_page_events() {
        let page = MemoryPage::new();
        let bridge = Bridge::new(page.clone(), BridgeConfig::default());
        let calls = recorder(&bridge, "onTimeUpdate");
        bridge.initialize().unwrap();

        page.deliver(
            DEFAULT_TRUSTED_ORIGIN,
            &encode_inbound(MessageType::Callback, "onTimeUpdate", json!("12.5")),
        );
        page.deliver("https://evil.example", "garbage");

        assert_eq!(*calls.borrow(), vec![json!(12.5)]);
    }

    #[test]
    fn callback_may_reenter_bridge() {
        let bridge = bridge(WireMode::Tracked);
        let inner = bridge.clone();
        let names = Rc::new(RefCell::new(Vec::new()));
        let sink = names.clone();
        bridge
            .register_callback("onPlay", move |_| {
                inner.register_callback("onPause", |_| {}).unwrap();
                *sink.borrow_mut() = inner.callback_names();
            })
            .unwrap();

        bridge
            .handle_message(&event(&encode_inbound(MessageType::Callback, "onPlay", json!(null))))
            .unwrap();

        assert_eq!(*names.borrow(), vec!["onPause", "onPlay"]);
    }

    #[cfg(feature = "schema")]
    #[test]
    fn parameter_schema_blocks_unexpected_arguments() {
        let bridge = bridge(WireMode::Tracked);
        let calls = recorder(&bridge, "onTimeUpdate");
        let schemas = vpbridge_schema::ParameterSchemas::from_embedded(&[(
            "onTimeUpdate",
            r#"{"type":"number","minimum":0}"#,
        )])
        .unwrap();
        bridge.set_parameter_schemas(schemas);

        let ok = encode_inbound(MessageType::Callback, "onTimeUpdate", json!("3.5"));
        let bad = encode_inbound(MessageType::Callback, "onTimeUpdate", json!("1);alert(1"));

        bridge.handle_message(&event(&ok)).unwrap();
        let err = bridge.handle_message(&event(&bad)).unwrap_err();

        assert_eq!(err.kind(), RejectionKind::MalformedPayload);
        assert_eq!(*calls.borrow(), vec![json!(3.5)]);
    }

    #[cfg(feature = "schema")]
    #[test]
    fn unregistered_callback_wins_over_schema_failure() {
        let bridge = bridge(WireMode::Tracked);
        let schemas = vpbridge_schema::ParameterSchemas::from_embedded(&[(
            "onSeeked",
            r#"{"type":"number"}"#,
        )])
        .unwrap();
        bridge.set_parameter_schemas(schemas);

        let msg = encode_inbound(MessageType::Callback, "onSeeked", json!("not a number"));
        let err = bridge.handle_message(&event(&msg)).unwrap_err();

        assert!(matches!(err, HostError::UnknownCallback(_)));
        assert_eq!(err.kind(), RejectionKind::InvalidIdentifier);
    }
}
