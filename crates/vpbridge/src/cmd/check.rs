use serde::Serialize;
use serde_json::Value;
use vpbridge_host::{Dispatch, RejectionKind};
use vpbridge_transport::InboundEvent;

use crate::cmd::{build_bridge, CheckArgs};
use crate::exit::{io_error, CliResult, REJECTED, SUCCESS};
use crate::output::{cell, print_record, OutputFormat, Record};

#[derive(Debug, Serialize)]
struct CheckRecord {
    accepted: bool,
    origin: String,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    argument: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<RejectionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl Record for CheckRecord {
    fn headers() -> Vec<&'static str> {
        vec!["OUTCOME", "ORIGIN", "PLAYER", "FUNCTION", "ARGUMENT", "REASON", "DETAIL"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.outcome.to_string(),
            self.origin.clone(),
            cell(self.player.as_ref()),
            cell(self.function.as_ref()),
            cell(self.argument.as_ref()),
            cell(self.reason),
            cell(self.detail.as_ref()),
        ]
    }
}

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = match (&args.data, &args.file) {
        (Some(data), _) => data.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        (None, None) => String::new(),
    };

    let (_page, bridge, invocations) = build_bridge(&args.bridge)?;
    let origin = args
        .event_origin
        .clone()
        .unwrap_or_else(|| args.bridge.origin.clone());

    let record = match bridge.handle_message(&InboundEvent::new(origin.clone(), payload)) {
        Ok(Dispatch::Ready { player, .. }) => CheckRecord {
            accepted: true,
            origin,
            outcome: "ready",
            player: Some(player.to_string()),
            function: None,
            argument: None,
            reason: None,
            detail: None,
        },
        Ok(Dispatch::Invoked { function }) => CheckRecord {
            accepted: true,
            origin,
            outcome: "invoked",
            player: None,
            function: Some(function.to_string()),
            argument: invocations
                .borrow()
                .last()
                .map(|invocation| invocation.argument.clone()),
            reason: None,
            detail: None,
        },
        Err(err) => CheckRecord {
            accepted: false,
            origin,
            outcome: "discarded",
            player: None,
            function: None,
            argument: None,
            reason: Some(err.kind()),
            detail: Some(err.to_string()),
        },
    };

    print_record(&record, format);
    Ok(if record.accepted { SUCCESS } else { REJECTED })
}
