use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vpbridge_host::{Bridge, Dispatch, RejectionKind};
use vpbridge_protocol::OutboundRequest;
use vpbridge_transport::{InboundEvent, MemoryPage};

use crate::cmd::{build_bridge, Invocations, SimulateArgs};
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, REJECTED, SUCCESS, USAGE};
use crate::output::{cell, print_records, OutputFormat, Record};

/// One line of a simulation script.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Step {
    /// A message arriving at the host page.
    Inbound {
        #[serde(default)]
        origin: Option<String>,
        /// Payload text; non-string values are serialized first.
        data: Value,
    },
    /// A request the host sends to a frame.
    Request {
        frame: String,
        #[serde(flatten)]
        request: OutboundRequest,
    },
}

#[derive(Debug, Serialize)]
struct StepRecord {
    line: usize,
    step: &'static str,
    ok: bool,
    outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<RejectionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl Record for StepRecord {
    fn headers() -> Vec<&'static str> {
        vec!["LINE", "STEP", "OK", "OUTCOME", "REASON", "DETAIL"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.line.to_string(),
            self.step.to_string(),
            self.ok.to_string(),
            self.outcome.clone(),
            cell(self.reason),
            cell(self.detail.as_ref()),
        ]
    }
}

pub fn run(args: SimulateArgs, format: OutputFormat) -> CliResult<i32> {
    let script = fs::read_to_string(&args.script)
        .map_err(|err| io_error(&format!("failed reading {}", args.script.display()), err))?;

    let (page, bridge, invocations) = build_bridge(&args.bridge)?;
    for entry in &args.frames {
        let (id, origin) = parse_frame(entry, &args.bridge.origin)?;
        page.insert_frame(id, origin);
    }

    let mut records = Vec::new();
    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let step: Step = serde_json::from_str(trimmed).map_err(|err| {
            CliError::new(DATA_INVALID, format!("script line {line_no}: {err}"))
        })?;
        records.push(run_step(line_no, step, &page, &bridge, &invocations));
    }

    print_records(&records, format);

    tracing::debug!(
        steps = records.len(),
        ready = bridge.ready_players().len(),
        "simulation finished"
    );

    if records.iter().all(|record| record.ok) {
        Ok(SUCCESS)
    } else {
        Ok(REJECTED)
    }
}

fn run_step(
    line: usize,
    step: Step,
    page: &MemoryPage,
    bridge: &Bridge<MemoryPage>,
    invocations: &Invocations,
) -> StepRecord {
    match step {
        Step::Inbound { origin, data } => {
            let origin = origin.unwrap_or_else(|| bridge.trusted_origin().to_string());
            let data = match data {
                Value::String(text) => text,
                other => other.to_string(),
            };
            match bridge.handle_message(&InboundEvent::new(origin, data)) {
                Ok(Dispatch::Ready { player, newly_ready }) => StepRecord {
                    line,
                    step: "inbound",
                    ok: true,
                    outcome: if newly_ready {
                        format!("ready {player}")
                    } else {
                        format!("ready {player} (already)")
                    },
                    reason: None,
                    detail: None,
                },
                Ok(Dispatch::Invoked { function }) => {
                    let argument = invocations
                        .borrow()
                        .last()
                        .map(|invocation| invocation.argument.to_string())
                        .unwrap_or_default();
                    StepRecord {
                        line,
                        step: "inbound",
                        ok: true,
                        outcome: format!("invoked {function}({argument})"),
                        reason: None,
                        detail: None,
                    }
                }
                Err(err) => StepRecord {
                    line,
                    step: "inbound",
                    ok: false,
                    outcome: "discarded".to_string(),
                    reason: Some(err.kind()),
                    detail: Some(err.to_string()),
                },
            }
        }
        Step::Request { frame, request } => match bridge.try_request(&frame, &request) {
            Ok(()) => {
                let delivered = page
                    .frame(&frame)
                    .map(|handle| handle.delivered().len())
                    .unwrap_or_default();
                StepRecord {
                    line,
                    step: "request",
                    ok: true,
                    outcome: format!("posted to {frame} ({delivered} delivered)"),
                    reason: None,
                    detail: None,
                }
            }
            Err(err) => StepRecord {
                line,
                step: "request",
                ok: false,
                outcome: "not sent".to_string(),
                reason: Some(err.kind()),
                detail: Some(err.to_string()),
            },
        },
    }
}

fn parse_frame<'a>(entry: &'a str, default_origin: &'a str) -> CliResult<(&'a str, &'a str)> {
    let (id, origin) = match entry.split_once('=') {
        Some((id, origin)) => (id, origin),
        None => (entry, default_origin),
    };
    if id.is_empty() || origin.is_empty() {
        return Err(CliError::new(USAGE, format!("invalid --frame value: {entry:?}")));
    }
    Ok((id, origin))
}
