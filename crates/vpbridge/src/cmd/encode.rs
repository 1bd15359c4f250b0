use serde::Serialize;
use serde_json::Value;
use vpbridge_host::HostError;
use vpbridge_protocol::{encode_outbound, OutboundRequest, PlayerId};

use crate::cmd::EncodeArgs;
use crate::exit::{host_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_record, OutputFormat, Record};

#[derive(Debug, Serialize)]
struct EncodedRecord {
    mode: String,
    message: String,
}

impl Record for EncodedRecord {
    fn headers() -> Vec<&'static str> {
        vec!["MODE", "MESSAGE"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.mode.clone(), self.message.clone()]
    }
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let request = build_request(&args)?;
    let message = encode_outbound(&request, request.mode())
        .map_err(|err| host_error("encode failed", HostError::from(err)))?;

    match format {
        // The wire text itself, ready to paste into a player console.
        OutputFormat::Json => println!("{message}"),
        other => print_record(
            &EncodedRecord {
                mode: request.mode().to_string(),
                message,
            },
            other,
        ),
    }

    Ok(SUCCESS)
}

fn build_request(args: &EncodeArgs) -> CliResult<OutboundRequest> {
    if args.params.len() > 2 {
        return Err(CliError::new(USAGE, "at most two --param values are allowed"));
    }
    let mut params = args.params.iter().map(|raw| parse_param(raw));

    if let Some(action) = &args.action {
        let embed_id = args.embed_id.as_deref().unwrap_or_default();
        let embed_id = PlayerId::parse(embed_id)
            .map_err(|err| host_error("invalid --embed-id", HostError::from(err)))?;
        return Ok(OutboundRequest::action(
            action.as_str(),
            embed_id,
            params.next(),
            params.next(),
        ));
    }

    if let Some(function) = &args.function {
        if args.params.len() > 1 {
            return Err(CliError::new(
                USAGE,
                "callback-mode requests take a single --param",
            ));
        }
        return Ok(OutboundRequest::function(
            function.as_str(),
            params.next(),
            args.callback_name.clone(),
        ));
    }

    Err(CliError::new(USAGE, "one of --action or --function is required"))
}

fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
