use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Args, Subcommand};
use serde_json::Value;
use vpbridge_host::{Bridge, BridgeConfig};
use vpbridge_protocol::{WireMode, DEFAULT_TRUSTED_ORIGIN};
use vpbridge_schema::ParameterSchemas;
use vpbridge_transport::MemoryPage;

use crate::exit::{host_error, schema_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod encode;
pub mod simulate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one inbound message through the listener and report the verdict.
    Check(CheckArgs),
    /// Print the outbound request JSON for the given fields.
    Encode(EncodeArgs),
    /// Replay a JSON-lines script of inbound messages and requests.
    Simulate(SimulateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Simulate(args) => simulate::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Bridge configuration shared by the commands that build a bridge.
#[derive(Args, Debug, Clone)]
pub struct BridgeArgs {
    /// Trusted origin of the player frames.
    #[arg(long, env = "VPBRIDGE_TRUSTED_ORIGIN", default_value = DEFAULT_TRUSTED_ORIGIN)]
    pub origin: String,
    /// Wire mode: `callback` (A) or `tracked` (B).
    #[arg(long, env = "VPBRIDGE_MODE", default_value = "tracked")]
    pub mode: WireMode,
    /// Host callbacks to register (comma-separated or repeated).
    #[arg(long = "callback", value_name = "NAME", value_delimiter = ',')]
    pub callbacks: Vec<String>,
    /// Directory of `<functionName>.schema.json` parameter schemas.
    #[arg(long, value_name = "DIR")]
    pub schemas: Option<PathBuf>,
}

/// A callback invocation seen by the CLI's recording callbacks.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Invocation {
    pub function: String,
    pub argument: Value,
}

pub type Invocations = Rc<RefCell<Vec<Invocation>>>;

/// Build an in-memory bridge whose callbacks record their invocations.
pub fn build_bridge(args: &BridgeArgs) -> CliResult<(MemoryPage, Bridge<MemoryPage>, Invocations)> {
    let page = MemoryPage::new();
    let bridge = Bridge::new(page.clone(), BridgeConfig::new(&args.origin, args.mode));

    if let Some(dir) = &args.schemas {
        let schemas = ParameterSchemas::from_directory(dir)
            .map_err(|err| schema_error("schema load failed", err))?;
        bridge.set_parameter_schemas(schemas);
    }

    let invocations: Invocations = Rc::new(RefCell::new(Vec::new()));
    for name in &args.callbacks {
        let sink = invocations.clone();
        let function = name.clone();
        bridge
            .register_callback(name, move |argument| {
                sink.borrow_mut().push(Invocation {
                    function: function.clone(),
                    argument: argument.value().clone(),
                });
            })
            .map_err(|err| host_error("invalid --callback", err))?;
    }

    Ok((page, bridge, invocations))
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub bridge: BridgeArgs,
    /// Origin of the sending document. Defaults to the trusted origin.
    #[arg(long, value_name = "ORIGIN")]
    pub event_origin: Option<String>,
    /// Raw message payload.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub data: Option<String>,
    /// Read the message payload from a file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Tracked-mode action name.
    #[arg(
        long,
        conflicts_with_all = ["function", "callback_name"],
        required_unless_present = "function",
        requires = "embed_id"
    )]
    pub action: Option<String>,
    /// Player id the action targets.
    #[arg(long, value_name = "PLAYER_ID")]
    pub embed_id: Option<String>,
    /// Callback-mode function name.
    #[arg(long, conflicts_with = "embed_id")]
    pub function: Option<String>,
    /// Callback the player should answer with (callback mode).
    #[arg(long, value_name = "NAME")]
    pub callback_name: Option<String>,
    /// Request parameter; JSON if it parses, otherwise a string. Repeat for
    /// `parameter2`.
    #[arg(long = "param", value_name = "VALUE")]
    pub params: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub bridge: BridgeArgs,
    /// JSON-lines script; each line is `{"inbound": ...}` or `{"request": ...}`.
    pub script: PathBuf,
    /// Frames on the page, as `ID` or `ID=ORIGIN` (comma-separated or repeated).
    #[arg(long = "frame", value_name = "ID[=ORIGIN]", value_delimiter = ',')]
    pub frames: Vec<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
