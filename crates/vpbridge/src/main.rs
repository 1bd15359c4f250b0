mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "vpbridge",
    version,
    about = "Inspect and replay video player bridge traffic"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "vpbridge",
            "check",
            "--mode",
            "callback",
            "--callback",
            "onPlay,onPause",
            "--data",
            "{}",
        ])
        .expect("check args should parse");

        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.bridge.callbacks, vec!["onPlay", "onPause"]);
                assert_eq!(args.bridge.mode, vpbridge_protocol::WireMode::Callback);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "vpbridge",
            "check",
            "--data",
            "{}",
            "--file",
            "/tmp/msg.json",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn encode_requires_action_or_function() {
        let err = Cli::try_parse_from(["vpbridge", "encode", "--param", "1"])
            .expect_err("missing request kind should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_simulate_frames() {
        let cli = Cli::try_parse_from([
            "vpbridge",
            "simulate",
            "/tmp/script.jsonl",
            "--frame",
            "frame1,frame2=https://other.example",
        ])
        .expect("simulate args should parse");

        match cli.command {
            Command::Simulate(args) => assert_eq!(args.frames.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
