#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

const PLAYER: &str = "ab12CD34ef";

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "vpbridge-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn vpbridge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vpbridge"))
        .args(["--format", "json", "--log-level", "off"])
        .args(args)
        .env_remove("VPBRIDGE_TRUSTED_ORIGIN")
        .env_remove("VPBRIDGE_MODE")
        .output()
        .expect("vpbridge should run")
}

fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be JSON"))
        .collect()
}

#[test]
fn check_accepts_ready_from_trusted_origin() {
    let data = format!(
        r#"{{"type":"ready","functionName":"","functionParameter":"{PLAYER}"}}"#
    );
    let output = vpbridge(&["check", "--data", &data]);

    assert_eq!(output.status.code(), Some(0));
    let records = json_lines(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["outcome"], "ready");
    assert_eq!(records[0]["player"], PLAYER);
}

#[test]
fn check_discards_untrusted_origin() {
    let output = vpbridge(&[
        "check",
        "--event-origin",
        "https://evil.example",
        "--data",
        r#"{"type":"ready","functionName":"","functionParameter":"ab12CD34ef"}"#,
    ]);

    assert_eq!(output.status.code(), Some(2));
    let records = json_lines(&output);
    assert_eq!(records[0]["accepted"], false);
    assert_eq!(records[0]["reason"], "untrusted_origin");
}

#[test]
fn check_invokes_registered_callback_with_literal() {
    let output = vpbridge(&[
        "check",
        "--callback",
        "onTimeUpdate",
        "--data",
        r#"{"type":"callback","functionName":"onTimeUpdate","functionParameter":"12.5"}"#,
    ]);

    assert_eq!(output.status.code(), Some(0));
    let records = json_lines(&output);
    assert_eq!(records[0]["function"], "onTimeUpdate");
    assert_eq!(records[0]["argument"], 12.5);
}

#[test]
fn encode_prints_exact_wire_text() {
    let output = vpbridge(&[
        "encode",
        "--action",
        "seek",
        "--embed-id",
        PLAYER,
        "--param",
        "30",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"{"action":"seek","embedId":"ab12CD34ef","parameter1":30,"parameter2":null}"#
    );
}

#[test]
fn encode_rejects_bad_embed_id() {
    let output = vpbridge(&["encode", "--action", "play", "--embed-id", "short"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn simulate_replays_ready_then_request() {
    let dir = unique_temp_dir("simulate");
    let script = dir.join("session.jsonl");
    std::fs::write(
        &script,
        concat!(
            "# request before ready is refused\n",
            r#"{"request":{"frame":"frame1","action":"play","embedId":"ab12CD34ef","parameter1":null,"parameter2":null}}"#,
            "\n",
            r#"{"inbound":{"data":{"type":"ready","functionName":"","functionParameter":"ab12CD34ef"}}}"#,
            "\n",
            r#"{"request":{"frame":"frame1","action":"play","embedId":"ab12CD34ef","parameter1":null,"parameter2":null}}"#,
            "\n",
        ),
    )
    .expect("script should be writable");

    let output = vpbridge(&[
        "simulate",
        script.to_str().expect("utf-8 path"),
        "--frame",
        "frame1",
    ]);

    assert_eq!(output.status.code(), Some(2));
    let records = json_lines(&output);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["ok"], false);
    assert_eq!(records[0]["reason"], "target_unavailable");
    assert_eq!(records[1]["ok"], true);
    assert_eq!(records[2]["ok"], true);
    assert_eq!(records[2]["line"], 4);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn simulate_rejects_malformed_script_line() {
    let dir = unique_temp_dir("simulate-bad");
    let script = dir.join("bad.jsonl");
    std::fs::write(&script, "{\"neither\":{}}\n").expect("script should be writable");

    let output = vpbridge(&["simulate", script.to_str().expect("utf-8 path")]);
    assert_eq!(output.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn schema_directory_guards_callback_arguments() {
    let dir = unique_temp_dir("schemas");
    std::fs::write(
        dir.join("onTimeUpdate.schema.json"),
        r#"{"type":"number","minimum":0}"#,
    )
    .expect("schema should be writable");

    let output = vpbridge(&[
        "check",
        "--callback",
        "onTimeUpdate",
        "--schemas",
        dir.to_str().expect("utf-8 path"),
        "--data",
        r#"{"type":"callback","functionName":"onTimeUpdate","functionParameter":"-1"}"#,
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(json_lines(&output)[0]["reason"], "malformed_payload");

    let _ = std::fs::remove_dir_all(&dir);
}
