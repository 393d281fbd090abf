//! Integration tests for top-level CLI behavior.
//!
//! None of these reach the network: each case fails or finishes before a
//! vendor request would be sent.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn schedb(args: &[&str], envs: &[(&str, &str)], stdin: &str) -> Output {
    let bin = env!("CARGO_BIN_EXE_schedb");
    let mut child = Command::new(bin)
        .args(args)
        .envs(envs.iter().copied())
        .env_remove("SCHEDB_RECORD")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run schedb binary");
    child.stdin.take().expect("stdin piped").write_all(stdin.as_bytes()).unwrap();
    child.wait_with_output().expect("schedb did not exit")
}

#[test]
fn help_lists_both_subcommands() {
    let output = schedb(&["--help"], &[], "");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("classify"));
    assert!(stdout.contains("lookup"));
}

#[test]
fn lookup_without_code_shows_usage_error() {
    let output = schedb(&["lookup"], &[], "");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("HS_CODE"));
}

#[test]
fn lookup_with_blank_code_is_rejected_before_any_request() {
    let output = schedb(&["lookup", "  "], &[], "");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("HS code is required"), "stderr: {stderr}");
}

#[test]
fn invalid_configuration_is_reported() {
    let output = schedb(&["lookup", "0901"], &[("SCHEDB_SESSION_TTL_SECS", "soon")], "");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("SCHEDB_SESSION_TTL_SECS"));
}

#[test]
fn classify_quits_cleanly_when_input_ends() {
    let output = schedb(&["classify"], &[], "");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Describe the product"));
}

#[test]
fn classify_quit_command_exits_successfully() {
    let output = schedb(&["classify"], &[], "quit\n");
    assert!(output.status.success());
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = schedb(&["nonsense"], &[], "");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
