#![cfg(all(unix, feature = "cli"))]

use std::process::{Command, Output};

fn serialprims(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_serialprims"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("serialprims should run")
}

fn missing_port() -> String {
    format!("/dev/serialprims-missing-{}", std::process::id())
}

#[test]
fn version_prints_package_version() {
    let output = serialprims(&["version"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("serialprims {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn extended_version_reports_channel_constants() {
    let output = serialprims(&["version", "--extended"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("framing: 8N1"));
    assert!(stdout.contains("buffer_capacity: 512"));
    assert!(stdout.contains("receive_chunk: 128"));
}

#[test]
fn send_to_missing_port_is_transport_error() {
    let port = missing_port();
    let output = serialprims(&["send", &port, "--data", "hello"]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"));
    assert!(stderr.contains(&port));
}

#[test]
fn listen_on_missing_port_is_transport_error() {
    let port = missing_port();
    let output = serialprims(&["--format", "json", "listen", &port, "--count", "1"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_hex_is_rejected_before_opening() {
    let port = missing_port();
    let output = serialprims(&["send", &port, "--hex", "abc"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn invalid_value_for_record_type_is_data_error() {
    let port = missing_port();
    let output = serialprims(&["send", &port, "--record", "u8", "--values", "1,300"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn send_without_payload_is_usage_error() {
    let port = missing_port();
    let output = serialprims(&["send", &port]);
    assert_eq!(output.status.code(), Some(64));
}
