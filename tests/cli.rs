use std::net::TcpListener;
use std::time::{Duration, Instant};

use assert_cmd::Command;

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn pgwait() -> Command {
    let mut cmd = Command::cargo_bin("pgwait").unwrap();
    cmd.env("POSTGRES_HOST", "127.0.0.1")
        .env("POSTGRES_DB", "devops_db")
        .env("POSTGRES_USER", "devops_user")
        .env("POSTGRES_PASSWORD", "devops_pass")
        .env("DB_WAIT_INTERVAL_MS", "100")
        .env("DB_WAIT_CONNECT_TIMEOUT", "2")
        .env("RUST_LOG", "info")
        .timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn unreachable_database_times_out_with_failure() {
    let started = Instant::now();
    let output = pgwait()
        .env("POSTGRES_PORT", closed_port().to_string())
        .env("DB_WAIT_TIMEOUT", "1")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stdout.trim(), "Timed out waiting for Postgres");
    assert!(stderr.contains("timed out after"), "stderr: {stderr}");
    assert!(!stderr.contains("devops_pass"), "stderr: {stderr}");
    assert!(started.elapsed() >= Duration::from_secs(1));
}

#[test]
fn timeout_flag_overrides_environment() {
    let started = Instant::now();
    let output = pgwait()
        .env("POSTGRES_PORT", closed_port().to_string())
        .env("DB_WAIT_TIMEOUT", "600")
        .args(["--timeout", "0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Timed out waiting for Postgres"));
    assert!(started.elapsed() < Duration::from_secs(20));
}

#[test]
fn settings_are_logged_once_telemetry_is_up() {
    let output = pgwait()
        .env("POSTGRES_PORT", closed_port().to_string())
        .env("DB_WAIT_TIMEOUT", "0")
        .env("RUST_LOG", "pgwait=debug")
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("settings loaded"), "stderr: {stderr}");
    assert!(!stderr.contains("devops_pass"), "stderr: {stderr}");
}

#[test]
fn malformed_port_fails_before_connecting() {
    let output = pgwait()
        .env("POSTGRES_PORT", "not-a-port")
        .env("DB_WAIT_TIMEOUT", "0")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("POSTGRES_"));
}

#[test]
fn help_lists_overrides() {
    let output = Command::cargo_bin("pgwait")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--timeout"));
    assert!(stdout.contains("--interval-ms"));
}
