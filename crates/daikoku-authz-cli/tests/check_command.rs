// crates/daikoku-authz-cli/tests/check_command.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests for check, table, and config commands.
// Purpose: Ensure the binary reports decisions through stdout and exit codes.
// Dependencies: daikoku-authz binary
// ============================================================================
//! ## Overview
//! Runs the compiled `daikoku-authz` binary against request and config files
//! written to a temp directory.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn daikoku_authz_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_daikoku-authz"))
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec(value).expect("encode json")).expect("write json");
    path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(daikoku_authz_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("DAIKOKU_AUTHZ_CONFIG")
        .env_remove("DAIKOKU_AUTHZ_LANG")
        .output()
        .expect("run daikoku-authz")
}

fn check(dir: &Path, request: &Value, extra: &[&str]) -> Output {
    let input = write_json(dir, "request.json", request);
    let input = input.to_string_lossy().into_owned();
    let mut args = vec!["check", "--input", input.as_str()];
    args.extend_from_slice(extra);
    run(dir, &args)
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

fn editor_request(visibility: Option<&str>) -> Value {
    json!({
        "user": { "_id": "alice" },
        "action": "manage",
        "subject": "apikey",
        "team": {
            "_id": "team-1",
            "type": "Organization",
            "users": [{ "userId": "alice", "teamPermission": "ApiEditor" }],
            "apiKeyVisibility": visibility
        }
    })
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

#[test]
fn check_allows_editor_when_visibility_unset() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = check(dir.path(), &editor_request(None), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output), json!({ "allowed": true, "reason": "role_grant" }));
}

#[test]
fn check_denies_editor_when_visibility_is_administrator() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = check(dir.path(), &editor_request(Some("Administrator")), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["reason"], "condition_failed");
    assert!(output.stderr.is_empty());
}

#[test]
fn check_dispatches_unauthorized_error_on_denial() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = check(dir.path(), &editor_request(Some("Administrator")), &["--dispatch-error"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(
        stderr,
        json!({ "error": { "status": 401, "message": "unauthorized", "from": "CAN component" } })
    );
}

#[test]
fn check_derives_tenant_admin_from_tenant() {
    let dir = tempfile::tempdir().expect("temp dir");
    let request = json!({
        "user": { "_id": "alice" },
        "action": "manage",
        "subject": "tenant",
        "tenant": { "_id": "tenant-1", "admins": ["alice"] }
    });
    let output = check(dir.path(), &request, &[]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["reason"], "tenant_admin");
}

#[test]
fn check_denies_tenant_admin_on_other_tenant() {
    let dir = tempfile::tempdir().expect("temp dir");
    let request = json!({
        "user": { "_id": "alice" },
        "action": "manage",
        "subject": "tenant",
        "isTenantAdmin": true,
        "tenant": { "_id": "tenant-1" },
        "whichOne": { "_id": "tenant-2" }
    });
    let output = check(dir.path(), &request, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["reason"], "tenant_mismatch");
}

#[test]
fn check_allows_when_any_team_grants() {
    let dir = tempfile::tempdir().expect("temp dir");
    let request = json!({
        "user": { "_id": "alice" },
        "action": "manage",
        "subject": "api",
        "teams": [
            { "_id": "t-1", "type": "Personal", "users": [{ "userId": "alice", "teamPermission": "User" }] },
            { "_id": "t-2", "type": "Organization", "users": [{ "userId": "alice", "teamPermission": "Administrator" }] }
        ]
    });
    let output = check(dir.path(), &request, &[]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn check_rejects_team_and_teams_together() {
    let dir = tempfile::tempdir().expect("temp dir");
    let request = json!({
        "user": { "_id": "alice" },
        "action": "read",
        "subject": "api",
        "team": { "_id": "t-1" },
        "teams": []
    });
    let output = check(dir.path(), &request, &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn check_uses_config_dispatch_default_and_file_audit() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = "[audit]\nsink = \"file\"\npath = \"audit.log\"\n\n[guard]\ndispatch_error = true\n";
    fs::write(dir.path().join("daikoku-authz.toml"), config).expect("write config");
    let request = json!({
        "user": { "_id": "bob" },
        "action": "read",
        "subject": "api",
        "team": { "_id": "t-1", "users": [] }
    });
    let output = check(dir.path(), &request, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["reason"], "not_a_member");
    assert!(String::from_utf8_lossy(&output.stderr).contains("CAN component"));

    let log = fs::read_to_string(dir.path().join("audit.log")).expect("audit log");
    let event: Value = serde_json::from_str(log.trim()).expect("audit json");
    assert_eq!(event["event"], "authz_decision");
    assert_eq!(event["user_id"], "bob");
    assert_eq!(event["reason"], "not_a_member");
}

#[test]
fn check_refuses_oversized_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("huge.json");
    fs::write(&input, vec![b' '; 1024 * 1024 + 1]).expect("write input");
    let output = run(dir.path(), &["check", "--input", input.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("exceeds limit"));
}

// ============================================================================
// SECTION: Table and Config Commands
// ============================================================================

#[test]
fn table_prints_builtin_rules() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = run(dir.path(), &["table"]);
    assert!(output.status.success());
    let table = stdout_json(&output);
    let editor = table["ApiEditor"].as_array().expect("editor rules");
    assert_eq!(editor.len(), 7);
    assert!(editor.iter().any(|rule| rule
        == &json!({
            "action": "manage",
            "subject": "apikey",
            "condition": { "api_key_visible_to": "ApiEditor" }
        })));
}

#[test]
fn table_honors_custom_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("custom.toml");
    fs::write(
        &config_path,
        "[permissions]\nmode = \"custom\"\n\n[[permissions.rules]]\nrole = \"User\"\nsubject = \"asset\"\naction = \"read\"\n",
    )
    .expect("write config");
    let output = run(dir.path(), &["table", "--config", config_path.to_string_lossy().as_ref()]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), json!({ "User": [{ "action": "read", "subject": "asset" }] }));
}

#[test]
fn config_validate_reports_success() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("daikoku-authz.toml"), "[audit]\nsink = \"stderr\"\n")
        .expect("write config");
    let output = run(dir.path(), &["config", "validate"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Config valid");
}

#[test]
fn config_validate_requires_a_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = run(dir.path(), &["config", "validate"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load config"));
}

#[test]
fn config_validate_rejects_invalid_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("daikoku-authz.toml"), "[permissions]\nmode = \"custom\"\n")
        .expect("write config");
    let output = run(dir.path(), &["config", "validate"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least one rule"));
}

#[test]
fn french_output_prints_disclaimer() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("daikoku-authz.toml"), "").expect("write config");
    let output = run(dir.path(), &["--lang", "fr", "config", "validate"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Configuration valide");
    assert!(String::from_utf8_lossy(&output.stderr).contains("traduite automatiquement"));
}

#[test]
fn version_flag_prints_version() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = run(dir.path(), &["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("daikoku-authz "));
}
