use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_drone_observe<I, S>(cwd: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_drone-observe");
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env("METRICS_DOC", "METRICS.md")
        .env("NO_COLOR", "1")
        .env_remove("DRONE_OBSERVE_LOG")
        .output()
        .expect("drone-observe command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_exit_code(output: &Output, expected: i32) {
    if output.status.code() != Some(expected) {
        panic!(
            "expected exit code {expected}, got {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout should be valid json: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

/// Three levels deep so the contract lookup (path, ../path, ../../path)
/// misses a METRICS.md placed at the temp root.
fn nested_without_contract(tmp: &TempDir) -> PathBuf {
    fs::write(tmp.path().join("METRICS.md"), "| nombre |\n| a_total |\n")
        .expect("decoy contract should write");
    let nested = tmp.path().join("a").join("b").join("c");
    fs::create_dir_all(&nested).expect("nested dirs should be created");
    nested
}

#[test]
fn help_lists_every_command() {
    let tmp = TempDir::new().expect("temp dir should be created");
    let output = run_drone_observe(tmp.path(), ["--help"]);
    assert_success(&output);

    let text = stdout_text(&output);
    for command in [
        "health",
        "telemetry",
        "llm",
        "validate",
        "topology",
        "freshness",
        "drift",
        "limits",
    ] {
        assert!(text.contains(command), "help should list {command}:\n{text}");
    }
}

#[test]
fn unknown_command_is_a_usage_error() {
    let tmp = TempDir::new().expect("temp dir should be created");
    let output = run_drone_observe(tmp.path(), ["discover"]);
    assert_exit_code(&output, 2);
}

#[test]
fn drift_without_contract_reports_single_high_finding() {
    let tmp = TempDir::new().expect("temp dir should be created");
    let cwd = nested_without_contract(&tmp);
    let output = run_drone_observe(&cwd, ["drift", "--no-color"]);
    assert_exit_code(&output, 1);

    let text = stdout_text(&output);
    assert!(text.starts_with("drone-observe drift\n"), "{text}");
    assert!(
        text.contains("HIGH METRICS.md - contract METRICS.md not found"),
        "{text}"
    );
    assert!(text.contains("high=1 medium=0 low=0"), "{text}");
}

#[test]
fn drift_json_payload_is_rejected_report() {
    let tmp = TempDir::new().expect("temp dir should be created");
    let cwd = nested_without_contract(&tmp);
    let output = run_drone_observe(&cwd, ["drift", "--json"]);
    assert_exit_code(&output, 1);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["checkKind"], "drone_observe.drift.v1");
    assert_eq!(payload["result"], "rejected");
    assert_eq!(payload["summary"]["high"], 1);
    let findings = payload["findings"]
        .as_array()
        .expect("findings should be an array");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["severity"], "high");
    assert_eq!(findings[0]["class"], "drift.contract.unreadable");
    assert_eq!(findings[0]["item"], "METRICS.md");
}

#[test]
fn validate_without_contract_fails_on_read_item() {
    let tmp = TempDir::new().expect("temp dir should be created");
    let cwd = nested_without_contract(&tmp);
    let output = run_drone_observe(&cwd, ["validate", "--json"]);
    assert_exit_code(&output, 1);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["ok"], false);
    assert_eq!(payload["items"][0]["name"], "Read METRICS.md");
    assert_eq!(payload["items"][0]["status"], "fail");
}

#[test]
fn repo_root_flag_redirects_contract_lookup() {
    let tmp = TempDir::new().expect("temp dir should be created");
    let cwd = nested_without_contract(&tmp);
    let elsewhere = TempDir::new().expect("second temp dir should be created");
    let deep = elsewhere.path().join("x").join("y").join("z");
    fs::create_dir_all(&deep).expect("deep dirs should be created");

    let output = run_drone_observe(
        &cwd,
        [
            OsStr::new("drift"),
            OsStr::new("--json"),
            OsStr::new("--repo-root"),
            deep.as_os_str(),
        ],
    );
    assert_exit_code(&output, 1);
    let payload = parse_json_stdout(&output);
    let detail = payload["findings"][0]["detail"]
        .as_str()
        .expect("detail should be a string");
    assert!(detail.contains("x/y/z"), "{detail}");
}
