//! CLI tests: run the built binary against temporary scripts and configs.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_site-controls"))
}

fn run(args: &[&str]) -> Output {
    bin().args(args).output().expect("failed to run site-controls")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_script(dir: &Path, body: &str) -> String {
    let path = dir.join("script.toml");
    std::fs::write(&path, body).unwrap();
    path.to_str().unwrap().to_string()
}

const CAROUSEL_SCRIPT: &str = r#"
viewport_width = 1280

[[step]]
action = "click"
selector = ".carousel-btn.next"

[[step]]
action = "advance"
ms = 5000
"#;

#[test]
fn gen_config_prints_parseable_stock_config() {
    let output = run(&["gen-config"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("[carousel]"));
    let parsed: toml::Value = toml::from_str(&text).unwrap();
    assert_eq!(parsed["viewport"]["breakpoint"].as_integer(), Some(768));
}

#[test]
fn replay_prints_text_trace() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), CAROUSEL_SCRIPT);
    let output = run(&["replay", &script]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("000 boot"));
    assert!(text.contains("001 click .carousel-btn.next"));
    assert!(text.contains("    slide: 2/3"));
    assert!(text.contains("002 advance 5000ms"));
    assert!(text.contains("    slide: 3/3"));
}

#[test]
fn replay_json_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), CAROUSEL_SCRIPT);
    let output = run(&["replay", &script, "--json"]);
    assert!(output.status.success());
    let trace: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = trace.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2]["snapshot"]["active_slide"], 2);
    assert_eq!(entries[2]["snapshot"]["viewport"], "desktop");
}

#[test]
fn replay_writes_html_report() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), CAROUSEL_SCRIPT);
    let report = dir.path().join("report.html");
    let output = run(&["replay", &script, "--html", report.to_str().unwrap()]);
    assert!(output.status.success());
    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("click .carousel-btn.next"));
}

#[test]
fn replay_honours_config_dir() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "[[step]]\naction = \"advance\"\nms = 2000\n",
    );
    std::fs::write(
        dir.path().join("site-controls.toml"),
        "[carousel]\ninterval_ms = 1000\n",
    )
    .unwrap();
    let output = run(&[
        "replay",
        &script,
        "--json",
        "--config",
        dir.path().to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let trace: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(trace[1]["snapshot"]["slide_changes"], 2);
}

#[test]
fn replay_fails_on_unknown_selector() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        dir.path(),
        "[[step]]\naction = \"click\"\nselector = \".missing\"\n",
    );
    let output = run(&["replay", &script]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains(".missing"));
}

#[test]
fn check_reports_resolved_values() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("site-controls.toml"),
        "[viewport]\nbreakpoint = 900\n",
    )
    .unwrap();
    let output = run(&["check", "--config", dir.path().to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("    breakpoint = 900"));
    assert!(text.contains("==> Config is valid"));
}

#[test]
fn check_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("site-controls.toml"),
        "[carousel]\ninterval_ms = 0\n",
    )
    .unwrap();
    let output = run(&["check", "--config", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn check_rejects_unknown_keys() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("site-controls.toml"),
        "[carousel]\nintervl_ms = 3000\n",
    )
    .unwrap();
    let output = run(&["check", "--config", dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
}
