//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sitecfg(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitecfg"));
    cmd.current_dir(root).env_remove("SITECFG_ENV").env_remove("SITECFG_ROOT");
    cmd
}

fn project(config: Value) -> TempDir {
    let tmp = TempDir::new().expect("temp project");
    fs::write(tmp.path().join("config.json"), config.to_string()).expect("write config");
    tmp
}

fn write_site(root: &Path, dir: &str, config: Value) {
    fs::create_dir_all(root.join(dir)).expect("mkdir site");
    fs::write(root.join(dir).join("config.json"), config.to_string()).expect("write site");
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("stdout is JSON")
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitecfg"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("sitecfg"));
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitecfg"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Resolve site- and environment-specific"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("lock"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_resolve_missing_config_fails() {
    let tmp = TempDir::new().expect("temp project");
    sitecfg(tmp.path())
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_resolve_merges_substring_site() {
    let tmp = project(json!({"default-site": "alpha", "paths": {"src": "sites"}}));
    write_site(tmp.path(), "sites/alpha-uk", json!({"region": "uk"}));

    let output = sitecfg(tmp.path()).arg("resolve").output().expect("run");

    assert!(output.status.success());
    let resolved = stdout_json(&output.stdout);
    assert_eq!(resolved["region"], "uk");
    assert_eq!(resolved["paths"]["src"], "sites/");
}

#[test]
fn test_resolve_build_args_select_site_and_environment() {
    let tmp = project(json!({
        "paths": {"*": {"src": "src", "dist": "dist/{site}"}, "production": {"dist": "public/{site}"}},
        "settings": {"*": {"minify": false}, "production": {"minify": true}}
    }));
    write_site(tmp.path(), "src/beta", json!({"title": "Beta"}));

    let output = sitecfg(tmp.path())
        .args(["resolve", "--", "--production", "--beta", "--port", "3000"])
        .output()
        .expect("run");

    assert!(output.status.success());
    let resolved = stdout_json(&output.stdout);
    assert_eq!(resolved["paths"]["dist"], "public/beta/");
    assert_eq!(resolved["settings"]["minify"], true);
    assert_eq!(resolved["title"], "Beta");
}

#[test]
fn test_resolve_missing_site_warns() {
    let tmp = project(json!({"default-site": "alpha", "name": "base"}));

    sitecfg(tmp.path())
        .args(["resolve", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"base""#))
        .stderr(predicate::str::contains("\"alpha\""));
}

#[test]
fn test_resolve_strict_rejects_unknown_tokens() {
    let tmp = project(json!({"paths": {"out": "{nowhere}/out"}}));

    sitecfg(tmp.path())
        .args(["resolve", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("{nowhere}"));
}

#[test]
fn test_resolve_reads_settings_file() {
    let tmp = TempDir::new().expect("temp project");
    fs::write(tmp.path().join("site.json"), r#"{"settings": {"*": {"debug": true}, "staging": {"debug": false}}}"#)
        .expect("write config");
    fs::write(tmp.path().join("sitecfg.toml"), "file = 'site.json'\nenv = 'staging'\n").expect("write settings");

    let output = sitecfg(tmp.path()).arg("resolve").output().expect("run");

    assert!(output.status.success());
    assert_eq!(stdout_json(&output.stdout)["settings"]["debug"], false);
}

#[test]
fn test_lock_created_then_unchanged() {
    let tmp = project(json!({"paths": {"src": "app"}}));

    sitecfg(tmp.path())
        .arg("lock")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    let first = fs::read_to_string(tmp.path().join("config.lock")).expect("lock written");
    assert_eq!(stdout_json(first.as_bytes())["paths"]["src"], "app/");

    sitecfg(tmp.path())
        .arg("lock")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unchanged"));

    sitecfg(tmp.path())
        .args(["lock", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recreated"));
}

#[test]
fn test_lock_updates_on_change() {
    let tmp = project(json!({"name": "one"}));
    sitecfg(tmp.path()).arg("lock").assert().success();

    fs::write(tmp.path().join("config.json"), r#"{"name": "two"}"#).expect("rewrite config");

    sitecfg(tmp.path())
        .args(["lock", "--lock", "config.lock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));
    let lock = fs::read_to_string(tmp.path().join("config.lock")).expect("lock");
    assert!(lock.contains("\"two\""));
}

#[test]
fn test_lock_print_survives_write_failure() {
    let tmp = project(json!({"name": "base"}));

    let output = sitecfg(tmp.path())
        .args(["lock", "--print", "--lock", "missing-dir/config.lock"])
        .output()
        .expect("run");

    assert!(!output.status.success());
    assert_eq!(stdout_json(&output.stdout)["name"], "base");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Lock file was not written"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitecfg"));
    cmd.args(["completions", "bash"]);
    cmd.assert().success().stdout(predicate::str::contains("sitecfg"));
}
