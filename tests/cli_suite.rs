use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn aurwatch() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aurwatch"));
    cmd.env_remove("AURWATCH_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Temp dir with a config that keeps state next to it.
fn workspace(packages: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("aurwatch.kdl");
    fs::write(
        &config,
        format!(
            "settings {{\n    state-dir \"{}\"\n}}\n{}",
            dir.path().join("state").display(),
            packages
        ),
    )
    .expect("write config");
    (dir, config)
}

fn seed(dir: &Path, package: &str, key: &str, value: &str) {
    let pkg = dir.join("state").join(package);
    fs::create_dir_all(&pkg).expect("create state dir");
    fs::write(pkg.join(key), format!("{}\n", value)).expect("seed state");
}

#[test]
fn test_help_command() {
    aurwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Polls AUR metadata"))
        .stdout(predicate::str::contains("reset-failed"));
}

#[test]
fn test_version_flag() {
    let expected = format!("aurwatch {}", env!("CARGO_PKG_VERSION"));
    aurwatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn test_unknown_command() {
    aurwatch()
        .arg("unknown-command-xyz")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: aurwatch"));
}

#[test]
fn missing_config_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    aurwatch()
        .arg("--config")
        .arg(dir.path().join("absent.kdl"))
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn broken_config_points_at_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("aurwatch.kdl");
    fs::write(&config, "package \"yay\" {").expect("write");

    aurwatch()
        .arg("--config")
        .arg(&config)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("aurwatch.kdl"));
}

#[test]
fn status_of_fresh_package_shows_never() {
    let (dir, config) = workspace("package \"yay\" { interval 3600 }\n");

    aurwatch()
        .arg("--config")
        .arg(&config)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("yay"))
        .stdout(predicate::str::contains("never"))
        .stdout(predicate::str::contains("due now"));

    // Inspection never creates state.
    assert!(!dir.path().join("state").join("yay").exists());
}

#[test]
fn status_json_reports_persisted_watermarks() {
    let (dir, config) = workspace("package \"yay\"\npackage \"paru\"\n");
    seed(dir.path(), "yay", "lastsuccess", "1000");
    seed(dir.path(), "yay", "lastmaintainer", "jguer");

    let output = aurwatch()
        .arg("--config")
        .arg(&config)
        .args(["status", "yay", "--json"])
        .output()
        .expect("run status");
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    assert_eq!(rows[0]["name"], "yay");
    assert_eq!(rows[0]["last_success"], 1000);
    assert_eq!(rows[0]["last_maintainer"], "jguer");
}

#[test]
fn reset_failed_removes_marker() {
    let (dir, config) = workspace("package \"yay\"\n");
    seed(dir.path(), "yay", "lastfailed", "1000");

    aurwatch()
        .arg("--config")
        .arg(&config)
        .args(["reset-failed", "yay"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared failed marker"));
    assert!(!dir.path().join("state").join("yay").join("lastfailed").exists());

    aurwatch()
        .arg("--config")
        .arg(&config)
        .args(["reset-failed", "yay"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no failed marker"));
}

#[test]
fn unconfigured_package_is_rejected() {
    let (_dir, config) = workspace("package \"yay\"\n");

    aurwatch()
        .arg("--config")
        .arg(&config)
        .args(["reset-failed", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'nope' is not configured"));

    aurwatch()
        .arg("--config")
        .arg(&config)
        .args(["check", "nope", "--allow-root"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'nope' is not configured"));
}

#[cfg(unix)]
#[test]
fn daemon_refuses_root_without_override() {
    // Only meaningful when the suite itself runs as root (e.g. CI containers).
    if unsafe { libc::geteuid() } != 0 {
        return;
    }
    let (_dir, config) = workspace("package \"yay\"\n");
    aurwatch()
        .arg("--config")
        .arg(&config)
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--allow-root"));
}
