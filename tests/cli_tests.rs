//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary isolated from the user's config and environment
fn camclip(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("camclip").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("CAMCLIP_UPLOAD_URL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("webcam"))
        .stdout(predicate::str::contains("--countdown"))
        .stdout(predicate::str::contains("--mime"))
        .stdout(predicate::str::contains("--upload"))
        .stdout(predicate::str::contains("--snapshot"))
        .stdout(predicate::str::contains("--device"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("camclip"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_help() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn config_path_uses_xdg_config_home() {
    let home = TempDir::new().unwrap();
    let expected = home.path().join("camclip").join("config.toml");
    camclip(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy()));
}

#[test]
fn config_init_then_list() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Config file created"));

    assert!(home.path().join("camclip/config.toml").exists());

    camclip(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("countdown: 5"))
        .stdout(predicate::str::contains("instructions: smile, blink_eyes"))
        .stdout(predicate::str::contains("upload_url: (not set)"));
}

#[test]
fn config_init_twice_fails() {
    let home = TempDir::new().unwrap();
    camclip(&home).args(["config", "init"]).assert().success();
    camclip(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["config", "set", "countdown", "3s"])
        .assert()
        .success();

    camclip(&home)
        .args(["config", "get", "countdown"])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));
}

#[test]
fn config_get_unset_key() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["config", "get", "device"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["config", "get", "unknown_key"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_mime() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["config", "set", "mime_type", "avi"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid video type"));
}

#[test]
fn invalid_countdown_is_usage_error() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["--countdown", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("countdown"));
}

#[test]
fn unknown_mime_is_rejected_by_parser() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["--mime", "avi"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("avi"));
}

#[test]
fn zero_width_is_usage_error() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["--width", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("width"));
}

#[test]
fn upload_without_endpoint_fails_before_recording() {
    let home = TempDir::new().unwrap();
    camclip(&home)
        .args(["--upload", "--device", "testsrc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("CAMCLIP_UPLOAD_URL"));
}

#[test]
fn unsatisfiable_width_fails_without_recording() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    camclip(&home)
        .args(["--device", "testsrc", "--width", "10000", "--output"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be satisfied"));

    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn missing_device_fails_with_not_found() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    camclip(&home)
        .args(["--device", "/nonexistent/video9", "--output"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}
