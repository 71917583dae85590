use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fleet(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fleet").unwrap();
    cmd.env("FLEET_DATA_DIR", data_dir.path());
    cmd.env("FLEET_CONFIG_DIR", data_dir.path());
    cmd
}

#[test]
fn login_rejects_unrecognized_token_prefix() {
    let dir = TempDir::new().unwrap();
    fleet(&dir)
        .args(["login", "sk_live_nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized token"));
}

#[test]
fn login_then_logout_roundtrip() {
    let dir = TempDir::new().unwrap();
    fleet(&dir)
        .args(["login", "fo1_abc123", "--org", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acme"));

    fleet(&dir)
        .args(["logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
}

#[test]
fn login_json_output() {
    let dir = TempDir::new().unwrap();
    fleet(&dir)
        .args(["--json", "login", "fm1_xyz"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""logged_in": true"#))
        .stdout(predicate::str::contains(r#""org": "personal""#));
}

#[test]
fn status_dismiss_does_not_touch_the_network() {
    let dir = TempDir::new().unwrap();
    fleet(&dir)
        .args(["status", "--dismiss", "tag:status,2026:incident-42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dismissed"));
}
