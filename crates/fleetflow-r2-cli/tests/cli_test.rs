#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const DATED_POLICY: &str = r#"{
  "rules": [{
    "id": "delete-by-date",
    "enabled": true,
    "conditions": {"prefix": ""},
    "deleteObjectsTransition": {
      "condition": {"type": "Date", "date": "2024-12-31T23:59:59.123456Z"}
    }
  }]
}"#;

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("r2-body").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("validate"));
}

/// バージョン表示が正しく動作することを確認
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("r2-body").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("r2-body"));
}

/// ライフサイクルのボディで日付の精度が保たれることを確認
#[test]
fn test_render_lifecycle_keeps_precision() {
    let dir = tempfile::tempdir().unwrap();
    let desired = write(&dir, "desired.json", DATED_POLICY);

    let output = Command::cargo_bin("r2-body")
        .unwrap()
        .args(["render", "lifecycle"])
        .arg(&desired)
        .args(["--account-id", "acc", "--bucket", "logs"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        body["rules"][0]["deleteObjectsTransition"]["condition"]["date"],
        "2024-12-31T23:59:59.123456Z"
    );
}

/// 差分ボディの生成を確認
#[test]
fn test_render_lifecycle_update() {
    let dir = tempfile::tempdir().unwrap();
    let desired = write(&dir, "desired.json", DATED_POLICY);
    let prior = write(
        &dir,
        "prior.json",
        r#"{"rules": [{"id": "delete-by-date", "enabled": true,
            "deleteObjectsTransition": {"condition": {"type": "Age", "maxAge": 2592000}}}]}"#,
    );

    let mut cmd = Command::cargo_bin("r2-body").unwrap();
    cmd.args(["render", "lifecycle"])
        .arg(&desired)
        .arg("--prior")
        .arg(&prior)
        .args(["--account-id", "acc", "--bucket", "logs", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-12-31T23:59:59.123456Z"));
}

/// 不正なJSONはエラーになることを確認
#[test]
fn test_render_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let desired = write(&dir, "broken.json", "{\"rules\": [");

    let mut cmd = Command::cargo_bin("r2-body").unwrap();
    cmd.args(["render", "cors"])
        .arg(&desired)
        .args(["--account-id", "acc", "--bucket", "assets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.json"));
}

/// アカウントIDが無い場合はエラーになることを確認
#[test]
fn test_render_requires_account_id() {
    let dir = tempfile::tempdir().unwrap();
    let desired = write(&dir, "desired.json", DATED_POLICY);

    let mut cmd = Command::cargo_bin("r2-body").unwrap();
    cmd.env_remove("CLOUDFLARE_ACCOUNT_ID")
        .args(["render", "lifecycle"])
        .arg(&desired)
        .args(["--bucket", "logs"])
        .assert()
        .failure();
}

/// event-notification には --queue-id が必要
#[test]
fn test_render_event_notification_requires_queue() {
    let dir = tempfile::tempdir().unwrap();
    let desired = write(
        &dir,
        "notify.json",
        r#"{"rules": [{"actions": ["PutObject"], "prefix": "documents/"}]}"#,
    );

    let mut cmd = Command::cargo_bin("r2-body").unwrap();
    cmd.args(["render", "event-notification"])
        .arg(&desired)
        .args(["--account-id", "acc", "--bucket", "uploads"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--queue-id"));

    let mut cmd = Command::cargo_bin("r2-body").unwrap();
    cmd.args(["render", "event-notification"])
        .arg(&desired)
        .args(["--account-id", "acc", "--bucket", "uploads", "--queue-id", "q1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PutObject"));
}

/// validateコマンドの正常系
#[test]
fn test_validate_ok() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "policy.json", DATED_POLICY);

    let mut cmd = Command::cargo_bin("r2-body").unwrap();
    cmd.args(["validate", "lifecycle"])
        .arg(&file)
        .args(["--account-id", "acc", "--bucket", "logs", "--jurisdiction", "eu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("accounts/acc/r2/buckets/logs/lifecycle"))
        .stdout(predicate::str::contains("delete-by-date"));
}

/// validateコマンドの異常系 (重複したルールID)
#[test]
fn test_validate_duplicate_rule_ids() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        &dir,
        "policy.json",
        r#"{"rules": [{"id": "dup", "enabled": true}, {"id": "dup", "enabled": false}]}"#,
    );

    let mut cmd = Command::cargo_bin("r2-body").unwrap();
    cmd.args(["validate", "lifecycle"])
        .arg(&file)
        .args(["--account-id", "acc", "--bucket", "logs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate rule id 'dup'"));
}
