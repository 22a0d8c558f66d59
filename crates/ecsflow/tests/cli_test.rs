use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help_lists_lifecycle_commands() {
    let mut cmd = Command::cargo_bin("ecsflow").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("run-instance"))
        .stdout(predicate::str::contains("deregister-images"))
        .stdout(predicate::str::contains("associate-eip-address"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("ecsflow").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ecsflow"));
}

#[test]
fn test_copy_help_documents_renew_and_params() {
    let mut cmd = Command::cargo_bin("ecsflow").unwrap();
    cmd.arg("copy")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--renew"))
        .stdout(predicate::str::contains("--auto-eip"))
        .stdout(predicate::str::contains("--param"));
}

#[test]
fn test_missing_region_fails_with_guidance() {
    let mut cmd = Command::cargo_bin("ecsflow").unwrap();
    cmd.arg("instances")
        .env_remove("ALIYUN_REGION")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ALIYUN_REGION"));
}

#[test]
fn test_rejects_malformed_param() {
    let mut cmd = Command::cargo_bin("ecsflow").unwrap();
    cmd.args(["copy", "-n", "web-01", "-p", "no-equals-sign"])
        .env("ALIYUN_REGION", "cn-hangzhou")
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));
}
