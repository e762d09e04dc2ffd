//! `alamo server ...` failure paths that must stop before the network.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::alamo;

fn config_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("temp dir")
}

#[test]
fn test_chefclient_without_id_prints_usage_and_exits_1() {
    let dir = config_dir();
    alamo(&dir)
        .args(["server", "chefclient"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Please provide a server id to provision with Chef",
        ))
        .stderr(predicate::str::contains("USAGE: alamo server chefclient SERVER_ID"));
}

#[test]
fn test_delete_without_id_prints_usage_and_exits_1() {
    let dir = config_dir();
    alamo(&dir)
        .args(["server", "delete"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Please provide a id of a server to delete",
        ))
        .stderr(predicate::str::contains("USAGE: alamo server delete SERVER_ID"));
}

#[test]
fn test_usage_error_as_json() {
    let dir = config_dir();
    let output = alamo(&dir)
        .args(["--json", "server", "delete"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("JSON error object");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "usage");
}

#[test]
fn test_list_without_auth_url_is_config_error() {
    let dir = config_dir();
    alamo(&dir)
        .args(["server", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: missing required setting openstack.auth_url"))
        .stderr(predicate::str::contains("OS_AUTH_URL"));
}

#[test]
fn test_chefclient_without_chef_server_is_config_error() {
    let dir = config_dir();
    alamo(&dir)
        .args([
            "server",
            "chefclient",
            "i-1",
            "--validation-pem",
            "/tmp/validation.pem",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("chef.server_url"));
}

#[test]
fn test_chefclient_with_missing_validation_key_fails_before_network() {
    let dir = config_dir();
    alamo(&dir)
        .args([
            "--auth-url",
            "http://127.0.0.1:9/v2.0",
            "server",
            "chefclient",
            "i-1",
            "--chef-server-url",
            "https://chef.example.com",
            "--validation-pem",
        ])
        .arg(dir.path().join("missing.pem"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read validation key"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = config_dir();
    std::fs::write(dir.path().join("config.yaml"), "openstack: [unclosed").expect("write");
    alamo(&dir)
        .args(["server", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}

#[test]
fn test_delete_against_unreachable_identity_is_auth_error() {
    let dir = config_dir();
    // Port 9 (discard) is not listening on test hosts.
    alamo(&dir)
        .args([
            "--auth-url",
            "http://127.0.0.1:9/v2.0",
            "--username",
            "ops",
            "--password",
            "pw",
            "--tenant",
            "web",
            "--timeout",
            "5",
            "server",
            "delete",
            "i-1",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("identity service at http://127.0.0.1:9/v2.0/tokens is unreachable"));
}
