//! End-to-end tests for the `coesi` binary.
//!
//! These cover the paths that do not need a docker daemon: IP validation and
//! env-file rewriting, argument rejection, and project-root discovery.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway COESI project directory: compose file plus env files.
struct TestProject {
    dir: TempDir,
}

impl TestProject {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();
        fs::write(
            dir.path().join(".env.prod"),
            "# production deployment\nPRODUCTION_IP=1.2.3.4\nGRAPHDB_PORT=7200\n",
        )
        .unwrap();
        fs::write(dir.path().join(".env.dev"), "GRAPHDB_PORT=7200\n").unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn env_prod(&self) -> PathBuf {
        self.path().join(".env.prod")
    }

    fn coesi(&self) -> Command {
        let mut cmd = Command::cargo_bin("coesi").unwrap();
        cmd.current_dir(self.path());
        cmd
    }
}

#[test]
fn ip_command_rewrites_production_ip() {
    let project = TestProject::new();

    project
        .coesi()
        .args(["ip", "10.0.0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Production IP updated to: 10.0.0.5"));

    let content = fs::read_to_string(project.env_prod()).unwrap();
    assert_eq!(
        content,
        "# production deployment\nPRODUCTION_IP=10.0.0.5\nGRAPHDB_PORT=7200\n"
    );
}

#[test]
fn ip_command_canonicalizes_leading_zeros() {
    let project = TestProject::new();

    project
        .coesi()
        .args(["ip", "192.168.001.100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("192.168.1.100"));

    let content = fs::read_to_string(project.env_prod()).unwrap();
    assert!(content.contains("PRODUCTION_IP=192.168.1.100"));
}

#[test]
fn ip_command_rejects_out_of_range_octet() {
    let project = TestProject::new();

    project
        .coesi()
        .args(["ip", "10.0.0.256"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside 0-255"));

    // File untouched on failure.
    let content = fs::read_to_string(project.env_prod()).unwrap();
    assert!(content.contains("PRODUCTION_IP=1.2.3.4"));
}

#[test]
fn ip_command_rejects_three_octets() {
    let project = TestProject::new();

    project
        .coesi()
        .args(["ip", "10.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid IP address '10.0.0'"));
}

#[test]
fn ip_command_rejects_hostnames() {
    let project = TestProject::new();

    project
        .coesi()
        .args(["ip", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid IP address"));
}

#[test]
fn ip_command_requires_existing_env_file() {
    let project = TestProject::new();
    fs::remove_file(project.env_prod()).unwrap();

    project
        .coesi()
        .args(["ip", "10.0.0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!project.env_prod().exists());
}

#[test]
fn ip_command_requires_existing_key() {
    let project = TestProject::new();
    fs::write(project.env_prod(), "GRAPHDB_PORT=7200\n").unwrap();

    project
        .coesi()
        .args(["ip", "10.0.0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PRODUCTION_IP"));

    assert_eq!(
        fs::read_to_string(project.env_prod()).unwrap(),
        "GRAPHDB_PORT=7200\n"
    );
}

#[test]
fn dev_rejects_an_ip_argument() {
    let project = TestProject::new();

    project
        .coesi()
        .args(["dev", "10.0.0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not accept an IP address"));
}

#[test]
fn prod_rejects_a_malformed_ip_before_deploying() {
    let project = TestProject::new();

    project
        .coesi()
        .args(["prod", "not-an-ip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid IP address"));

    let content = fs::read_to_string(project.env_prod()).unwrap();
    assert!(content.contains("PRODUCTION_IP=1.2.3.4"));
}

#[test]
fn unknown_profile_is_rejected() {
    let project = TestProject::new();

    project
        .coesi()
        .args(["stop", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid profile 'staging'"));
}

#[test]
fn commands_fail_outside_a_project_directory() {
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("coesi").unwrap();
    cmd.current_dir(dir.path())
        .args(["ip", "10.0.0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("docker-compose.yml"));
}

#[test]
fn version_flag_works() {
    let mut cmd = Command::cargo_bin("coesi").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("coesi"));
}

#[test]
fn help_lists_all_commands() {
    Command::cargo_bin("coesi")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("dev")
                .and(predicate::str::contains("prod"))
                .and(predicate::str::contains("restart"))
                .and(predicate::str::contains("stop"))
                .and(predicate::str::contains("status"))
                .and(predicate::str::contains("logs"))
                .and(predicate::str::contains("clean"))
                .and(predicate::str::contains("ip")),
        );
}
