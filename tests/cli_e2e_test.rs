//! E2E tests for the mcd binary.
//!
//! These tests run against the compiled binary and verify exit codes and
//! which stream output lands on.

use assert_cmd::Command;
use predicates::prelude::*;

const ABOUT: &str = "mcd allows you to create new projects and manage existing ones";

#[allow(deprecated)]
fn mcd_cmd() -> Command {
    Command::cargo_bin("mcd").expect("mcd binary")
}

#[test]
fn bare_invocation_prints_usage() {
    mcd_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains(ABOUT))
        .stderr(predicate::str::is_empty());
}

#[test]
fn long_help_flag_prints_help() {
    mcd_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mcd").and(predicate::str::contains(ABOUT)));
}

#[test]
fn short_help_flag_prints_help() {
    mcd_cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("mcd").and(predicate::str::contains(ABOUT)));
}

#[test]
fn unknown_subcommand_fails() {
    mcd_cmd()
        .arg("frobnicate")
        .assert()
        .code(mcd::exitcode::USAGE)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("unknown command").and(predicate::str::contains("frobnicate")),
        );
}

#[test]
fn unknown_flag_fails_with_parse_diagnostic() {
    mcd_cmd()
        .arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument '--no-such-flag'"));
}

#[test]
fn double_dash_with_trailing_token_fails() {
    mcd_cmd()
        .args(["--", "frobnicate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("frobnicate"));
}

#[test]
fn lone_double_dash_prints_usage() {
    mcd_cmd()
        .arg("--")
        .assert()
        .success()
        .stdout(predicate::str::contains(ABOUT));
}

#[test]
fn version_flag_prints_version() {
    mcd_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "mcd {}\n",
            env!("CARGO_PKG_VERSION")
        )));
}
