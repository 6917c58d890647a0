use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("dia")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("urls"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("load-model"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_sessions_help_shows_subcommands() {
    cargo_bin_cmd!("dia")
        .args(["sessions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("rename"));
}

#[test]
fn test_help_shows_base_url_flag() {
    cargo_bin_cmd!("dia")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("dia")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
