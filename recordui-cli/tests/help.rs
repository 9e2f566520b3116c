use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("recordui");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("recordui"))
        .stdout(contains("compose"))
        .stdout(contains("render"));
}

#[test]
fn render_help_lists_modes() {
    let mut cmd = cargo::cargo_bin_cmd!("recordui");
    cmd.args(["render", "--help"])
        .assert()
        .success()
        .stdout(contains("--mode"))
        .stdout(contains("read"));
}
