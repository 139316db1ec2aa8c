use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn cmd() -> Command {
    Command::cargo_bin("markdown-render").unwrap()
}

#[test]
fn should_convert_stdin_with_default_flavor() {
    cmd()
        .write_stdin("# Hello, world")
        .assert()
        .success()
        .stdout("<h1>Hello, world</h1>\n");
}

#[test]
fn should_convert_a_file_argument() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "*hi*").unwrap();

    // When / Then
    cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout("<p><em>hi</em></p>\n");
}

#[test]
fn should_apply_the_github_flavor() {
    cmd()
        .args(["--flavor", "github"])
        .write_stdin("| a |\n|---|\n| 1 |")
        .assert()
        .success()
        .stdout(predicate::str::contains("<table>"));
}

#[test]
fn should_let_set_flags_override_the_flavor() {
    cmd()
        .args(["--flavor", "github", "--set", "tables=false"])
        .write_stdin("| a |\n|---|\n| 1 |")
        .assert()
        .success()
        .stdout(predicate::str::contains("<table>").not());
}

#[test]
fn should_reject_unknown_options() {
    cmd()
        .args(["--set", "bogusKey=true"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown option 'bogusKey'"));
}

#[test]
fn should_reject_malformed_set_flags() {
    cmd()
        .args(["--set", "tables"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn should_reject_unknown_flavors() {
    cmd()
        .args(["--flavor", "notaflavor"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown flavor 'notaflavor'"));
}

#[test]
fn should_reject_mistyped_values() {
    cmd()
        .args(["--set", "tables=yes"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn should_list_the_option_registry() {
    cmd()
        .arg("--list-options")
        .assert()
        .success()
        .stdout(predicate::str::contains("ghMentionsLink"))
        .stdout(predicate::str::contains("headerLevelStart"));
}

#[test]
fn should_show_resolved_options_as_json() {
    cmd()
        .args(["--flavor", "github", "--show-options"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tables\": true"))
        .stdout(predicate::str::contains("\"ghMentionsLink\""));
}

#[test]
fn should_load_overrides_from_a_config_file() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("render.toml");
    fs::write(&config, "flavor = \"vanilla\"\ntables = true\n").unwrap();

    // When / Then
    cmd()
        .args(["--config", config.to_str().unwrap()])
        .write_stdin("| a |\n|---|\n| 1 |")
        .assert()
        .success()
        .stdout(predicate::str::contains("<table>"));
}

#[test]
fn should_let_cli_flags_beat_the_config_file() {
    // Given: config enables tables, flag disables them again.
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("render.toml");
    fs::write(&config, "flavor = \"vanilla\"\ntables = true\n").unwrap();

    cmd()
        .args([
            "--config",
            config.to_str().unwrap(),
            "--set",
            "tables=false",
        ])
        .write_stdin("| a |\n|---|\n| 1 |")
        .assert()
        .success()
        .stdout(predicate::str::contains("<table>").not());
}

#[test]
fn should_fail_on_a_missing_explicit_config() {
    cmd()
        .args(["--config", "/nonexistent/render.toml"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn should_reject_unknown_keys_in_config_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("render.toml");
    fs::write(&config, "bogusKey = true\n").unwrap();

    cmd()
        .args(["--config", config.to_str().unwrap()])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field"));
}

#[test]
fn should_write_output_to_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.html");

    cmd()
        .args(["--output", out.to_str().unwrap()])
        .write_stdin("# Hi")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out).unwrap(), "<h1>Hi</h1>");
}
