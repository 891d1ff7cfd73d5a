//! CLI-level smoke tests: argument parsing and offline commands.

use std::path::PathBuf;

fn temp_library(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("cursus_cli_tests").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn unknown_subcommand_is_an_error() {
    assert!(cursus::run(["cursus", "frobnicate"]).is_err());
}

#[test]
fn missing_required_argument_is_an_error() {
    assert!(cursus::run(["cursus", "show"]).is_err());
}

#[test]
fn help_is_reported_through_the_error_path() {
    // clap renders --help as an "error" result carrying the help text.
    let err = cursus::run(["cursus", "--help"]).unwrap_err();
    assert!(err.contains("lesson"));
    assert!(err.contains("project"));
}

#[test]
fn list_on_an_empty_library_succeeds() {
    let dir = temp_library("empty_list");
    std::env::set_var("CURSUS_LIBRARY", &dir);
    let result = cursus::run(["cursus", "list"]);
    std::env::remove_var("CURSUS_LIBRARY");
    assert!(result.is_ok());
}
