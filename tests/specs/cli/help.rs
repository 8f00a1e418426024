//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .jr()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("results");
}

#[test]
fn run_help_lists_scheduling_flags() {
    Project::empty()
        .jr()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--workers")
        .stdout_has("--sequential")
        .stdout_has("--results");
}

#[test]
fn version_flag_prints_version() {
    Project::empty()
        .jr()
        .args(&["--version"])
        .passes()
        .stdout_has("jr ");
}
