//! CLI error specs
//!
//! Bad input fails with a non-zero exit and a message on stderr.

use crate::prelude::*;

#[test]
fn missing_jobfile_fails() {
    Project::empty()
        .jr()
        .args(&["run", "nope.toml"])
        .fails()
        .stderr_has("failed to read nope.toml");
}

#[test]
fn malformed_jobfile_fails() {
    Project::with_jobfile("[[batch]\nname = ")
        .jr()
        .args(&["run", JOBFILE])
        .fails()
        .stderr_has("TOML parse error");
}

#[test]
fn jobfile_without_batches_fails() {
    Project::with_jobfile("")
        .jr()
        .args(&["run", JOBFILE])
        .fails()
        .stderr_has("jobfile defines no batches");
}

#[test]
fn duplicate_batch_names_fail() {
    Project::with_jobfile("[[batch]]\nname = \"a\"\n\n[[batch]]\nname = \"a\"\n")
        .jr()
        .args(&["run", JOBFILE])
        .fails()
        .stderr_has("duplicate batch name: a");
}

#[test]
fn sequential_conflicts_with_workers() {
    Project::with_jobfile("[[batch]]\nname = \"a\"\n")
        .jr()
        .args(&["run", JOBFILE, "--sequential", "--workers", "2"])
        .fails()
        .stderr_has("cannot be used with");
}

#[test]
fn unknown_subcommand_fails() {
    Project::empty().jr().args(&["frobnicate"]).fails();
}
