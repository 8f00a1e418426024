//! Results database specs
//!
//! `jr run --results` appends to a JSON database; `jr results` reads it back.

use crate::prelude::*;

const MIXED: &str = r#"
[[batch]]
name = "build"
jobs = ["true", "exit 4"]
"#;

fn recorded_project() -> Project {
    let project = Project::with_jobfile(MIXED);
    project
        .jr()
        .args(&["run", JOBFILE, "--results", "results.json"])
        .fails();
    project
}

#[test]
fn run_writes_results_database() {
    let project = recorded_project();

    let db: serde_json::Value = serde_json::from_str(&project.read("results.json")).unwrap();
    assert_eq!(db["jobs"]["rows"].as_array().unwrap().len(), 2);
    assert_eq!(db["runs"]["rows"].as_array().unwrap().len(), 1);
}

#[test]
fn results_lists_recorded_jobs() {
    let project = recorded_project();

    project
        .jr()
        .args(&["results", "results.json"])
        .passes()
        .stdout_has("build/1")
        .stdout_has("succeeded")
        .stdout_has("build/2")
        .stdout_has("exit status 4");
}

#[test]
fn results_filters_failed_jobs() {
    let project = recorded_project();

    project
        .jr()
        .args(&["results", "results.json", "--failed"])
        .passes()
        .stdout_has("build/2")
        .stdout_lacks("build/1");
}

#[test]
fn repeated_runs_append() {
    let project = recorded_project();
    project
        .jr()
        .args(&["run", JOBFILE, "--results", "results.json"])
        .fails();

    let run = project
        .jr()
        .args(&["results", "results.json", "--format", "json"])
        .passes();

    let rows: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 4);
}

#[test]
fn results_for_missing_database_fails() {
    Project::empty()
        .jr()
        .args(&["results", "missing.json"])
        .fails()
        .stderr_has("failed to open results database");
}
