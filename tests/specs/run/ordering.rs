//! Run ordering specs
//!
//! With a single worker (or `--sequential`) jobs run in jobfile order,
//! batch by batch.

use crate::prelude::*;

const APPENDING: &str = r#"
[[batch]]
name = "first"
jobs = ["echo 1 >> order.txt", "echo 2 >> order.txt"]

[[batch]]
name = "second"
jobs = ["echo 3 >> order.txt"]

[[batch]]
name = "third"
jobs = ["echo 4 >> order.txt", "echo 5 >> order.txt"]
"#;

#[test]
fn sequential_runs_in_jobfile_order() {
    let project = Project::with_jobfile(APPENDING);

    project.jr().args(&["run", JOBFILE, "--sequential"]).passes();

    assert_eq!(project.read("order.txt"), "1\n2\n3\n4\n5\n");
}

#[test]
fn single_worker_runs_in_jobfile_order() {
    let project = Project::with_jobfile(APPENDING);

    project
        .jr()
        .args(&["run", JOBFILE, "--workers", "1"])
        .passes();

    assert_eq!(project.read("order.txt"), "1\n2\n3\n4\n5\n");
}

#[test]
fn worker_bound_comes_from_environment() {
    let project = Project::with_jobfile(APPENDING);

    project
        .jr()
        .env("JR_MAX_WORKERS", "1")
        .args(&["run", JOBFILE])
        .passes()
        .stdout_has("5 succeeded, 0 failed");

    assert_eq!(project.read("order.txt"), "1\n2\n3\n4\n5\n");
}

#[test]
fn concurrent_run_completes_every_job() {
    let project = Project::with_jobfile(APPENDING);

    project
        .jr()
        .args(&["run", JOBFILE, "--workers", "4"])
        .passes()
        .stdout_has("5 succeeded, 0 failed");

    let mut lines: Vec<String> = project.read("order.txt").lines().map(String::from).collect();
    lines.sort();
    assert_eq!(lines, vec!["1", "2", "3", "4", "5"]);
}
