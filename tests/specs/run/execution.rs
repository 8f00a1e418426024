//! Run execution specs
//!
//! Verify `jr run` reports per-batch outcomes and exits non-zero on failure.

use crate::prelude::*;

const PASSING: &str = r#"
[[batch]]
name = "build"
jobs = ["true", "echo hi > built.txt"]

[[batch]]
name = "test"
jobs = ["test -f built.txt || true"]
"#;

const ONE_FAILURE: &str = r#"
[[batch]]
name = "build"
jobs = ["true", "echo 'compiler exploded' >&2; exit 1", "true"]
"#;

#[test]
fn all_jobs_succeed() {
    let project = Project::with_jobfile(PASSING);

    project
        .jr()
        .args(&["run", JOBFILE])
        .passes()
        .stdout_has("build: 2 succeeded, 0 failed")
        .stdout_has("test: 1 succeeded, 0 failed")
        .stdout_has("3 succeeded, 0 failed");

    assert_eq!(project.read("built.txt"), "hi\n");
}

#[test]
fn failing_job_is_reported_and_run_fails() {
    Project::with_jobfile(ONE_FAILURE)
        .jr()
        .args(&["run", JOBFILE, "--workers", "2"])
        .fails()
        .stdout_has("build: 2 succeeded, 1 failed")
        .stdout_has("FAILED build/2: exit status 1: compiler exploded")
        .stderr_has("1 job(s) failed");
}

#[test]
fn sequential_run_reports_the_same_outcomes() {
    Project::with_jobfile(ONE_FAILURE)
        .jr()
        .args(&["run", JOBFILE, "--sequential"])
        .fails()
        .stdout_has("build: 2 succeeded, 1 failed")
        .stdout_has("FAILED build/2");
}

#[test]
fn empty_batch_succeeds() {
    Project::with_jobfile("[[batch]]\nname = \"nothing\"\n")
        .jr()
        .args(&["run", JOBFILE])
        .passes()
        .stdout_has("nothing: 0 succeeded, 0 failed");
}

#[test]
fn batch_cwd_is_relative_to_jobfile() {
    let project = Project::empty();
    project.file("nested/out/.keep", "");
    project.file(
        "nested/jobs.toml",
        "[[batch]]\nname = \"a\"\ncwd = \"out\"\njobs = [\"echo here > marker\"]\n",
    );

    project.jr().args(&["run", "nested/jobs.toml"]).passes();

    assert_eq!(project.read("nested/out/marker"), "here\n");
}

#[test]
fn json_format_is_machine_readable() {
    let project = Project::with_jobfile(ONE_FAILURE);

    let run = project
        .jr()
        .args(&["run", JOBFILE, "--format", "json"])
        .fails();

    let summary: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(summary["batches"][0]["name"], "build");
    assert_eq!(summary["batches"][0]["succeeded"], 2);
    assert_eq!(summary["batches"][0]["failed"], 1);
    assert_eq!(summary["failures"][0]["job"], "build/2");
    assert_eq!(summary["stopped"], false);
}

#[test]
fn verbose_logs_job_progress_to_stderr() {
    Project::with_jobfile(PASSING)
        .jr()
        .args(&["run", JOBFILE, "-v"])
        .passes()
        .stderr_has("completed")
        .stdout_lacks("completed");
}
