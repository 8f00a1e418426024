// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run listener that writes job results to a database

use jr_adapters::{DatabaseConnection, DatabaseError};
use jr_core::{JobCompletion, RunCompletion};
use jr_engine::RunListener;
use serde_json::{json, Value};
use std::sync::Mutex;

pub const JOBS_TABLE: &str = "jobs";
pub const RUNS_TABLE: &str = "runs";

pub const JOB_COLUMNS: [&str; 5] = ["run", "job", "status", "error", "finished_at"];
pub const RUN_COLUMNS: [&str; 4] = ["run", "status", "errors", "finished_at"];

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|c| c.to_string()).collect()
}

/// Appends one row per job and one row per run. Write failures are logged;
/// they never affect the run.
pub struct ResultsRecorder<D> {
    run: String,
    db: Mutex<D>,
}

impl<D: DatabaseConnection> ResultsRecorder<D> {
    /// Wrap an open database, creating the result tables if needed
    pub fn new(mut db: D, run: impl Into<String>) -> Result<Self, DatabaseError> {
        for (table, names) in [(JOBS_TABLE, &JOB_COLUMNS[..]), (RUNS_TABLE, &RUN_COLUMNS[..])] {
            if !db.table_exists(table)? {
                db.create_table(table, &columns(names))?;
            }
        }
        Ok(Self {
            run: run.into(),
            db: Mutex::new(db),
        })
    }

    /// Close the database, persisting what was recorded. Later writes fail
    /// and are logged.
    pub fn close(&self) -> Result<(), DatabaseError> {
        self.db.lock().unwrap_or_else(|e| e.into_inner()).close()
    }

    fn append(&self, table: &str, names: &[&str], row: Vec<Value>) {
        let mut db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = db.insert_rows(table, &columns(names), &[row]) {
            tracing::error!(table, error = %e, "failed to record result");
        }
    }
}

impl<D: DatabaseConnection> RunListener for ResultsRecorder<D> {
    fn job_completed(&self, record: &JobCompletion) {
        let (status, error) = match &record.error {
            None => ("succeeded", Value::Null),
            Some(e) => ("failed", json!(e.to_string())),
        };
        self.append(
            JOBS_TABLE,
            &JOB_COLUMNS,
            vec![
                json!(self.run),
                json!(record.job.name()),
                json!(status),
                error,
                json!(now()),
            ],
        );
    }

    fn all_completed(&self, record: &RunCompletion) {
        let status = match (record.is_success(), record.stopped) {
            (false, _) => "failed",
            (true, true) => "stopped",
            (true, false) => "completed",
        };
        let errors: Vec<String> = record.errors.iter().map(|e| e.to_string()).collect();
        self.append(
            RUNS_TABLE,
            &RUN_COLUMNS,
            vec![json!(self.run), json!(status), json!(errors), json!(now())],
        );
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
