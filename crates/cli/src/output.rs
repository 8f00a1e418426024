// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use jr_core::{JobListStats, RunCompletion};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(items) {
                println!("{}", json);
            }
        }
    }
}

/// Per-batch counters
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub name: String,
    pub succeeded: usize,
    pub failed: usize,
    /// Jobs never pulled (run stopped or aborted)
    pub skipped: usize,
}

impl BatchSummary {
    pub fn new(name: &str, stats: JobListStats) -> Self {
        Self {
            name: name.to_string(),
            succeeded: stats.succeeded,
            failed: stats.failed,
            skipped: stats.remaining,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobFailure {
    pub job: String,
    pub error: String,
}

/// Outcome of `jr run`
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub batches: Vec<BatchSummary>,
    pub failures: Vec<JobFailure>,
    pub errors: Vec<String>,
    pub stopped: bool,
}

impl RunSummary {
    pub fn new(batches: Vec<BatchSummary>, failures: Vec<JobFailure>, record: &RunCompletion) -> Self {
        Self {
            batches,
            failures,
            errors: record.errors.iter().map(|e| e.to_string()).collect(),
            stopped: record.stopped,
        }
    }

    pub fn succeeded(&self) -> usize {
        self.batches.iter().map(|b| b.succeeded).sum()
    }

    pub fn failed(&self) -> usize {
        self.batches.iter().map(|b| b.failed).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.errors.is_empty() && !self.stopped
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for batch in &self.batches {
            write!(
                f,
                "{}: {} succeeded, {} failed",
                batch.name, batch.succeeded, batch.failed
            )?;
            if batch.skipped > 0 {
                write!(f, ", {} skipped", batch.skipped)?;
            }
            writeln!(f)?;
        }
        for failure in &self.failures {
            writeln!(f, "FAILED {}: {}", failure.job, failure.error)?;
        }
        for error in &self.errors {
            writeln!(f, "ERROR {}", error)?;
        }
        if self.stopped {
            writeln!(f, "run stopped")?;
        }
        write!(f, "{} succeeded, {} failed", self.succeeded(), self.failed())
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
