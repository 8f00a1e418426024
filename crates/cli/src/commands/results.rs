// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jr results <database>` - Show recorded job results

use crate::output::{self, OutputFormat};
use crate::recorder::JOBS_TABLE;
use anyhow::{Context, Result};
use clap::Args;
use jr_adapters::{DatabaseConnection, JsonDatabase, Table, TracedDatabase};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct ResultsArgs {
    /// Database written by `jr run --results`
    pub database: PathBuf,

    /// Only show jobs from this run
    #[arg(long)]
    pub run: Option<String>,

    /// Only show failed jobs
    #[arg(long)]
    pub failed: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// One recorded job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRow {
    pub run: String,
    pub job: String,
    pub status: String,
    pub error: Option<String>,
}

impl fmt::Display for JobRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<24} {:<20} {:<10}", self.run, self.job, self.status)?;
        if let Some(error) = &self.error {
            write!(f, " {}", error)?;
        }
        Ok(())
    }
}

pub fn results(args: ResultsArgs) -> Result<()> {
    let mut db = TracedDatabase::new(JsonDatabase::new());
    db.open(&args.database, true)
        .with_context(|| format!("failed to open results database {}", args.database.display()))?;

    let rows = if db.table_exists(JOBS_TABLE)? {
        job_rows(&db.query(JOBS_TABLE)?)
    } else {
        Vec::new()
    };
    db.close()?;

    let rows: Vec<JobRow> = rows
        .into_iter()
        .filter(|r| args.run.as_deref().map_or(true, |run| r.run == run))
        .filter(|r| !args.failed || r.status == "failed")
        .collect();

    match args.format {
        OutputFormat::Text if rows.is_empty() => println!("No results"),
        format => output::print_list(&rows, format),
    }
    Ok(())
}

pub(crate) fn job_rows(table: &Table) -> Vec<JobRow> {
    let text = |row: usize, column: &str| match table.get(row, column) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };
    (0..table.len())
        .map(|row| JobRow {
            run: text(row, "run").unwrap_or_default(),
            job: text(row, "job").unwrap_or_default(),
            status: text(row, "status").unwrap_or_default(),
            error: text(row, "error"),
        })
        .collect()
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
