// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jobfile parsing: batches of shell commands in TOML
//!
//! ```toml
//! [[batch]]
//! name = "build"
//! jobs = ["make a", "make b"]
//!
//! [[batch]]
//! name = "test"
//! cwd = "tests"
//! jobs = ["make test"]
//! ```

use jr_adapters::ShellJob;
use jr_core::{JobList, JobRef};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors from loading a jobfile
#[derive(Debug, Error)]
pub enum JobfileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("jobfile defines no batches")]
    NoBatches,
    #[error("batch name must not be empty")]
    UnnamedBatch,
    #[error("duplicate batch name: {0}")]
    DuplicateBatch(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Batch {
    pub name: String,
    /// Working directory, relative to the jobfile's directory
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub jobs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Jobfile {
    #[serde(default, rename = "batch")]
    pub batches: Vec<Batch>,
}

impl Jobfile {
    pub fn load(path: &Path) -> Result<Self, JobfileError> {
        let content = std::fs::read_to_string(path).map_err(|source| JobfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, JobfileError> {
        let jobfile: Jobfile = toml::from_str(content)?;
        if jobfile.batches.is_empty() {
            return Err(JobfileError::NoBatches);
        }

        let mut seen = HashSet::new();
        for batch in &jobfile.batches {
            if batch.name.trim().is_empty() {
                return Err(JobfileError::UnnamedBatch);
            }
            if !seen.insert(batch.name.as_str()) {
                return Err(JobfileError::DuplicateBatch(batch.name.clone()));
            }
        }
        Ok(jobfile)
    }

    /// One job list per batch, in file order. Jobs are named `<batch>/<n>`,
    /// counting from 1.
    pub fn job_lists(&self, base_dir: &Path) -> Vec<Arc<JobList>> {
        self.batches
            .iter()
            .map(|batch| {
                let cwd = batch.cwd.as_ref().map(|c| base_dir.join(c));
                let jobs = batch.jobs.iter().enumerate().map(|(i, command)| {
                    let mut job = ShellJob::new(format!("{}/{}", batch.name, i + 1), command);
                    if let Some(cwd) = &cwd {
                        job = job.with_cwd(cwd);
                    }
                    Arc::new(job) as JobRef
                });
                Arc::new(JobList::new(batch.name.clone(), jobs))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "jobfile_tests.rs"]
mod tests;
