// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion records delivered to sources and listeners

use crate::job::{JobError, JobRef};
use std::fmt;
use thiserror::Error;

/// Outcome of one job. `error == None` means the job succeeded.
#[derive(Clone)]
pub struct JobCompletion {
    pub job: JobRef,
    pub error: Option<JobError>,
}

impl JobCompletion {
    pub fn new(job: JobRef, result: Result<(), JobError>) -> Self {
        Self {
            job,
            error: result.err(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Debug for JobCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobCompletion")
            .field("job", &self.job.name())
            .field("error", &self.error)
            .finish()
    }
}

/// Failure raised by the scheduling machinery itself, never by a job
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("job source failed: {message}")]
    Source { message: String },
    #[error("worker failed: {message}")]
    Worker { message: String },
}

/// End-of-run record, produced exactly once per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCompletion {
    /// Scheduler-level failures; job failures never appear here
    pub errors: Vec<SchedulerError>,
    /// Run ended because a stop was requested
    pub stopped: bool,
}

impl RunCompletion {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
