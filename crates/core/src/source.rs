// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job source contract and the list-backed leaf source

use crate::job::JobRef;
use crate::record::{JobCompletion, RunCompletion, SchedulerError};
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

/// Error returned when a source cannot produce its next job
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<SourceError> for SchedulerError {
    fn from(e: SourceError) -> Self {
        SchedulerError::Source { message: e.message }
    }
}

/// Pull-based provider and completion tracker for jobs.
///
/// Runners call `next` from a single scheduling loop, while `completed` may be
/// called concurrently from workers. Implementations use interior mutability.
pub trait JobSource: Send + Sync {
    /// Next job to run, or `None` when there is nothing more for now.
    /// Calling again after `None` must be harmless.
    fn next(&self) -> Result<Option<JobRef>, SourceError>;

    /// A job issued by this source has finished, successfully or not
    fn completed(&self, record: &JobCompletion);

    /// The owning runner has finished the whole run
    fn all_completed(&self, record: &RunCompletion);
}

/// Counters kept by a [`JobList`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobListStats {
    pub issued: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub remaining: usize,
}

struct JobListState {
    pending: VecDeque<JobRef>,
    stats: JobListStats,
    finished: Option<RunCompletion>,
}

/// Leaf source that hands out a fixed list of jobs in order
pub struct JobList {
    name: String,
    state: Mutex<JobListState>,
}

impl JobList {
    pub fn new(name: impl Into<String>, jobs: impl IntoIterator<Item = JobRef>) -> Self {
        let pending: VecDeque<JobRef> = jobs.into_iter().collect();
        let stats = JobListStats {
            remaining: pending.len(),
            ..JobListStats::default()
        };
        Self {
            name: name.into(),
            state: Mutex::new(JobListState {
                pending,
                stats,
                finished: None,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> JobListStats {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).stats
    }

    /// Record passed to `all_completed`, if it has fired
    pub fn finished(&self) -> Option<RunCompletion> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .finished
            .clone()
    }
}

impl JobSource for JobList {
    fn next(&self) -> Result<Option<JobRef>, SourceError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let job = state.pending.pop_front();
        if job.is_some() {
            state.stats.issued += 1;
            state.stats.remaining -= 1;
        }
        Ok(job)
    }

    fn completed(&self, record: &JobCompletion) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if record.is_success() {
            state.stats.succeeded += 1;
        } else {
            state.stats.failed += 1;
        }
    }

    fn all_completed(&self, record: &RunCompletion) {
        tracing::debug!(source = %self.name, "all jobs completed");
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.finished = Some(record.clone());
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
