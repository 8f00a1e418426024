// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composite job source: chains several sources as if they were one.
//!
//! Inner sources are pulled strictly in order. The pull cursor moves on as
//! soon as a source returns `None`, so jobs from an earlier source may still
//! be running while a later source is being pulled. Each inner source gets
//! its own `all_completed` once it is both exhausted and drained.

use crate::job::{same_job, JobRef};
use crate::record::{JobCompletion, RunCompletion};
use crate::source::{JobSource, SourceError};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct EntryState {
    /// Jobs handed out by this entry that have not completed yet
    in_flight: Vec<JobRef>,
    /// Inner source returned `None` at least once
    exhausted: bool,
    /// Latch for the inner `all_completed`
    notified: bool,
}

struct SourceEntry {
    source: Arc<dyn JobSource>,
    state: Mutex<EntryState>,
}

impl SourceEntry {
    fn new(source: Arc<dyn JobSource>) -> Self {
        Self {
            source,
            state: Mutex::new(EntryState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EntryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn contains(&self, job: &JobRef) -> bool {
        self.lock().in_flight.iter().any(|j| same_job(j, job))
    }

    fn track(&self, job: &JobRef) {
        self.lock().in_flight.push(Arc::clone(job));
    }

    fn release(&self, job: &JobRef) {
        self.lock().in_flight.retain(|j| !same_job(j, job));
    }

    fn mark_exhausted(&self) {
        self.lock().exhausted = true;
    }

    /// Fire the inner `all_completed` if exhausted and drained, at most once.
    /// The latch is taken under the lock; the callback runs after it is released.
    fn try_notify(&self, index: usize) {
        let fire = {
            let mut state = self.lock();
            if state.exhausted && state.in_flight.is_empty() && !state.notified {
                state.notified = true;
                true
            } else {
                false
            }
        };
        if fire {
            tracing::debug!(index, "inner source exhausted and drained");
            self.source.all_completed(&RunCompletion::default());
        }
    }
}

/// A [`JobSource`] that sequences several inner sources in a fixed order
pub struct CompositeSource {
    entries: Vec<SourceEntry>,
    cursor: Mutex<usize>,
}

impl CompositeSource {
    pub fn new(sources: impl IntoIterator<Item = Arc<dyn JobSource>>) -> Self {
        Self {
            entries: sources.into_iter().map(SourceEntry::new).collect(),
            cursor: Mutex::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Jobs handed out and not yet reported complete, across all entries
    pub fn in_flight(&self) -> usize {
        self.entries.iter().map(|e| e.lock().in_flight.len()).sum()
    }
}

impl JobSource for CompositeSource {
    fn next(&self) -> Result<Option<JobRef>, SourceError> {
        let mut cursor = self.cursor.lock().unwrap_or_else(|e| e.into_inner());
        while let Some(entry) = self.entries.get(*cursor) {
            match entry.source.next()? {
                Some(job) => {
                    entry.track(&job);
                    return Ok(Some(job));
                }
                None => {
                    entry.mark_exhausted();
                    entry.try_notify(*cursor);
                    *cursor += 1;
                }
            }
        }
        Ok(None)
    }

    fn completed(&self, record: &JobCompletion) {
        let found = self
            .entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.contains(&record.job));
        let Some((index, entry)) = found else {
            tracing::error!(
                job = record.job.name(),
                "completion reported for a job this source never issued"
            );
            return;
        };

        entry.source.completed(record);
        entry.release(&record.job);
        entry.try_notify(index);
    }

    fn all_completed(&self, record: &RunCompletion) {
        // Each inner source already got its own notification when it drained
        tracing::debug!(stopped = record.stopped, "composite run completed");
    }
}

#[cfg(test)]
#[path = "composite_tests.rs"]
mod tests;
