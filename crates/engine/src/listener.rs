// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion listeners registered on a runner before it runs

use jr_core::{JobCompletion, RunCompletion};
use std::sync::Arc;

/// Observer for run progress. Both methods default to no-ops.
pub trait RunListener: Send + Sync {
    /// Called once per job, success or failure, from the worker that ran it
    fn job_completed(&self, _record: &JobCompletion) {}

    /// Called once at the end of the run; always the last notification
    fn all_completed(&self, _record: &RunCompletion) {}
}

type JobCallback = Arc<dyn Fn(&JobCompletion) + Send + Sync>;
type RunCallback = Arc<dyn Fn(&RunCompletion) + Send + Sync>;

/// Registered listeners: any number of per-job callbacks and at most one
/// aggregate callback
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    job: Vec<JobCallback>,
    all: Option<RunCallback>,
}

impl Listeners {
    pub(crate) fn add_job(&mut self, f: JobCallback) {
        self.job.push(f);
    }

    /// Replaces any previously registered aggregate callback
    pub(crate) fn set_all(&mut self, f: RunCallback) {
        if self.all.replace(f).is_some() {
            tracing::debug!("replacing aggregate completion listener");
        }
    }

    pub(crate) fn add(&mut self, listener: Arc<dyn RunListener>) {
        let job = Arc::clone(&listener);
        self.add_job(Arc::new(move |record| job.job_completed(record)));
        self.set_all(Arc::new(move |record| listener.all_completed(record)));
    }

    pub(crate) fn job_completed(&self, record: &JobCompletion) {
        for f in &self.job {
            f(record);
        }
    }

    pub(crate) fn all_completed(&self, record: &RunCompletion) {
        if let Some(f) = &self.all {
            f(record);
        }
    }
}

/// Builder methods shared by both runners
macro_rules! listener_builders {
    ($runner:ty) => {
        impl $runner {
            /// Register a per-job completion listener
            pub fn on_job_completed<F>(mut self, f: F) -> Self
            where
                F: Fn(&jr_core::JobCompletion) + Send + Sync + 'static,
            {
                self.listeners.add_job(std::sync::Arc::new(f));
                self
            }

            /// Register the aggregate completion listener, replacing any earlier one
            pub fn on_all_completed<F>(mut self, f: F) -> Self
            where
                F: Fn(&jr_core::RunCompletion) + Send + Sync + 'static,
            {
                self.listeners.set_all(std::sync::Arc::new(f));
                self
            }

            /// Register both notifications of a [`RunListener`](crate::RunListener)
            pub fn with_listener(
                mut self,
                listener: std::sync::Arc<dyn crate::RunListener>,
            ) -> Self {
                self.listeners.add(listener);
                self
            }
        }
    };
}

pub(crate) use listener_builders;
