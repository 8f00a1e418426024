// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner that executes one job at a time, in pull order

use crate::completion::{deliver, execute, pull, spawn_run, Pull};
use crate::config::RunOptions;
use crate::control::{RunControl, RunHandle, RunPhase};
use crate::error::RunError;
use crate::listener::{listener_builders, Listeners};
use crate::runner::Runner;
use async_trait::async_trait;
use jr_core::{JobSource, RunCompletion};
use std::sync::Arc;

/// Deterministic runner: each job is pulled, run to completion and reported
/// before the next one is pulled. `max_workers` is ignored.
#[derive(Default)]
pub struct SequentialRunner {
    control: Arc<RunControl>,
    listeners: Listeners,
}

impl SequentialRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

listener_builders!(SequentialRunner);

#[async_trait]
impl Runner for SequentialRunner {
    async fn run(
        &self,
        source: Arc<dyn JobSource>,
        options: RunOptions,
    ) -> Result<RunHandle, RunError> {
        self.control.begin()?;
        if let Some(requested) = options.max_workers {
            tracing::debug!(requested, "sequential runner ignores max_workers");
        }
        let span = tracing::info_span!("run", runner = "sequential");

        let body = schedule(
            Arc::clone(&self.control),
            self.listeners.clone(),
            Arc::clone(&source),
        );
        spawn_run(
            Arc::clone(&self.control),
            self.listeners.clone(),
            source,
            span,
            body,
        );

        let handle = self.control.handle();
        if options.wait {
            handle.wait().await;
        }
        Ok(handle)
    }

    fn stop(&self) {
        tracing::info!("stop requested");
        self.control.stop();
    }

    fn phase(&self) -> RunPhase {
        self.control.phase()
    }

    fn in_flight(&self) -> usize {
        self.control.in_flight()
    }
}

async fn schedule(
    control: Arc<RunControl>,
    listeners: Listeners,
    source: Arc<dyn JobSource>,
) -> RunCompletion {
    let mut record = RunCompletion::default();

    loop {
        let job = match pull(&control, source.as_ref()) {
            Pull::Job(job) => job,
            Pull::Exhausted => break,
            Pull::Stopped => {
                record.stopped = true;
                break;
            }
            Pull::Failed(e) => {
                tracing::error!(error = %e, "job source failed");
                record.errors.push(e.into());
                break;
            }
        };

        let in_flight = control.enter();
        let completion = execute(job, control.token()).await;
        deliver(source.as_ref(), &listeners, &completion);
        drop(in_flight);
    }

    control.set_phase(RunPhase::Draining);
    record
}

#[cfg(test)]
#[path = "sequential_tests.rs"]
mod tests;
