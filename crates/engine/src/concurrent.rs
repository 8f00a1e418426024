// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner that executes up to `max_workers` jobs at once

use crate::completion::{deliver, execute, pull, spawn_run, Pull};
use crate::config::{RunOptions, RunnerConfig};
use crate::control::{RunControl, RunHandle, RunPhase};
use crate::error::RunError;
use crate::listener::{listener_builders, Listeners};
use crate::runner::Runner;
use async_trait::async_trait;
use jr_core::{JobRef, JobSource, RunCompletion, SchedulerError};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Pulls jobs on a scheduling task and runs each on its own worker task,
/// bounded by a slot semaphore.
pub struct ConcurrentRunner {
    config: RunnerConfig,
    control: Arc<RunControl>,
    listeners: Listeners,
}

impl ConcurrentRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            control: Arc::new(RunControl::new()),
            listeners: Listeners::default(),
        }
    }
}

impl Default for ConcurrentRunner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

listener_builders!(ConcurrentRunner);

#[async_trait]
impl Runner for ConcurrentRunner {
    async fn run(
        &self,
        source: Arc<dyn JobSource>,
        options: RunOptions,
    ) -> Result<RunHandle, RunError> {
        self.control.begin()?;
        let max_workers = self.config.resolve_workers(options.max_workers);
        let span = tracing::info_span!("run", runner = "concurrent", max_workers);

        let body = schedule(
            Arc::clone(&self.control),
            self.listeners.clone(),
            Arc::clone(&source),
            max_workers,
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
    max_workers: usize,
) -> RunCompletion {
    let slots = Arc::new(Semaphore::new(max_workers));
    let mut workers = JoinSet::new();
    let mut record = RunCompletion::default();

    loop {
        // Wait for a free slot; a stop request wins over a free slot
        let permit = tokio::select! {
            biased;
            _ = control.stopped() => {
                record.stopped = true;
                break;
            }
            permit = Arc::clone(&slots).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        match pull(&control, source.as_ref()) {
            Pull::Job(job) => {
                dispatch(&mut workers, &control, &listeners, &source, job, permit);
            }
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
        }

        while let Some(joined) = workers.try_join_next() {
            collect(&mut record, joined);
        }
    }

    control.set_phase(RunPhase::Draining);
    tracing::debug!(in_flight = control.in_flight(), "draining");
    while let Some(joined) = workers.join_next().await {
        collect(&mut record, joined);
    }

    record
}

fn dispatch(
    workers: &mut JoinSet<()>,
    control: &Arc<RunControl>,
    listeners: &Listeners,
    source: &Arc<dyn JobSource>,
    job: JobRef,
    permit: OwnedSemaphorePermit,
) {
    let in_flight = control.enter();
    let cancel = control.token();
    let listeners = listeners.clone();
    let source = Arc::clone(source);

    workers.spawn(async move {
        let record = execute(job, cancel).await;
        deliver(source.as_ref(), &listeners, &record);
        // Free the slot only once every notification for this job is out
        drop(in_flight);
        drop(permit);
    });
}

fn collect(record: &mut RunCompletion, joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "worker task failed");
        record.errors.push(SchedulerError::Worker {
            message: e.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "concurrent_tests.rs"]
mod tests;
