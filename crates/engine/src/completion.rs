// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job execution and completion delivery shared by both runners

use crate::control::{RunControl, RunPhase};
use crate::listener::Listeners;
use futures::FutureExt;
use jr_core::{
    CancellationToken, JobCompletion, JobError, JobRef, JobSource, RunCompletion, SchedulerError,
    SourceError,
};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Result of asking the source for work
pub(crate) enum Pull {
    Job(JobRef),
    Exhausted,
    Stopped,
    Failed(SourceError),
}

/// Pull the next job unless a stop was requested.
///
/// The stop check and the pull happen under the pull gate, so once
/// `stop()` has returned no further job leaves the source.
pub(crate) fn pull(control: &RunControl, source: &dyn JobSource) -> Pull {
    let _gate = control.pull_gate();
    if control.is_stopping() {
        return Pull::Stopped;
    }
    // A panicking source ends scheduling like a source error, so jobs
    // already dispatched still drain
    match std::panic::catch_unwind(AssertUnwindSafe(|| source.next())) {
        Ok(Ok(Some(job))) => Pull::Job(job),
        Ok(Ok(None)) => Pull::Exhausted,
        Ok(Err(e)) => Pull::Failed(e),
        Err(payload) => {
            let message = JobError::from_panic(payload.as_ref()).to_string();
            tracing::error!(%message, "source next() panicked");
            Pull::Failed(SourceError::new(format!("source {}", message)))
        }
    }
}

/// Run one job, capturing its error or panic in the completion record
pub(crate) async fn execute(job: JobRef, cancel: CancellationToken) -> JobCompletion {
    let name = job.name().to_string();
    tracing::debug!(job = %name, "starting");

    let start = Instant::now();
    let result = match AssertUnwindSafe(job.run(cancel)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(JobError::from_panic(payload.as_ref())),
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(()) => tracing::info!(job = %name, elapsed_ms, "completed"),
        Err(e) => tracing::warn!(job = %name, elapsed_ms, error = %e, "failed"),
    }

    JobCompletion::new(job, result)
}

/// Report a finished job to its source, then to per-job listeners
pub(crate) fn deliver(source: &dyn JobSource, listeners: &Listeners, record: &JobCompletion) {
    source.completed(record);
    listeners.job_completed(record);
}

/// Spawn the scheduling task for a run.
///
/// `body` pulls and drains; once it finishes (or dies) the source and the
/// aggregate listener are told, in that order, and the run is marked
/// completed.
pub(crate) fn spawn_run<F>(
    control: Arc<RunControl>,
    listeners: Listeners,
    source: Arc<dyn JobSource>,
    span: tracing::Span,
    body: F,
) where
    F: Future<Output = RunCompletion> + Send + 'static,
{
    tokio::spawn(
        async move {
            let record = match tokio::spawn(body.in_current_span()).await {
                Ok(record) => record,
                Err(e) => {
                    tracing::error!(error = %e, "scheduling task failed");
                    RunCompletion {
                        errors: vec![SchedulerError::Worker {
                            message: e.to_string(),
                        }],
                        stopped: control.is_stopping(),
                    }
                }
            };
            control.set_phase(RunPhase::Draining);
            finish(&control, source.as_ref(), &listeners, record);
        }
        .instrument(span),
    );
}

fn finish(
    control: &RunControl,
    source: &dyn JobSource,
    listeners: &Listeners,
    record: RunCompletion,
) {
    tracing::info!(
        errors = record.errors.len(),
        stopped = record.stopped,
        "run finished"
    );

    // A panicking callback must not leave waiters hanging
    let delivered = std::panic::catch_unwind(AssertUnwindSafe(|| {
        source.all_completed(&record);
        listeners.all_completed(&record);
    }));
    if delivered.is_err() {
        tracing::error!("completion callback panicked");
    }

    control.complete(record);
}
