// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run state machine, cancellation and the caller-facing run handle

use crate::error::RunError;
use jr_core::{CancellationToken, RunCompletion, SchedulerError};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Lifecycle of a run: `Idle -> Scheduling -> Draining -> Completed`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunPhase {
    /// `run()` has not been called
    #[default]
    Idle,
    /// Jobs are being pulled and dispatched
    Scheduling,
    /// No more pulls; waiting for in-flight jobs
    Draining,
    /// Aggregate completion delivered
    Completed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Idle => "idle",
            RunPhase::Scheduling => "scheduling",
            RunPhase::Draining => "draining",
            RunPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
struct RunState {
    phase: RunPhase,
    completion: Option<RunCompletion>,
}

/// State shared between a runner, its scheduling task and its workers
pub(crate) struct RunControl {
    cancel: CancellationToken,
    state: watch::Sender<RunState>,
    in_flight: AtomicUsize,
    /// Held while deciding whether to pull; `stop()` takes it after cancelling
    pull_gate: Mutex<()>,
}

impl RunControl {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(RunState::default());
        Self {
            cancel: CancellationToken::new(),
            state,
            in_flight: AtomicUsize::new(0),
            pull_gate: Mutex::new(()),
        }
    }

    /// Move `Idle -> Scheduling`, failing if this control was already used
    pub(crate) fn begin(&self) -> Result<(), RunError> {
        let mut started = false;
        self.state.send_if_modified(|state| {
            if state.phase == RunPhase::Idle {
                state.phase = RunPhase::Scheduling;
                started = true;
            }
            started
        });
        if started {
            Ok(())
        } else {
            Err(RunError::AlreadyStarted)
        }
    }

    pub(crate) fn set_phase(&self, phase: RunPhase) {
        self.state.send_modify(|state| state.phase = phase);
    }

    pub(crate) fn complete(&self, record: RunCompletion) {
        self.state.send_modify(|state| {
            state.phase = RunPhase::Completed;
            state.completion = Some(record);
        });
    }

    pub(crate) fn phase(&self) -> RunPhase {
        self.state.borrow().phase
    }

    pub(crate) fn handle(&self) -> RunHandle {
        RunHandle {
            state: self.state.subscribe(),
        }
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub(crate) fn is_stopping(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) async fn stopped(&self) {
        self.cancel.cancelled().await
    }

    /// Request cancellation. Once this returns no further job is pulled.
    pub(crate) fn stop(&self) {
        self.cancel.cancel();
        drop(self.pull_gate());
    }

    pub(crate) fn pull_gate(&self) -> MutexGuard<'_, ()> {
        self.pull_gate.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Count a job as in flight until the guard is dropped
    pub(crate) fn enter(self: &Arc<Self>) -> InFlight {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlight {
            control: Arc::clone(self),
        }
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

/// In-flight marker; decrements on drop, including during unwinding
pub(crate) struct InFlight {
    control: Arc<RunControl>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.control.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Caller-side view of a run
#[derive(Clone)]
pub struct RunHandle {
    state: watch::Receiver<RunState>,
}

impl RunHandle {
    pub fn phase(&self) -> RunPhase {
        self.state.borrow().phase
    }

    pub fn is_finished(&self) -> bool {
        self.state.borrow().completion.is_some()
    }

    /// Wait until the aggregate completion has been delivered and return it
    pub async fn wait(&self) -> RunCompletion {
        let mut state = self.state.clone();
        let completion = match state.wait_for(|s| s.completion.is_some()).await {
            Ok(s) => s.completion.clone(),
            Err(_) => None,
        };
        completion.unwrap_or_else(|| RunCompletion {
            errors: vec![SchedulerError::Worker {
                message: "runner dropped before the run completed".to_string(),
            }],
            stopped: false,
        })
    }
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
