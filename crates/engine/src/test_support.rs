// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for runner tests

use crate::RunListener;
use jr_core::{
    CancellationToken, FnJob, JobCompletion, JobError, JobRef, JobSource, RunCompletion,
    SourceError,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Tracks how many jobs run at once
#[derive(Clone, Default)]
pub(crate) struct Gauge {
    current: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
    started: Arc<AtomicUsize>,
}

impl Gauge {
    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Job that sleeps for `hold` while counted as running
    pub(crate) fn job(&self, name: &str, hold: Duration) -> JobRef {
        let gauge = self.clone();
        FnJob::new(name, move |_cancel| {
            let gauge = gauge.clone();
            async move {
                gauge.started.fetch_add(1, Ordering::SeqCst);
                let now = gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
                gauge.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(hold).await;
                gauge.current.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .into_ref()
    }
}

pub(crate) fn ok_job(name: &str) -> JobRef {
    FnJob::new(name, |_cancel| async { Ok(()) }).into_ref()
}

pub(crate) fn failing_job(name: &str, message: &'static str) -> JobRef {
    FnJob::new(name, move |_cancel| async move { Err(JobError::failed(message)) }).into_ref()
}

pub(crate) fn panicking_job(name: &str) -> JobRef {
    FnJob::new(name, |_cancel| async {
        if true {
            panic!("job blew up");
        }
        Ok(())
    })
    .into_ref()
}

/// Job that runs until cancelled, then reports `Cancelled`
pub(crate) fn cancellable_job(name: &str) -> JobRef {
    FnJob::new(name, |cancel: CancellationToken| async move {
        cancel.cancelled().await;
        Err(JobError::Cancelled)
    })
    .into_ref()
}

/// Event log shared by sources and listeners
#[derive(Clone, Default)]
pub(crate) struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub(crate) fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

/// Listener that writes every notification to a log
pub(crate) struct Recorder {
    pub(crate) log: Log,
}

impl RunListener for Recorder {
    fn job_completed(&self, record: &JobCompletion) {
        match &record.error {
            None => self.log.push(format!("job:{}:ok", record.job.name())),
            Some(e) => self.log.push(format!("job:{}:err:{}", record.job.name(), e)),
        }
    }

    fn all_completed(&self, record: &RunCompletion) {
        self.log.push(format!(
            "all:errors={}:stopped={}",
            record.errors.len(),
            record.stopped
        ));
    }
}

/// Scripted source: hands out jobs, optionally fails or panics on the Nth pull
pub(crate) struct Scripted {
    jobs: Mutex<VecDeque<JobRef>>,
    pulls: AtomicUsize,
    fail_on_pull: Option<usize>,
    panic_on_pull: Option<usize>,
    log: Log,
}

impl Scripted {
    pub(crate) fn new(jobs: Vec<JobRef>, log: &Log) -> Arc<Self> {
        Arc::new(Self {
            jobs: Mutex::new(jobs.into()),
            pulls: AtomicUsize::new(0),
            fail_on_pull: None,
            panic_on_pull: None,
            log: log.clone(),
        })
    }

    pub(crate) fn failing_on(jobs: Vec<JobRef>, pull: usize, log: &Log) -> Arc<Self> {
        Arc::new(Self {
            jobs: Mutex::new(jobs.into()),
            pulls: AtomicUsize::new(0),
            fail_on_pull: Some(pull),
            panic_on_pull: None,
            log: log.clone(),
        })
    }

    pub(crate) fn panicking_on(jobs: Vec<JobRef>, pull: usize, log: &Log) -> Arc<Self> {
        Arc::new(Self {
            jobs: Mutex::new(jobs.into()),
            pulls: AtomicUsize::new(0),
            fail_on_pull: None,
            panic_on_pull: Some(pull),
            log: log.clone(),
        })
    }

    pub(crate) fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }
}

impl JobSource for Scripted {
    fn next(&self) -> Result<Option<JobRef>, SourceError> {
        let pull = self.pulls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_pull == Some(pull) {
            self.log.push("source:error");
            return Err(SourceError::new("database offline"));
        }
        if self.panic_on_pull == Some(pull) {
            panic!("source bug");
        }
        let job = self.jobs.lock().unwrap().pop_front();
        match &job {
            Some(j) => self.log.push(format!("source:next:{}", j.name())),
            None => self.log.push("source:none"),
        }
        Ok(job)
    }

    fn completed(&self, record: &JobCompletion) {
        self.log
            .push(format!("source:completed:{}", record.job.name()));
    }

    fn all_completed(&self, record: &RunCompletion) {
        self.log.push(format!(
            "source:all:errors={}:stopped={}",
            record.errors.len(),
            record.stopped
        ));
    }
}

pub(crate) fn source(s: Arc<Scripted>) -> Arc<dyn JobSource> {
    s
}
