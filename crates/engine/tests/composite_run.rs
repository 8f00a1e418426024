// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Integration tests for composite sources driven by both runners
//!
//! Checks ordering of inner pulls, per-source drain notifications and
//! aggregate statistics through a real run.

use jr_core::{
    CompositeSource, FnJob, JobCompletion, JobList, JobRef, JobSource, RunCompletion,
    SourceError,
};
use jr_engine::{ConcurrentRunner, RunOptions, Runner, RunnerConfig, SequentialRunner};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Events = Arc<Mutex<Vec<String>>>;

fn job(name: &str, hold_ms: u64) -> JobRef {
    FnJob::new(name, move |_cancel| async move {
        tokio::time::sleep(Duration::from_millis(hold_ms)).await;
        Ok(())
    })
    .into_ref()
}

/// Wraps a `JobList` and records every call it receives
struct Watched {
    list: JobList,
    events: Events,
}

impl Watched {
    fn new(name: &str, jobs: Vec<JobRef>, events: &Events) -> Arc<Self> {
        Arc::new(Self {
            list: JobList::new(name, jobs),
            events: Arc::clone(events),
        })
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl JobSource for Watched {
    fn next(&self) -> Result<Option<JobRef>, SourceError> {
        let job = self.list.next()?;
        match &job {
            Some(j) => self.push(format!("{}.next:{}", self.list.name(), j.name())),
            None => self.push(format!("{}.none", self.list.name())),
        }
        Ok(job)
    }

    fn completed(&self, record: &JobCompletion) {
        self.list.completed(record);
        self.push(format!("{}.completed:{}", self.list.name(), record.job.name()));
    }

    fn all_completed(&self, record: &RunCompletion) {
        self.list.all_completed(record);
        self.push(format!("{}.all_completed", self.list.name()));
    }
}

fn position(events: &[String], event: &str) -> usize {
    events
        .iter()
        .position(|e| e == event)
        .unwrap_or_else(|| panic!("missing event {event}: {events:?}"))
}

fn fixture(events: &Events) -> (Arc<Watched>, Arc<Watched>, Arc<CompositeSource>) {
    let a = Watched::new("A", vec![job("j1", 20), job("j2", 20)], events);
    let b = Watched::new("B", vec![job("j3", 5)], events);
    let composite = Arc::new(CompositeSource::new([
        Arc::clone(&a) as Arc<dyn JobSource>,
        Arc::clone(&b) as Arc<dyn JobSource>,
    ]));
    (a, b, composite)
}

fn check_run(events: &Events, a: &Watched, b: &Watched, job_notifications: usize) {
    let events = events.lock().unwrap().clone();

    assert_eq!(job_notifications, 3);
    assert!(position(&events, "A.none") < position(&events, "B.next:j3"));
    assert!(position(&events, "A.completed:j1") < position(&events, "A.all_completed"));
    assert!(position(&events, "A.completed:j2") < position(&events, "A.all_completed"));
    assert!(position(&events, "B.completed:j3") < position(&events, "B.all_completed"));
    assert_eq!(events.iter().filter(|e| e.ends_with("all_completed")).count(), 2);

    let (sa, sb) = (a.list.stats(), b.list.stats());
    assert_eq!(sa.issued + sb.issued, 3);
    assert_eq!(sa.succeeded + sb.succeeded, 3);
    assert_eq!(sa.remaining + sb.remaining, 0);
}

#[tokio::test]
async fn concurrent_runner_drives_composite() {
    let events = Events::default();
    let (a, b, composite) = fixture(&events);
    let notified = Arc::new(Mutex::new(0usize));
    let a_finished_first = Arc::new(Mutex::new(false));

    let counter = Arc::clone(&notified);
    let a_seen = Arc::clone(&a);
    let b_seen = Arc::clone(&b);
    let seen = Arc::clone(&a_finished_first);
    let runner = ConcurrentRunner::new(RunnerConfig::new().with_max_workers(2))
        .on_job_completed(move |_record| *counter.lock().unwrap() += 1)
        .on_all_completed(move |_record| {
            *seen.lock().unwrap() =
                a_seen.list.finished().is_some() && b_seen.list.finished().is_some();
        });

    let handle = runner
        .run(composite.clone(), RunOptions::default().waiting())
        .await
        .unwrap();

    assert!(handle.wait().await.is_success());
    assert!(*a_finished_first.lock().unwrap());
    assert_eq!(composite.in_flight(), 0);
    check_run(&events, &a, &b, *notified.lock().unwrap());
}

#[tokio::test]
async fn sequential_runner_drives_composite() {
    let events = Events::default();
    let (a, b, composite) = fixture(&events);
    let notified = Arc::new(Mutex::new(0usize));

    let counter = Arc::clone(&notified);
    let runner =
        SequentialRunner::new().on_job_completed(move |_record| *counter.lock().unwrap() += 1);

    let handle = runner
        .run(composite, RunOptions::default().waiting())
        .await
        .unwrap();

    assert!(handle.wait().await.is_success());
    check_run(&events, &a, &b, *notified.lock().unwrap());

    // One job at a time: A fully drains before B is pulled
    let events = events.lock().unwrap().clone();
    assert!(position(&events, "A.all_completed") < position(&events, "B.next:j3"));
}
