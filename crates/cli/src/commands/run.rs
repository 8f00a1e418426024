// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jr run <jobfile>` - Run every batch in a jobfile

use crate::jobfile::Jobfile;
use crate::output::{self, BatchSummary, JobFailure, OutputFormat, RunSummary};
use crate::recorder::ResultsRecorder;
use anyhow::{Context, Result};
use clap::Args;
use jr_adapters::{DatabaseConnection, JsonDatabase, TracedDatabase};
use jr_core::{CompositeSource, JobCompletion, JobSource};
use jr_engine::{
    ConcurrentRunner, RunListener, RunOptions, Runner, RunnerConfig, SequentialRunner,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Args)]
pub struct RunArgs {
    /// Jobfile listing batches of shell commands
    pub jobfile: PathBuf,

    /// Maximum concurrent jobs (default: JR_MAX_WORKERS, then processor count)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Run one job at a time, in jobfile order
    #[arg(long, conflicts_with = "workers")]
    pub sequential: bool,

    /// Append job results to this JSON database
    #[arg(long, value_name = "PATH")]
    pub results: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

type Recorder = ResultsRecorder<TracedDatabase<JsonDatabase>>;

pub async fn run(args: RunArgs) -> Result<()> {
    let jobfile = Jobfile::load(&args.jobfile)?;
    let base_dir = args
        .jobfile
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let lists = jobfile.job_lists(&base_dir);
    let source: Arc<dyn JobSource> = Arc::new(CompositeSource::new(
        lists.iter().map(|l| Arc::clone(l) as Arc<dyn JobSource>),
    ));

    let recorder = match &args.results {
        Some(path) => Some(Arc::new(open_recorder(path)?)),
        None => None,
    };

    let failures = Arc::new(Mutex::new(Vec::new()));
    let runner = build_runner(
        args.sequential,
        Arc::clone(&failures),
        recorder.clone().map(|r| r as Arc<dyn RunListener>),
    );
    tracing::info!(batches = lists.len(), sequential = args.sequential, "starting run");

    // Ctrl-C stops pulling; running jobs see their cancellation token fire
    let stopper = Arc::clone(&runner);
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, stopping");
            stopper.stop();
        }
    });

    let options = RunOptions {
        wait: true,
        max_workers: args.workers,
    };
    let handle = runner.run(source, options).await?;
    let record = handle.wait().await;
    interrupt.abort();

    if let Some(recorder) = &recorder {
        recorder.close().context("failed to write results database")?;
    }

    let batches = lists
        .iter()
        .map(|l| BatchSummary::new(l.name(), l.stats()))
        .collect();
    let mut failures = std::mem::take(&mut *failures.lock().unwrap_or_else(|e| e.into_inner()));
    failures.sort_by(|a, b| a.job.cmp(&b.job));
    let summary = RunSummary::new(batches, failures, &record);
    output::print(&summary, args.format);

    if !summary.is_success() {
        anyhow::bail!(
            "run did not succeed ({} job(s) failed, {} scheduler error(s){})",
            summary.failed(),
            summary.errors.len(),
            if summary.stopped { ", stopped" } else { "" }
        );
    }
    Ok(())
}

fn open_recorder(path: &Path) -> Result<Recorder> {
    let mut db = TracedDatabase::new(JsonDatabase::new());
    db.open(path, false)
        .with_context(|| format!("failed to open results database {}", path.display()))?;
    let run_id = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string();
    Ok(ResultsRecorder::new(db, run_id)?)
}

fn build_runner(
    sequential: bool,
    failures: Arc<Mutex<Vec<JobFailure>>>,
    recorder: Option<Arc<dyn RunListener>>,
) -> Arc<dyn Runner> {
    let track = move |record: &JobCompletion| {
        if let Some(e) = &record.error {
            failures
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(JobFailure {
                    job: record.job.name().to_string(),
                    error: e.to_string(),
                });
        }
    };

    if sequential {
        let mut runner = SequentialRunner::new().on_job_completed(track);
        if let Some(recorder) = recorder {
            runner = runner.with_listener(recorder);
        }
        Arc::new(runner)
    } else {
        let mut runner = ConcurrentRunner::new(RunnerConfig::from_env()).on_job_completed(track);
        if let Some(recorder) = recorder {
            runner = runner.with_listener(recorder);
        }
        Arc::new(runner)
    }
}
