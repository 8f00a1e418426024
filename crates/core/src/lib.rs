// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jr-core: job and job source abstractions for the jr runner
//!
//! This crate provides:
//! - The `Job` capability and job-level errors
//! - The pull-based `JobSource` contract and a list-backed leaf source
//! - `CompositeSource` for chaining sources in order
//! - Completion records shared by sources, runners and listeners
//! - Status records for the build/upgrade web front end

pub mod composite;
pub mod job;
pub mod record;
pub mod source;
pub mod web;

pub use composite::CompositeSource;
pub use job::{same_job, FnJob, Job, JobError, JobRef};
pub use record::{JobCompletion, RunCompletion, SchedulerError};
pub use source::{JobList, JobListStats, JobSource, SourceError};
pub use web::{BuildJob, Upgrade};

// Re-export so job implementations don't need a direct tokio-util dependency
pub use tokio_util::sync::CancellationToken;
