// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jr execution engine: runners that drive job sources

mod completion;
mod concurrent;
mod config;
mod control;
mod error;
mod listener;
mod runner;
mod sequential;

pub use concurrent::ConcurrentRunner;
pub use config::{RunOptions, RunnerConfig, PROCESSORS_ENV, WORKERS_ENV};
pub use control::{RunHandle, RunPhase};
pub use error::RunError;
pub use listener::RunListener;
pub use runner::Runner;
pub use sequential::SequentialRunner;

#[cfg(test)]
#[path = "test_support.rs"]
mod test_support;
