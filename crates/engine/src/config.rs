// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner configuration and per-run options

use std::num::NonZeroUsize;

/// Environment variable overriding the worker count
pub const WORKERS_ENV: &str = "JR_MAX_WORKERS";

/// Environment-provided processor count, consulted when no worker count is set
pub const PROCESSORS_ENV: &str = "NUMBER_OF_PROCESSORS";

/// Runner configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Upper bound on concurrently executing jobs; `None` means
    /// derive it from the environment
    pub max_workers: Option<usize>,
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `JR_MAX_WORKERS`
    pub fn from_env() -> Self {
        Self {
            max_workers: parse_workers(std::env::var(WORKERS_ENV).ok().as_deref()),
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    /// Resolve the worker bound for a run.
    ///
    /// Precedence: `requested`, the configured value, `NUMBER_OF_PROCESSORS`,
    /// then the host's available parallelism. Never less than 1.
    pub fn resolve_workers(&self, requested: Option<usize>) -> usize {
        requested
            .or(self.max_workers)
            .or_else(|| parse_workers(std::env::var(PROCESSORS_ENV).ok().as_deref()))
            .or_else(|| std::thread::available_parallelism().ok().map(NonZeroUsize::get))
            .unwrap_or(1)
            .max(1)
    }
}

/// Parse a worker count from an environment value. Anything that is not a
/// non-negative integer counts as unset.
pub(crate) fn parse_workers(value: Option<&str>) -> Option<usize> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Options for a single call to [`Runner::run`](crate::Runner::run)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Return only after the aggregate completion has been delivered
    pub wait: bool,
    /// Overrides the runner's configured worker bound
    pub max_workers: Option<usize>,
}

impl RunOptions {
    pub fn waiting(mut self) -> Self {
        self.wait = true;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
