// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: tabular databases and shell-command jobs

pub mod db;
pub mod shell;
pub mod traced;

pub use db::{DatabaseConnection, DatabaseError, JsonDatabase, Table};
pub use shell::ShellJob;
pub use traced::TracedDatabase;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use db::{DbCall, MemoryDatabase};
