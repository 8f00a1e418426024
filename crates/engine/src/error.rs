// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for runners

use thiserror::Error;

/// Errors returned when starting a run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("runner already started; use a fresh runner for each run")]
    AlreadyStarted,
}
