// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner contract shared by the concurrent and sequential runners

use crate::config::RunOptions;
use crate::control::{RunHandle, RunPhase};
use crate::error::RunError;
use async_trait::async_trait;
use jr_core::JobSource;
use std::sync::Arc;

/// Drives a [`JobSource`] to completion.
///
/// Listeners are registered on the concrete runner before `run`. A runner
/// runs once; create a new one for each run.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Start pulling from `source`. With `options.wait` this returns after
    /// the aggregate completion was delivered; otherwise immediately.
    async fn run(
        &self,
        source: Arc<dyn JobSource>,
        options: RunOptions,
    ) -> Result<RunHandle, RunError>;

    /// Request cooperative cancellation. Does not block on in-flight jobs;
    /// once it returns, no further job is pulled.
    fn stop(&self);

    fn phase(&self) -> RunPhase;

    /// Jobs currently executing or delivering their completion
    fn in_flight(&self) -> usize;
}
