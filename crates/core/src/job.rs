// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job capability: one opaque, cancellable unit of work

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure raised while executing a single job
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("{message}")]
    Failed { message: String },
    #[error("cancelled")]
    Cancelled,
    #[error("panicked: {message}")]
    Panicked { message: String },
}

impl JobError {
    pub fn failed(message: impl Into<String>) -> Self {
        JobError::Failed {
            message: message.into(),
        }
    }

    /// Build a `Panicked` error from a caught panic payload
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        JobError::Panicked { message }
    }
}

/// A unit of work handed out by a [`JobSource`](crate::JobSource).
///
/// Jobs are executed at most once. Cancellation is cooperative: a job that
/// never looks at `cancel` runs to its natural end.
#[async_trait]
pub trait Job: Send + Sync {
    /// Name used in logs only
    fn name(&self) -> &str {
        "job"
    }

    async fn run(&self, cancel: CancellationToken) -> Result<(), JobError>;
}

/// Shared handle to a job. Identity is the allocation, not the contents.
pub type JobRef = Arc<dyn Job>;

/// True when both handles point at the same job
pub fn same_job(a: &JobRef, b: &JobRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Job backed by an async closure
pub struct FnJob<F> {
    name: String,
    f: F,
}

impl<F, Fut> FnJob<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    pub fn into_ref(self) -> JobRef {
        Arc::new(self)
    }
}

#[async_trait]
impl<F, Fut> Job for FnJob<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, cancel: CancellationToken) -> Result<(), JobError> {
        (self.f)(cancel).await
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
