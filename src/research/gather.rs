//! Best-effort concurrent gather
//!
//! Runs a batch of fallible tasks concurrently and keeps only the successes,
//! in the order they complete. A failing task is logged and dropped; it never
//! cancels its siblings. Dropping the returned future aborts every task still
//! running, since the [`JoinSet`] owns them.

use crate::types::{ResearchError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn, Instrument};

/// Limits applied to a gather
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatherOptions {
    /// Upper bound on tasks running at once; `None` runs them all together
    pub max_concurrent: Option<usize>,
    /// Per-task deadline; an expired task counts as a failure
    pub timeout: Option<Duration>,
}

impl GatherOptions {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_concurrent(mut self, limit: usize) -> Self {
        self.max_concurrent = Some(limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Run every task and collect the successful outputs in completion order.
///
/// An empty batch returns immediately without spawning anything.
pub async fn best_effort_gather<T, F>(tasks: Vec<F>, options: GatherOptions) -> Vec<T>
where
    T: Send + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    if tasks.is_empty() {
        return Vec::new();
    }

    let total = tasks.len();
    let limiter = options
        .max_concurrent
        .filter(|limit| *limit > 0)
        .map(|limit| Arc::new(Semaphore::new(limit)));

    let mut set = JoinSet::new();
    for (index, task) in tasks.into_iter().enumerate() {
        let limiter = limiter.clone();
        let timeout = options.timeout;
        set.spawn(
            async move {
                let _permit = match limiter {
                    Some(semaphore) => match semaphore.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(e) => {
                            return (index, Err(ResearchError::Internal(e.to_string())));
                        }
                    },
                    None => None,
                };
                let outcome = match timeout {
                    Some(limit) => tokio::time::timeout(limit, task)
                        .await
                        .unwrap_or_else(|_| {
                            Err(ResearchError::Internal(format!(
                                "timed out after {}s",
                                limit.as_secs_f32()
                            )))
                        }),
                    None => task.await,
                };
                (index, outcome)
            }
            .in_current_span(),
        );
    }

    let mut results = Vec::with_capacity(total);
    let mut completed = 0usize;
    while let Some(joined) = set.join_next().await {
        completed += 1;
        match joined {
            Ok((_, Ok(value))) => results.push(value),
            Ok((index, Err(e))) => warn!(task = index, "Task failed: {}", e),
            Err(e) => warn!("Task aborted: {}", e),
        }
        debug!("{}/{} tasks completed", completed, total);
    }

    results
}
