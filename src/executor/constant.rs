//! The `ConstantExecutor`: a fixed number of workers for a fixed duration.
//!
//! # High-level flow
//! 1. A bounded channel is created with room for one message per worker.
//! 2. N worker tasks are spawned. Each runs the worker loop for the configured
//!    duration with its own private [`Metric`], then sends that metric once.
//! 3. The coordinator drops its own sender and receives until the channel
//!    closes, folding each metric into the aggregate as it arrives. Arrival order
//!    does not matter because merging is associative and commutative.
//! 4. Worker handles are joined so that panics are reported.
//!
//! Workers share nothing but the action itself. There are no locks on the hot
//! path, and the aggregate is only ever touched by the coordinator.
//!
//! # Common pitfalls
//! - **Do not block inside the action.** Workers are tokio tasks; blocking calls
//!   stall the runtime thread and every worker scheduled on it.
//! - **Build heavy objects outside the action.** Clients and buffers should be
//!   created once and cloned into the closure.
use serde::{Deserialize, Serialize};
use tokio::{sync::mpsc, task::JoinHandle};
use typed_builder::TypedBuilder;

use super::Executor;
use crate::{Error, Metric, scenario::Scenario};
use internals::*;

use futures::future::join_all;
use std::{fmt::Debug, future::Future, time::Duration};

fn default_workers() -> usize {
    num_cpus::get()
}

/// Executor that runs `workers` concurrent workers, each for `duration`.
///
/// # Example
/// ```rust
/// use loadrun::ConstantExecutor;
/// use std::time::Duration;
///
/// let executor = ConstantExecutor::builder()
///     .duration(Duration::from_secs(10))
///     .workers(8)
///     .build();
/// assert_eq!(executor.workers, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
pub struct ConstantExecutor {
    /// How long every worker keeps invoking the action.
    pub duration: Duration,
    /// The number of concurrent worker tasks to spawn.
    #[builder(default = default_workers())]
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl<F, Fut, E> Executor<F, Fut, E> for ConstantExecutor
where
    Self: Send + Sync + Sized,
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Debug + Send + 'static,
{
    type Error = Error;

    async fn exec(&self, scenario: &Scenario<Self, F>) -> Result<Metric, Self::Error> {
        tracing::info!("------ Running performance test: {} ------", scenario.name);
        let (results_tx, mut results_rx) = mpsc::channel(self.workers.max(1));

        tracing::info!(
            "Spawning {} workers for {:?}...",
            self.workers,
            self.duration
        );
        let handles = spawn_workers(
            results_tx,
            self.workers,
            self.duration,
            scenario.action.clone(),
        );

        let mut aggregate = Metric::new();
        while let Some(metric) = results_rx.recv().await {
            aggregate.merge(metric);
        }

        for res in join_all(handles).await {
            if let Err(e) = res {
                // the worker's metric is lost, which shows up as a missing routine
                tracing::error!("Worker panicked with error: {e}");
            }
        }

        tracing::info!("Performance results:\n{aggregate}");
        tracing::info!("------ Finished performance test: {} ------", scenario.name);
        Ok(aggregate)
    }
}

#[cfg(feature = "internals")]
pub use internals::*;

/// Internal components for the `ConstantExecutor`.
/// Encapsulated in a module to allow conditional exposure via `#[cfg(feature = "internals")]`.
mod internals {
    use super::*;
    use crate::worker;

    /// Spawns `workers` Tokio tasks, each running the worker loop for `duration`
    /// and handing its metric to `results` once done.
    ///
    /// `results` is consumed: once every worker has finished, all senders are
    /// gone and the receiving side observes a closed channel.
    pub fn spawn_workers<F, Fut, E>(
        results: mpsc::Sender<Metric>,
        workers: usize,
        duration: Duration,
        action: F,
    ) -> Vec<JoinHandle<()>>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Debug + Send + 'static,
    {
        (0..workers)
            .map(|i| {
                let results = results.clone();
                let action = action.clone();
                tokio::spawn(async move {
                    tracing::debug!("Worker {i} started.");
                    let metric = worker::run(&action, duration).await;
                    tracing::debug!(
                        "Worker {i} finished: {} requests, {} errors.",
                        metric.num_requests,
                        metric.num_errors
                    );
                    if results.send(metric).await.is_err() {
                        tracing::warn!("Worker {i} could not hand off its metric (receiver dropped).");
                    }
                })
            })
            .collect()
    }
}
