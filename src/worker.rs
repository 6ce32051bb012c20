//! The worker loop: a single logical thread of execution hammering one task.

use std::{fmt::Debug, future::Future, time::Duration};

use tokio::time::Instant;

use crate::Metric;

/// Invoke `action` back to back until `duration` has elapsed and return the
/// statistics of this worker.
///
/// The deadline is only checked before each invocation. An invocation that is
/// already running is never interrupted, so the worker may overrun `duration` by
/// the latency of one call. With a zero `duration` the action is never invoked.
///
/// Failed invocations are counted but not timed.
pub async fn run<F, Fut, E>(action: &F, duration: Duration) -> Metric
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Debug,
{
    let mut metric = Metric::for_worker();
    let session = Instant::now();

    while session.elapsed() < duration {
        let started = Instant::now();
        match action().await {
            Ok(()) => metric.record_success(started.elapsed()),
            Err(e) => {
                tracing::trace!("Task failed: {e:?}");
                metric.record_error();
            }
        }
        // Tasks that complete without ever suspending would otherwise starve
        // every other worker sharing this runtime thread.
        tokio::task::yield_now().await;
    }

    metric
}
