//! loadrun: a small concurrent load-generation harness for Rust.
//!
//! Give it an async task that either succeeds or fails. It keeps that task busy on
//! a fixed number of parallel workers for a fixed wall-clock duration, then merges
//! each worker's timing and error statistics into a single [`Metric`].
//!
//! # Architecture
//!
//! The main building blocks are:
//!
//! - [`Scenario`]: glue that ties everything together. It names the run and
//!   holds the action being measured and the executor that drives it.
//! - [`Executor`]: responsible for actually running the scenario. The built-in
//!   [`ConstantExecutor`] spawns N workers for a fixed duration and merges their
//!   results over a channel.
//! - [`worker::run`]: the worker loop. It invokes the action back to back, timing
//!   successes and counting failures into a worker-private [`Metric`].
//! - [`Metric`]: a cheap, mergeable min/max/sum/count accumulator with derived
//!   rates and averages.
//! - [`Report`]: transforms a [`Metric`] into human- or machine-friendly output.
//! - [`Reporter`]: consumes `Report`s and sends them somewhere (stdout, JSON).
//!
//! Task failures never abort a run; they are counted in [`Metric::num_errors`]
//! and excluded from latency statistics. The harness does not retry, throttle or
//! rate-limit the task.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use loadrun::{BasicReport, Reporter, StdoutReporter, run_perf_test};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let metric = run_perf_test(
//!         || async {
//!             tokio::time::sleep(Duration::from_millis(1)).await;
//!             Ok::<(), std::io::Error>(())
//!         },
//!         Duration::from_millis(50),
//!         4,
//!     )
//!     .await
//!     .unwrap();
//!
//!     assert_eq!(metric.num_routines, 4);
//!     StdoutReporter.report(&BasicReport::from(metric)).await.unwrap();
//! }
//! ```
//!
//! # Feature flags
//! - `internals`: enable access to internal (and unstable) functions such as
//!   `spawn_workers`

/// Error type shared by executors and reporters
pub mod error;
/// Orchestrators that define how things will actually run
pub mod executor;
/// The statistics accumulator
pub mod metric;
/// Reports and Reporters
pub mod report;
/// Main module of the framework that glues everything together
pub mod scenario;
pub mod worker;

pub use error::{Error, Result};
pub use executor::{ConstantExecutor, Executor};
pub use metric::Metric;
pub use report::{BasicReport, JsonReporter, Report, Reporter, StdoutReporter};
pub use scenario::Scenario;

use std::{fmt::Debug, future::Future, time::Duration};

/// Run `action` on `workers` concurrent workers for `duration` and return the
/// merged [`Metric`].
///
/// This is shorthand for a [`Scenario`] driven by a [`ConstantExecutor`].
pub async fn run_perf_test<F, Fut, E>(action: F, duration: Duration, workers: usize) -> Result<Metric>
where
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
    E: Debug + Send + 'static,
{
    Scenario::builder()
        .name("performance test")
        .action(action)
        .executor(
            ConstantExecutor::builder()
                .duration(duration)
                .workers(workers)
                .build(),
        )
        .build()
        .run()
        .await
}
