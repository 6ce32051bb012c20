//! Executor: orchestration of a run
//!
//! The `Executor` trait is the runtime that executes a `Scenario`. It decides how
//! many workers run, for how long, and how their results are gathered.
//!
//! loadrun ships a [`ConstantExecutor`], which keeps a fixed number of workers
//! busy for a fixed duration and merges their [`Metric`]s into one aggregate.
pub mod constant;
pub use constant::ConstantExecutor;

use crate::{Metric, scenario::Scenario};
use std::{fmt::Debug, future::Future};

/// The runtime hook that executes a `Scenario`.
///
/// The trait is generic over the action, its future and its error type, so any
/// async closure returning `Result<(), E>` can be driven.
pub trait Executor<F, Fut, E>
where
    Self: Send + Sync + Sized,
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Debug + Send + 'static,
{
    type Error;
    /// Execute the scenario and return the merged metric of all workers.
    ///
    /// Failures of `scenario.action` are part of the result, never an `Err`.
    fn exec(
        &self,
        scenario: &Scenario<Self, F>,
    ) -> impl Future<Output = Result<Metric, Self::Error>> + Send;
}
