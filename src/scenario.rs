use std::{fmt::Debug, future::Future};

use typed_builder::TypedBuilder;

use crate::{Metric, executor::Executor};

/// A named unit of load: the action to hammer and the executor that drives it.
///
/// The action is an async closure returning `Result<(), E>`. `Ok` counts as a
/// timed request and `Err` as an error. It is cloned into every worker, so build
/// expensive resources (clients, connection pools) outside the closure and clone
/// cheap handles to them inside.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Scenario<X, F> {
    #[builder(setter(into))]
    pub name: String,
    pub action: F,
    pub executor: X,
}

impl<X, F> Scenario<X, F> {
    /// Run the scenario with its executor and return the aggregate metric.
    pub async fn run<Fut, E>(&self) -> Result<Metric, X::Error>
    where
        X: Executor<F, Fut, E>,
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Debug + Send + 'static,
    {
        self.executor.exec(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstantExecutor;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn run_delegates_to_executor() {
        let scenario = Scenario::builder()
            .name(String::from("sleep"))
            .action(|| async {
                tokio::time::sleep(Duration::from_millis(25)).await;
                Ok::<(), ()>(())
            })
            .executor(
                ConstantExecutor::builder()
                    .duration(Duration::from_millis(100))
                    .workers(2)
                    .build(),
            )
            .build();

        assert_eq!(scenario.name, "sleep");
        let metric = scenario.run().await.unwrap();
        assert_eq!(metric.num_routines, 2);
        assert_eq!(metric.num_requests, 8);

        // scenarios are reusable
        let again = scenario.run().await.unwrap();
        assert_eq!(again, metric);
    }
}
