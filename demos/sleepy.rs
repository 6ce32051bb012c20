use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use loadrun::{
    BasicReport, ConstantExecutor, JsonReporter, Reporter, Scenario, StdoutReporter,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Overloaded;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // NEVER instantiate heavy things like clients inside the action.
    // Share a handle and clone it in instead.
    let calls = Arc::new(AtomicU64::new(0));
    let metric = Scenario::builder()
        .name("Simulated backend")
        .action(move || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::Relaxed);
                // Pretend the backend gets slower and sheds every 10th request
                tokio::time::sleep(Duration::from_micros(500 + (n % 7) * 250)).await;
                if n % 10 == 9 { Err(Overloaded) } else { Ok(()) }
            }
        })
        .executor(
            ConstantExecutor::builder()
                .duration(Duration::from_secs(2))
                .workers(8)
                .build(),
        )
        .build()
        .run()
        .await
        .unwrap();

    let report = BasicReport::from(metric);
    StdoutReporter.report(&report).await.unwrap();
    JsonReporter.report(&report).await.unwrap();
}
