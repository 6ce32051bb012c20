use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    fmt::{self, Debug, Display},
    future::Future,
    io::Write,
    time::Duration,
};

use crate::{Error, Metric};

/// A [`Report`] is the processed form of a [`Metric`].
///
/// Reports turn the raw counters of an aggregate into values people care about:
/// rates, averages and ratios. They are plain data with no I/O. Side effects
/// belong to a [`Reporter`].
///
/// # Example
/// ```rust
/// use loadrun::{Metric, Report};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct ErrorsOnly {
///     errors: usize,
/// }
///
/// impl From<Metric> for ErrorsOnly {
///     fn from(m: Metric) -> Self {
///         Self { errors: m.num_errors }
///     }
/// }
///
/// impl Report for ErrorsOnly {}
/// ```
pub trait Report
where
    Self: Send + Sync + Debug + From<Metric> + Serialize + DeserializeOwned,
{
}

/// A [`Reporter`] consumes a [`Report`] and sends it somewhere: a terminal, a file,
/// a remote service.
pub trait Reporter<R: Report> {
    fn report(&self, report: &R) -> impl Future<Output = Result<(), Error>>;
}

/// The built-in summary of a run.
///
/// Every value that would require dividing by zero is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicReport {
    pub routines: usize,
    pub requests: usize,
    pub errors: usize,
    /// Successful requests per second of per-routine busy time
    pub request_rate: Option<f64>,
    pub average_request_time: Option<Duration>,
    pub min_response: Option<Duration>,
    pub max_response: Option<Duration>,
    pub average_routine_duration: Option<Duration>,
    pub error_rate: Option<f64>,
}

impl From<Metric> for BasicReport {
    fn from(value: Metric) -> Self {
        Self {
            routines: value.num_routines,
            requests: value.num_requests,
            errors: value.num_errors,
            request_rate: value.average_request_rate(),
            average_request_time: value
                .average_request_time()
                .and_then(|s| Duration::try_from_secs_f64(s).ok()),
            min_response: value.min_response,
            max_response: value.max_response,
            average_routine_duration: value
                .average_duration_secs()
                .and_then(|s| Duration::try_from_secs_f64(s).ok()),
            error_rate: value.error_rate(),
        }
    }
}

impl Report for BasicReport {}

struct Maybe<T>(Option<T>);

impl Display for Maybe<Duration> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(d) => write!(f, "{d:?}"),
            None => f.write_str("n/a"),
        }
    }
}

impl Display for Maybe<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.2}"),
            None => f.write_str("n/a"),
        }
    }
}

impl Display for BasicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Num. routines: {}", self.routines)?;
        writeln!(f, "Num. requests: {}", self.requests)?;
        writeln!(f, "Num. errors: {}", self.errors)?;
        writeln!(f, "Error rate (%): {}", Maybe(self.error_rate.map(|r| r * 100.0)))?;
        writeln!(f, "Avg. request rate: {} request/s", Maybe(self.request_rate))?;
        writeln!(f, "Avg. request time: {}", Maybe(self.average_request_time))?;
        writeln!(f, "Min. response: {}", Maybe(self.min_response))?;
        writeln!(f, "Max. response: {}", Maybe(self.max_response))?;
        write!(
            f,
            "Avg. routine duration: {}",
            Maybe(self.average_routine_duration)
        )
    }
}

/// Prints the human readable rendering of a [`BasicReport`] to stdout.
pub struct StdoutReporter;

impl Reporter<BasicReport> for StdoutReporter {
    async fn report(&self, report: &BasicReport) -> Result<(), Error> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{report}")?;
        Ok(())
    }
}

/// Prints any [`Report`] to stdout as a single line of JSON.
pub struct JsonReporter;

impl<R: Report> Reporter<R> for JsonReporter {
    async fn report(&self, report: &R) -> Result<(), Error> {
        let value = serde_json::to_string(report)?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{value}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Metric {
        let mut a = Metric::for_worker();
        a.record_success(Duration::from_millis(100));
        a.record_success(Duration::from_millis(300));
        a.record_error();
        let mut b = Metric::for_worker();
        b.record_success(Duration::from_millis(200));
        b.record_success(Duration::from_millis(200));
        [a, b].into_iter().collect()
    }

    #[test]
    fn basic_report_from_metric() {
        let report = BasicReport::from(sample());
        assert_eq!(report.routines, 2);
        assert_eq!(report.requests, 4);
        assert_eq!(report.errors, 1);
        assert_eq!(report.min_response, Some(Duration::from_millis(100)));
        assert_eq!(report.max_response, Some(Duration::from_millis(300)));
        assert_eq!(report.average_request_time, Some(Duration::from_millis(200)));
        assert_eq!(
            report.average_routine_duration,
            Some(Duration::from_millis(400))
        );
        assert_eq!(report.request_rate, Some(10.0));
        assert_eq!(report.error_rate, Some(0.2));
    }

    #[test]
    fn basic_report_from_empty_metric() {
        let report = BasicReport::from(Metric::new());
        assert_eq!(report.routines, 0);
        assert_eq!(report.request_rate, None);
        assert_eq!(report.average_request_time, None);
        assert_eq!(report.average_routine_duration, None);
        assert_eq!(report.min_response, None);
        assert_eq!(report.max_response, None);
        assert_eq!(report.error_rate, None);
    }

    #[test]
    fn display_lists_every_statistic() {
        let text = BasicReport::from(sample()).to_string();
        assert!(text.contains("Num. routines: 2"));
        assert!(text.contains("Num. requests: 4"));
        assert!(text.contains("Num. errors: 1"));
        assert!(text.contains("Error rate (%): 20.00"));
        assert!(text.contains("Avg. request rate: 10.00 request/s"));
        assert!(text.contains("Min. response: 100ms"));
        assert!(text.contains("Max. response: 300ms"));
        assert!(text.contains("Avg. routine duration: 400ms"));
    }

    #[test]
    fn json_keeps_undefined_values_as_null() {
        let value = serde_json::to_value(BasicReport::from(Metric::new())).unwrap();
        assert_eq!(value["routines"], 0);
        assert!(value["request_rate"].is_null());
        assert!(value["min_response"].is_null());
    }

    #[tokio::test]
    async fn reporters_write_without_error() {
        let report = BasicReport::from(sample());
        StdoutReporter.report(&report).await.unwrap();
        JsonReporter.report(&report).await.unwrap();
    }
}
