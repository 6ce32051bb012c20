use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::report::BasicReport;

/// A `Metric` accumulates execution statistics, either for a single worker or for
/// the merged result of a whole run.
///
/// Only successful invocations contribute timing data. A failed invocation bumps
/// [`num_errors`](Self::num_errors) and nothing else, so error latency never
/// skews the response statistics.
///
/// ## Merging
/// [`merge`](Self::merge) is associative and commutative, and [`Metric::new`] is its
/// identity. Worker metrics can be folded in whatever order they arrive and the
/// aggregate comes out the same.
///
/// ## Derived statistics
/// Averages and rates are division based. Each accessor returns `None` when its
/// denominator is zero instead of producing `NaN` or infinity.
///
/// ## Example
/// ```rust
/// use loadrun::Metric;
/// use std::time::Duration;
///
/// let mut a = Metric::for_worker();
/// a.record_success(Duration::from_millis(10));
/// a.record_error();
///
/// let mut b = Metric::for_worker();
/// b.record_success(Duration::from_millis(30));
///
/// let mut total = Metric::new();
/// total.merge(a);
/// total.merge(b);
///
/// assert_eq!(total.num_routines, 2);
/// assert_eq!(total.num_requests, 2);
/// assert_eq!(total.num_errors, 1);
/// assert_eq!(total.min_response, Some(Duration::from_millis(10)));
/// assert_eq!(total.max_response, Some(Duration::from_millis(30)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// Sum of the durations of all successful invocations
    pub total_duration: Duration,
    /// Slowest successful invocation, `None` until one is recorded
    pub max_response: Option<Duration>,
    /// Fastest successful invocation, `None` until one is recorded
    pub min_response: Option<Duration>,
    /// Number of failed invocations
    pub num_errors: usize,
    /// Number of successful invocations
    pub num_requests: usize,
    /// Number of workers that contributed to this metric
    pub num_routines: usize,
}

impl Metric {
    /// An empty metric with no contributing workers. This is the identity of
    /// [`merge`](Self::merge).
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty metric owned by a single worker.
    pub fn for_worker() -> Self {
        Self {
            num_routines: 1,
            ..Self::default()
        }
    }

    /// Record one successful invocation that took `elapsed`.
    pub fn record_success(&mut self, elapsed: Duration) {
        self.total_duration += elapsed;
        self.num_requests += 1;
        self.max_response = Some(self.max_response.map_or(elapsed, |max| max.max(elapsed)));
        self.min_response = Some(self.min_response.map_or(elapsed, |min| min.min(elapsed)));
    }

    /// Record one failed invocation.
    pub fn record_error(&mut self) {
        self.num_errors += 1;
    }

    /// Fold another metric into this one.
    pub fn merge(&mut self, other: Self) {
        self.total_duration += other.total_duration;
        self.num_errors += other.num_errors;
        self.num_requests += other.num_requests;
        self.num_routines += other.num_routines;
        // None < Some(_), so the plain Option ordering works for the maximum
        self.max_response = self.max_response.max(other.max_response);
        self.min_response = match (self.min_response, other.min_response) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (only, None) | (None, only) => only,
        };
    }

    /// Successful plus failed invocations.
    pub fn total_attempts(&self) -> usize {
        self.num_requests + self.num_errors
    }

    /// Busy time per routine, in seconds.
    pub fn average_duration_secs(&self) -> Option<f64> {
        if self.num_routines == 0 {
            return None;
        }
        Some(self.total_duration.as_secs_f64() / self.num_routines as f64)
    }

    /// Successful requests per second of per-routine busy time.
    pub fn average_request_rate(&self) -> Option<f64> {
        if self.num_requests == 0 {
            return None;
        }
        let secs = self.average_duration_secs()?;
        if secs > 0.0 {
            Some(self.num_requests as f64 / secs)
        } else {
            None
        }
    }

    /// Mean duration of a successful request, in seconds.
    pub fn average_request_time(&self) -> Option<f64> {
        if self.num_requests == 0 {
            return None;
        }
        Some(self.total_duration.as_secs_f64() / self.num_requests as f64)
    }

    /// Fraction of attempts that failed, in `0.0..=1.0`.
    pub fn error_rate(&self) -> Option<f64> {
        match self.total_attempts() {
            0 => None,
            attempts => Some(self.num_errors as f64 / attempts as f64),
        }
    }
}

impl FromIterator<Metric> for Metric {
    fn from_iter<I: IntoIterator<Item = Metric>>(iter: I) -> Self {
        iter.into_iter().fold(Metric::new(), |mut acc, m| {
            acc.merge(m);
            acc
        })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        BasicReport::from(*self).fmt(f)
    }
}
