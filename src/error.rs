use thiserror::Error;

/// Errors surfaced by executors and reporters.
///
/// Failures of the task under test are never turned into an `Error`; they are
/// counted in [`crate::Metric::num_errors`] instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Writing a report to its sink failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a report failed
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
