//! Error taxonomy for the pipeline.

use thiserror::Error;

/// Failures that abort the pipeline. None of them are recovered from.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source could not be fetched, read or parsed.
    #[error("data unavailable from {location}: {reason}")]
    DataUnavailable { location: String, reason: String },
    /// A source is readable but lacks a column the pipeline needs.
    #[error("{location} is missing expected column `{column}`")]
    SchemaMismatch { location: String, column: String },
    /// The page server could not bind or start.
    #[error("failed to start page server on {addr}")]
    RenderStartup {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn unavailable(location: &str, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }
}
