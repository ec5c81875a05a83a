//! Pipeline Error Taxonomy

use log_parser::ParseError;
use report_aggregator::FailureReport;
use signal_normalizer::NormalizationError;
use thiserror::Error;

/// Fatal analysis failures surfaced across the service boundary.
///
/// Calculator problems never appear here; they degrade to invalid
/// metrics inside the report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The byte stream could not be parsed as a CSV log
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    /// The log parsed but its time axis is unusable
    #[error("normalization failed: {0}")]
    Normalization(#[from] NormalizationError),

    /// The caller-supplied deadline elapsed; no partial results exist
    #[error("analysis timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// A calculator task died instead of returning
    #[error("internal failure: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Stable error kind tag for the boundary
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Parse(_) => "parse_error",
            AnalysisError::Normalization(_) => "normalization_error",
            AnalysisError::Timeout { .. } => "timeout",
            AnalysisError::Config(_) => "config_error",
            AnalysisError::Internal(_) => "internal_error",
        }
    }

    /// HTTP-equivalent status for the gateway to surface
    pub fn http_status(&self) -> u16 {
        match self {
            // Not CSV at all vs. CSV text that is structurally broken
            AnalysisError::Parse(ParseError::BinaryContent(_)) => 400,
            AnalysisError::Parse(_) => 422,
            AnalysisError::Normalization(_) => 422,
            AnalysisError::Timeout { .. } => 504,
            AnalysisError::Config(_) | AnalysisError::Internal(_) => 500,
        }
    }

    /// The failure artifact the gateway serializes instead of a report
    pub fn failure_report(&self, filename: &str) -> FailureReport {
        FailureReport::new(filename, self.kind(), self.to_string(), self.http_status())
    }
}
