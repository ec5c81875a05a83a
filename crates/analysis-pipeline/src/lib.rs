//! Analysis Pipeline
//!
//! End-to-end orchestration of one analysis request: bytes → records →
//! series → metrics → report. Parsing and normalization are sequential;
//! the calculators fan out over the immutable series and join before
//! aggregation. The caller either gets a complete report (individual
//! metrics possibly invalid) or a single fatal error, never a mix.

mod config;
mod error;
mod pipeline;

pub use self::config::AnalysisConfig;
pub use error::AnalysisError;
pub use pipeline::{analyze, analyze_with_timeout};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging for embedding binaries
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
