//! Pipeline Configuration

use diagnostic_engine::DiagnosticConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AnalysisError;

/// Configuration for one analysis request, passed explicitly rather than
/// read from globals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Calculator thresholds
    pub diagnostics: DiagnosticConfig,
}

impl AnalysisConfig {
    /// Load overrides from a config file, defaults filling anything absent
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
