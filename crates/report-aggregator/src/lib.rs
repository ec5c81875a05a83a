//! Report Aggregation
//!
//! Merges calculator outputs and pipeline warnings into the one artifact
//! that crosses the service boundary. Construction is pure: identical
//! inputs always serialize to byte-identical JSON.

mod report;

pub use report::{
    AnalysisReport, AnalysisStatus, CoverageEntry, FailureDetail, FailureReport, ReportMetadata,
    ReportResults,
};
