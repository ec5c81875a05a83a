//! Analysis Report Assembly

use diagnostic_engine::{AnomalyEvent, MetricKind, MetricResult, MetricValue};
use obd_channels::{Channel, HeaderMapping};
use serde::Serialize;
use signal_normalizer::Series;
use std::collections::BTreeMap;

/// Terminal state of an analysis request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Analyzed,
    Failed,
}

/// Per-channel data quality, rounded for the boundary
#[derive(Debug, Clone, Serialize)]
pub struct CoverageEntry {
    pub total_rows: usize,
    pub valid: usize,
    pub missing: usize,
    pub error_values: usize,
    pub valid_rate_pct: f64,
}

/// Log-level metadata carried alongside the results
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Samples after normalization and duplicate merging
    pub sample_count: usize,
    /// Seconds between first and last sample
    pub duration_s: f64,
    /// Channels the header mapping recognized
    pub recognized_channels: usize,
    /// Headers no channel claims, passed through untouched
    pub unmapped_columns: Vec<String>,
    /// Data quality per recognized channel
    pub channel_coverage: BTreeMap<Channel, CoverageEntry>,
}

/// Calculator outputs in the boundary shape
#[derive(Debug, Clone, Serialize)]
pub struct ReportResults {
    pub catalyst_efficiency: MetricResult,
    pub fuel_trims: MetricResult,
    pub o2_sensors: MetricResult,
    pub anomalies: Vec<AnomalyEvent>,
}

/// The one artifact a successful analysis returns
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub filename: String,
    pub status: AnalysisStatus,
    pub results: ReportResults,
    pub metadata: ReportMetadata,
    /// Parse/normalization/calculator warnings, in pipeline order
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    /// Assemble the report from the series, the header mapping, the
    /// calculator outputs and the warnings gathered upstream.
    ///
    /// Total over its inputs: a calculator that produced nothing is
    /// represented as invalid rather than failing the report.
    pub fn assemble(
        filename: &str,
        series: &Series,
        mapping: &HeaderMapping,
        metrics: Vec<MetricResult>,
        mut warnings: Vec<String>,
    ) -> Self {
        let mut catalyst = None;
        let mut fuel_trims = None;
        let mut o2_sensors = None;
        let mut anomalies = Vec::new();

        for metric in metrics {
            match metric.kind {
                MetricKind::CatalystEfficiency => catalyst = Some(metric),
                MetricKind::FuelTrim => fuel_trims = Some(metric),
                MetricKind::O2Sensor => o2_sensors = Some(metric),
                MetricKind::Anomaly => {
                    // The anomaly payload flattens into the boundary list;
                    // its warnings (truncation) join the shared pool
                    warnings.extend(metric.warnings);
                    if let MetricValue::Anomalies(scan) = metric.value {
                        anomalies = scan.events;
                    }
                }
            }
        }

        let results = ReportResults {
            catalyst_efficiency: catalyst
                .unwrap_or_else(|| missing(MetricKind::CatalystEfficiency)),
            fuel_trims: fuel_trims.unwrap_or_else(|| missing(MetricKind::FuelTrim)),
            o2_sensors: o2_sensors.unwrap_or_else(|| missing(MetricKind::O2Sensor)),
            anomalies,
        };

        let channel_coverage = series
            .coverage()
            .iter()
            .map(|(channel, cov)| {
                (
                    *channel,
                    CoverageEntry {
                        total_rows: cov.total_rows,
                        valid: cov.valid,
                        missing: cov.missing,
                        error_values: cov.error_values,
                        valid_rate_pct: (cov.valid_rate() * 100.0).round() / 100.0,
                    },
                )
            })
            .collect();

        Self {
            filename: filename.to_string(),
            status: AnalysisStatus::Analyzed,
            results,
            metadata: ReportMetadata {
                sample_count: series.len(),
                duration_s: series.duration_s(),
                recognized_channels: mapping.mapped.len(),
                unmapped_columns: mapping.unmapped.clone(),
                channel_coverage,
            },
            warnings,
        }
    }

    /// Serialize in the boundary shape
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn missing(kind: MetricKind) -> MetricResult {
    MetricResult::invalid(kind, "calculator produced no result")
}

/// What a fatal error looks like across the boundary
#[derive(Debug, Clone, Serialize)]
pub struct FailureDetail {
    /// Stable error kind tag, e.g. "parse_error"
    pub kind: String,
    pub message: String,
    /// HTTP-equivalent status for the gateway to surface
    pub http_status: u16,
}

/// The artifact a failed analysis returns; never mixed with results
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub filename: String,
    pub status: AnalysisStatus,
    pub error: FailureDetail,
}

impl FailureReport {
    pub fn new(filename: &str, kind: &str, message: String, http_status: u16) -> Self {
        Self {
            filename: filename.to_string(),
            status: AnalysisStatus::Failed,
            error: FailureDetail {
                kind: kind.to_string(),
                message,
                http_status,
            },
        }
    }

    /// Serialize in the boundary shape
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
