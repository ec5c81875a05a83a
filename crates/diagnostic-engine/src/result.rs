//! Calculator Result Types

use obd_channels::Channel;
use serde::Serialize;

/// Which calculator produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    CatalystEfficiency,
    FuelTrim,
    O2Sensor,
    Anomaly,
}

/// Coarse health grading, worst variant last
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Marginal,
    Poor,
}

/// Output of one calculator
#[derive(Debug, Clone, Serialize)]
pub struct MetricResult {
    /// Producer tag
    pub kind: MetricKind,
    /// Whether `value` carries a usable measurement
    pub valid: bool,
    /// Human-readable findings and degradation reasons
    pub warnings: Vec<String>,
    /// Structured payload; null when the calculator could not run
    pub value: MetricValue,
}

impl MetricResult {
    /// A calculator that could not produce a measurement
    pub fn invalid(kind: MetricKind, warning: impl Into<String>) -> Self {
        Self {
            kind,
            valid: false,
            warnings: vec![warning.into()],
            value: MetricValue::Unavailable,
        }
    }
}

/// Structured calculator payloads
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// No measurement; serializes as null
    Unavailable,
    CatalystEfficiency(CatalystEfficiency),
    FuelTrim(FuelTrimSummary),
    O2Sensor(O2SensorHealth),
    Anomalies(AnomalyScan),
}

/// Catalyst oxygen storage measurement
#[derive(Debug, Clone, Serialize)]
pub struct CatalystEfficiency {
    /// Normalized efficiency in [0, 1]
    pub efficiency: f64,
    /// Upstream/downstream voltage swing ratio; absent when the
    /// downstream trace is flat (nothing passes the catalyst)
    pub activity_ratio: Option<f64>,
    pub status: HealthStatus,
    pub score: u8,
    /// Mean voltages over the steady-state window
    pub upstream_mean_v: f64,
    pub downstream_mean_v: f64,
    /// Samples in the qualifying window
    pub window_samples: usize,
}

/// Mean and spread of one trim signal
#[derive(Debug, Clone, Serialize)]
pub struct TrimStats {
    pub mean_pct: f64,
    pub std_dev_pct: f64,
    pub samples: usize,
}

/// Fuel trim findings for one bank
#[derive(Debug, Clone, Serialize)]
pub struct FuelTrimBank {
    pub bank: u8,
    pub short_term: Option<TrimStats>,
    pub long_term: Option<TrimStats>,
    /// |mean STFT| + |mean LTFT|
    pub total_trim_pct: f64,
    /// Total trim beyond the configured deviation threshold
    pub mixture_problem: bool,
    /// STFT spread beyond the instability threshold
    pub unstable: bool,
}

/// Fuel trim findings across banks
#[derive(Debug, Clone, Serialize)]
pub struct FuelTrimSummary {
    pub banks: Vec<FuelTrimBank>,
    pub status: HealthStatus,
    pub score: u8,
}

/// Upstream O2 sensor response quality
#[derive(Debug, Clone, Serialize)]
pub struct O2SensorHealth {
    pub mean_voltage_v: f64,
    pub voltage_range_v: f64,
    /// Crossings of the mean voltage (switching activity)
    pub switches: usize,
    pub status: HealthStatus,
    pub score: u8,
}

/// One detected anomaly
#[derive(Debug, Clone, Serialize)]
pub struct AnomalyEvent {
    /// Seconds from log start
    pub timestamp_s: f64,
    pub channel: Channel,
    /// Offending reading
    pub value: f64,
    #[serde(flatten)]
    pub kind: AnomalyKind,
}

/// What made a reading anomalous
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Outside the channel's plausible physical range
    OutOfRange { min: f64, max: f64 },
    /// Jumped faster than the channel's slew limit
    RateJump { rate_per_s: f64, limit_per_s: f64 },
}

/// Full-series anomaly scan output
#[derive(Debug, Clone, Serialize)]
pub struct AnomalyScan {
    pub events: Vec<AnomalyEvent>,
    pub channels_scanned: usize,
    /// Whether the event list hit the configured cap
    pub truncated: bool,
}
