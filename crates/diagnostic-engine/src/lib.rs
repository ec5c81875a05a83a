//! Diagnostic Engine
//!
//! The metric calculators. Each is a pure function over an immutable
//! `Series` plus its own config; none reads another's output, so the
//! caller may run them in any order or in parallel. A calculator that
//! cannot produce a number reports `valid = false` with a reason instead
//! of failing the request.

pub mod anomaly;
pub mod catalyst;
pub mod fuel_trim;
pub mod o2_sensor;

mod config;
mod result;
mod statistics;

pub use config::{
    AnomalyConfig, CatalystConfig, DiagnosticConfig, FuelTrimConfig, O2SensorConfig,
};
pub use result::{
    AnomalyEvent, AnomalyKind, AnomalyScan, CatalystEfficiency, FuelTrimBank, FuelTrimSummary,
    HealthStatus, MetricKind, MetricResult, MetricValue, O2SensorHealth, TrimStats,
};
pub use statistics::SignalStats;
