//! Calculator Configuration

use serde::{Deserialize, Serialize};

/// Steady-state window selection for the catalyst calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalystConfig {
    /// Minimum O2 samples inside the qualifying window
    pub min_window_samples: usize,
    /// Coolant temperature for "engine at operating temperature" (°C)
    pub operating_coolant_min_c: f64,
    /// RPM band considered cruising
    pub cruise_rpm_range: (f64, f64),
}

impl Default for CatalystConfig {
    fn default() -> Self {
        Self {
            min_window_samples: 10,
            operating_coolant_min_c: 75.0,
            cruise_rpm_range: (1200.0, 3200.0),
        }
    }
}

/// Fuel trim thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelTrimConfig {
    /// Minimum trim samples per bank
    pub min_samples: usize,
    /// Total trim beyond this deviation from zero flags a mixture problem (%)
    pub deviation_threshold_pct: f64,
    /// STFT standard deviation beyond this flags instability (%)
    pub instability_stddev_pct: f64,
}

impl Default for FuelTrimConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            deviation_threshold_pct: 10.0,
            instability_stddev_pct: 3.0,
        }
    }
}

/// Upstream O2 response thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct O2SensorConfig {
    /// Minimum upstream samples
    pub min_samples: usize,
    /// Voltage range below this marks the sensor lazy (V)
    pub lazy_range_v: f64,
    /// Voltage range below this marks the response marginal (V)
    pub marginal_range_v: f64,
    /// Mean voltage below this reads stuck lean (V)
    pub lean_mean_v: f64,
    /// Mean voltage above this reads stuck rich (V)
    pub rich_mean_v: f64,
}

impl Default for O2SensorConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            lazy_range_v: 0.5,
            marginal_range_v: 0.6,
            lean_mean_v: 0.3,
            rich_mean_v: 0.7,
        }
    }
}

/// Anomaly scan limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Multiplier on the per-channel slew limits
    pub slew_scale: f64,
    /// Cap on reported events; exceeding it is warned, never silent
    pub max_events: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            slew_scale: 1.0,
            max_events: 200,
        }
    }
}

/// Configuration for all calculators, passed explicitly per analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticConfig {
    pub catalyst: CatalystConfig,
    pub fuel_trim: FuelTrimConfig,
    pub o2_sensor: O2SensorConfig,
    pub anomaly: AnomalyConfig,
}

impl DiagnosticConfig {
    /// More sensitive flagging (lower thresholds)
    pub fn strict() -> Self {
        Self {
            fuel_trim: FuelTrimConfig {
                deviation_threshold_pct: 5.0,
                ..Default::default()
            },
            anomaly: AnomalyConfig {
                slew_scale: 0.5,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Fewer flags on noisy logs (higher thresholds)
    pub fn lenient() -> Self {
        Self {
            fuel_trim: FuelTrimConfig {
                deviation_threshold_pct: 15.0,
                ..Default::default()
            },
            anomaly: AnomalyConfig {
                slew_scale: 2.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DiagnosticConfig::default();
        assert_eq!(config.catalyst.min_window_samples, 10);
        assert_eq!(config.fuel_trim.deviation_threshold_pct, 10.0);
        assert_eq!(config.anomaly.slew_scale, 1.0);
    }

    #[test]
    fn test_presets() {
        assert!(
            DiagnosticConfig::strict().fuel_trim.deviation_threshold_pct
                < DiagnosticConfig::lenient().fuel_trim.deviation_threshold_pct
        );
        assert!(DiagnosticConfig::strict().anomaly.slew_scale < 1.0);
    }
}
