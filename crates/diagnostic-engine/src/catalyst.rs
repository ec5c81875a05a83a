//! Catalyst Efficiency Calculator
//!
//! A healthy three-way catalyst stores oxygen: the upstream O2 sensor
//! switches rich/lean continuously while the downstream sensor stays
//! flat. Efficiency is graded from the amplitude ratio of the two traces
//! over a steady-state driving window.

use obd_channels::Channel;
use signal_normalizer::{Sample, Series};
use tracing::debug;

use crate::config::CatalystConfig;
use crate::result::{CatalystEfficiency, HealthStatus, MetricKind, MetricResult, MetricValue};
use crate::statistics::{round_to, SignalStats};

/// Upstream swing below this is a frozen or disconnected sensor (V)
const FROZEN_RANGE_V: f64 = 1e-3;

/// Analyze catalyst efficiency over the steady-state window.
pub fn analyze(series: &Series, config: &CatalystConfig) -> MetricResult {
    let kind = MetricKind::CatalystEfficiency;

    if !series.has_channel(Channel::O2UpstreamVoltage) {
        return MetricResult::invalid(kind, "upstream O2 sensor channel missing");
    }
    if !series.has_channel(Channel::O2DownstreamVoltage) {
        return MetricResult::invalid(kind, "downstream O2 sensor channel missing");
    }

    let gate_coolant = series.has_channel(Channel::CoolantTemp);
    let gate_rpm = series.has_channel(Channel::EngineRpm);

    let mut upstream = Vec::new();
    let mut downstream = Vec::new();
    let mut window_samples = 0usize;

    for sample in series.samples() {
        if !qualifies(sample, config, gate_coolant, gate_rpm) {
            continue;
        }
        window_samples += 1;
        if let Some(v) = sample.value(Channel::O2UpstreamVoltage) {
            upstream.push(v);
        }
        if let Some(v) = sample.value(Channel::O2DownstreamVoltage) {
            downstream.push(v);
        }
    }

    debug!(
        window_samples,
        upstream = upstream.len(),
        downstream = downstream.len(),
        "catalyst window selected"
    );

    let need = config.min_window_samples;
    if upstream.len() < need || downstream.len() < need {
        return MetricResult::invalid(
            kind,
            format!(
                "insufficient steady-state O2 samples (upstream {}, downstream {}, need {})",
                upstream.len(),
                downstream.len(),
                need
            ),
        );
    }

    let up = SignalStats::compute(&upstream);
    let down = SignalStats::compute(&downstream);

    if up.range() < FROZEN_RANGE_V {
        return MetricResult::invalid(
            kind,
            format!(
                "upstream O2 trace frozen at {:.3} V, catalyst comparison impossible",
                up.mean
            ),
        );
    }

    // Flat downstream against an active upstream means full oxygen
    // storage; the ratio has no finite value there.
    let activity_ratio = if down.range() >= FROZEN_RANGE_V {
        Some(up.range() / down.range())
    } else {
        None
    };
    let efficiency = (1.0 - down.std_dev / up.std_dev).clamp(0.0, 1.0);

    let mut warnings = Vec::new();
    let (status, score) = match activity_ratio {
        None => (HealthStatus::Excellent, 100),
        Some(r) if r >= 2.5 => (HealthStatus::Excellent, 100),
        Some(r) if r >= 1.5 => (HealthStatus::Good, 85),
        Some(r) if r >= 1.0 => {
            warnings.push(format!(
                "catalyst efficiency marginal (activity ratio {:.2})",
                r
            ));
            (HealthStatus::Marginal, 65)
        }
        Some(r) => {
            warnings.push(format!(
                "catalyst efficiency degraded (activity ratio {:.2})",
                r
            ));
            (HealthStatus::Poor, 40)
        }
    };

    MetricResult {
        kind,
        valid: true,
        warnings,
        value: MetricValue::CatalystEfficiency(CatalystEfficiency {
            efficiency: round_to(efficiency, 3),
            activity_ratio: activity_ratio.map(|r| round_to(r, 2)),
            status,
            score,
            upstream_mean_v: round_to(up.mean, 3),
            downstream_mean_v: round_to(down.mean, 3),
            window_samples,
        }),
    }
}

/// A sample is steady state when the engine is warm and the RPM sits in
/// the cruising band; each gate applies only when its channel was logged.
fn qualifies(sample: &Sample, config: &CatalystConfig, gate_coolant: bool, gate_rpm: bool) -> bool {
    if gate_coolant {
        match sample.value(Channel::CoolantTemp) {
            Some(t) if t >= config.operating_coolant_min_c => {}
            _ => return false,
        }
    }
    if gate_rpm {
        let (lo, hi) = config.cruise_rpm_range;
        match sample.value(Channel::EngineRpm) {
            Some(rpm) if rpm >= lo && rpm <= hi => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_parser::LogParser;
    use signal_normalizer::SignalNormalizer;

    fn series_from(data: &str) -> Series {
        let log = LogParser::new().parse(data.as_bytes()).unwrap();
        SignalNormalizer::new().normalize(&log).unwrap().series
    }

    /// Warm cruise with a switching upstream trace and the given
    /// downstream amplitude around 0.45 V
    fn cruise_log(downstream_swing: f64) -> String {
        let mut data = String::from(
            "Device Time,Engine RPM(rpm),Engine Coolant Temperature(\u{b0}C),\
             O2 Bank 1 Sensor 1 Voltage(V),O2 Bank 1 Sensor 2 Voltage(V)\n",
        );
        for i in 0..40 {
            let up = if i % 2 == 0 { 0.1 } else { 0.9 };
            let down = 0.45 + if i % 2 == 0 { -downstream_swing / 2.0 } else { downstream_swing / 2.0 };
            data.push_str(&format!("{i},2000,88,{up},{down:.4}\n"));
        }
        data
    }

    #[test]
    fn test_healthy_catalyst() {
        let series = series_from(&cruise_log(0.05));
        let result = analyze(&series, &CatalystConfig::default());

        assert!(result.valid);
        let MetricValue::CatalystEfficiency(cat) = &result.value else {
            panic!("wrong payload");
        };
        assert_eq!(cat.status, HealthStatus::Excellent);
        assert!(cat.efficiency > 0.9);
        assert!(cat.activity_ratio.unwrap() > 10.0);
    }

    #[test]
    fn test_degraded_catalyst_mirrors_upstream() {
        // Downstream swings nearly as much as upstream
        let series = series_from(&cruise_log(0.75));
        let result = analyze(&series, &CatalystConfig::default());

        assert!(result.valid);
        let MetricValue::CatalystEfficiency(cat) = &result.value else {
            panic!("wrong payload");
        };
        assert_eq!(cat.status, HealthStatus::Marginal);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_flat_downstream_is_excellent() {
        let series = series_from(&cruise_log(0.0));
        let result = analyze(&series, &CatalystConfig::default());

        let MetricValue::CatalystEfficiency(cat) = &result.value else {
            panic!("wrong payload");
        };
        assert_eq!(cat.status, HealthStatus::Excellent);
        assert!(cat.activity_ratio.is_none());
        assert_eq!(cat.efficiency, 1.0);
    }

    #[test]
    fn test_missing_downstream_channel_invalid() {
        let mut data = String::from(
            "Device Time,Engine RPM(rpm),O2 Bank 1 Sensor 1 Voltage(V)\n",
        );
        for i in 0..20 {
            data.push_str(&format!("{i},2000,0.5\n"));
        }
        let series = series_from(&data);
        let result = analyze(&series, &CatalystConfig::default());

        assert!(!result.valid);
        assert!(result.warnings[0].contains("downstream"));
        assert!(matches!(result.value, MetricValue::Unavailable));
    }

    #[test]
    fn test_cold_engine_never_qualifies() {
        let mut data = String::from(
            "Device Time,Engine RPM(rpm),Engine Coolant Temperature(\u{b0}C),\
             O2 Bank 1 Sensor 1 Voltage(V),O2 Bank 1 Sensor 2 Voltage(V)\n",
        );
        for i in 0..40 {
            data.push_str(&format!("{i},2000,40,0.5,0.45\n"));
        }
        let series = series_from(&data);
        let result = analyze(&series, &CatalystConfig::default());

        assert!(!result.valid);
        assert!(result.warnings[0].contains("insufficient steady-state"));
    }

    #[test]
    fn test_frozen_upstream_invalid() {
        let mut data = String::from(
            "Device Time,Engine RPM(rpm),Engine Coolant Temperature(\u{b0}C),\
             O2 Bank 1 Sensor 1 Voltage(V),O2 Bank 1 Sensor 2 Voltage(V)\n",
        );
        for i in 0..40 {
            data.push_str(&format!("{i},2000,88,0.5,0.45\n"));
        }
        let series = series_from(&data);
        let result = analyze(&series, &CatalystConfig::default());

        assert!(!result.valid);
        assert!(result.warnings[0].contains("frozen"));
    }
}
