//! O2 Sensor Health Calculator
//!
//! A narrow-band upstream sensor in closed loop swings between roughly
//! 0.1 V and 0.9 V. A compressed range means a lazy sensor; a mean stuck
//! near either rail means it reads lean or rich.

use obd_channels::Channel;
use signal_normalizer::Series;

use crate::config::O2SensorConfig;
use crate::result::{HealthStatus, MetricKind, MetricResult, MetricValue, O2SensorHealth};
use crate::statistics::{round_to, SignalStats};

/// Analyze upstream O2 sensor response quality.
pub fn analyze(series: &Series, config: &O2SensorConfig) -> MetricResult {
    let kind = MetricKind::O2Sensor;

    let values = series.channel_values(Channel::O2UpstreamVoltage);
    if values.len() < config.min_samples {
        return MetricResult::invalid(
            kind,
            format!(
                "insufficient upstream O2 samples ({}, need {})",
                values.len(),
                config.min_samples
            ),
        );
    }

    let stats = SignalStats::compute(&values);
    let range = stats.range();

    let mut warnings = Vec::new();
    let (status, score) = if range < config.lazy_range_v {
        warnings.push(format!(
            "O2 sensor lazy (range {:.2} V, expected > {:.1} V)",
            range, config.marginal_range_v
        ));
        (HealthStatus::Poor, 60)
    } else if range < config.marginal_range_v {
        warnings.push(format!("O2 sensor response marginal (range {:.2} V)", range));
        (HealthStatus::Marginal, 80)
    } else {
        (HealthStatus::Excellent, 100)
    };

    if stats.mean < config.lean_mean_v {
        warnings.push(format!("O2 sensor reading lean (avg {:.3} V)", stats.mean));
    } else if stats.mean > config.rich_mean_v {
        warnings.push(format!("O2 sensor reading rich (avg {:.3} V)", stats.mean));
    }

    MetricResult {
        kind,
        valid: true,
        warnings,
        value: MetricValue::O2Sensor(O2SensorHealth {
            mean_voltage_v: round_to(stats.mean, 3),
            voltage_range_v: round_to(range, 3),
            switches: stats.mean_crossings,
            status,
            score,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_parser::LogParser;
    use signal_normalizer::SignalNormalizer;

    fn series_with_o2(voltages: &[f64]) -> Series {
        let mut data =
            String::from("Device Time,Engine RPM(rpm),O2 Bank 1 Sensor 1 Voltage(V)\n");
        for (i, v) in voltages.iter().enumerate() {
            data.push_str(&format!("{i},2000,{v}\n"));
        }
        let log = LogParser::new().parse(data.as_bytes()).unwrap();
        SignalNormalizer::new().normalize(&log).unwrap().series
    }

    #[test]
    fn test_switching_sensor_excellent() {
        let voltages: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 0.1 } else { 0.9 }).collect();
        let result = analyze(&series_with_o2(&voltages), &O2SensorConfig::default());

        assert!(result.valid);
        assert!(result.warnings.is_empty());
        let MetricValue::O2Sensor(o2) = &result.value else {
            panic!("wrong payload");
        };
        assert_eq!(o2.status, HealthStatus::Excellent);
        assert!(o2.switches >= 20);
    }

    #[test]
    fn test_lazy_sensor_flagged() {
        let voltages: Vec<f64> = (0..30).map(|i| 0.45 + 0.1 * ((i % 2) as f64)).collect();
        let result = analyze(&series_with_o2(&voltages), &O2SensorConfig::default());

        let MetricValue::O2Sensor(o2) = &result.value else {
            panic!("wrong payload");
        };
        assert_eq!(o2.status, HealthStatus::Poor);
        assert!(result.warnings.iter().any(|w| w.contains("lazy")));
    }

    #[test]
    fn test_stuck_lean_flagged() {
        let voltages = vec![0.1; 30];
        let result = analyze(&series_with_o2(&voltages), &O2SensorConfig::default());

        assert!(result.warnings.iter().any(|w| w.contains("lean")));
    }

    #[test]
    fn test_insufficient_samples_invalid() {
        let result = analyze(&series_with_o2(&[0.5, 0.6]), &O2SensorConfig::default());
        assert!(!result.valid);
        assert!(result.warnings[0].contains("insufficient upstream O2 samples"));
    }
}
