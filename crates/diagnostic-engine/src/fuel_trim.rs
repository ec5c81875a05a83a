//! Fuel Trim Calculator
//!
//! Long-running trim away from zero means the ECU is compensating for a
//! mixture problem (vacuum leak, MAF drift, fuel delivery); a noisy
//! short-term trim means it cannot settle.

use obd_channels::Channel;
use signal_normalizer::Series;
use tracing::debug;

use crate::config::FuelTrimConfig;
use crate::result::{
    FuelTrimBank, FuelTrimSummary, HealthStatus, MetricKind, MetricResult, MetricValue, TrimStats,
};
use crate::statistics::{round_to, SignalStats};

const BANKS: [(u8, Channel, Channel); 2] = [
    (1, Channel::StftBank1, Channel::LtftBank1),
    (2, Channel::StftBank2, Channel::LtftBank2),
];

/// Analyze short- and long-term fuel trims per bank.
pub fn analyze(series: &Series, config: &FuelTrimConfig) -> MetricResult {
    let kind = MetricKind::FuelTrim;

    let mut banks = Vec::new();
    let mut warnings = Vec::new();
    let mut worst = (HealthStatus::Excellent, 100u8);

    for (bank, stft_ch, ltft_ch) in BANKS {
        let stft = series.channel_values(stft_ch);
        let ltft = series.channel_values(ltft_ch);
        if stft.is_empty() && ltft.is_empty() {
            continue;
        }

        if stft.len() < config.min_samples && ltft.len() < config.min_samples {
            warnings.push(format!(
                "bank {bank}: insufficient fuel trim samples ({} STFT, {} LTFT, need {})",
                stft.len(),
                ltft.len(),
                config.min_samples
            ));
            continue;
        }

        let short_term = trim_stats(&stft, config.min_samples);
        let long_term = trim_stats(&ltft, config.min_samples);

        let stft_mean = short_term.as_ref().map(|t| t.mean_pct).unwrap_or(0.0);
        let ltft_mean = long_term.as_ref().map(|t| t.mean_pct).unwrap_or(0.0);
        let total_trim = stft_mean.abs() + ltft_mean.abs();

        let mixture_problem = total_trim > config.deviation_threshold_pct;
        if mixture_problem {
            warnings.push(format!(
                "bank {bank}: fuel trim at {:.1}% indicates a mixture problem \
                 (check for vacuum leaks or MAF issues)",
                total_trim
            ));
        }

        let stft_std = short_term.as_ref().map(|t| t.std_dev_pct).unwrap_or(0.0);
        let unstable = stft_std > config.instability_stddev_pct;
        if unstable {
            warnings.push(format!(
                "bank {bank}: fuel trim unstable (STFT stddev {:.1}%)",
                stft_std
            ));
        }

        let (mut status, mut score) = grade(total_trim);
        if unstable && score > 75 {
            status = HealthStatus::Marginal;
            score = 75;
        }
        worst.0 = worst.0.max(status);
        worst.1 = worst.1.min(score);

        debug!(bank, total_trim, unstable, "fuel trim bank analyzed");

        banks.push(FuelTrimBank {
            bank,
            short_term,
            long_term,
            total_trim_pct: round_to(total_trim, 2),
            mixture_problem,
            unstable,
        });
    }

    if banks.is_empty() {
        return MetricResult::invalid(kind, "insufficient fuel trim data");
    }

    MetricResult {
        kind,
        valid: true,
        warnings,
        value: MetricValue::FuelTrim(FuelTrimSummary {
            banks,
            status: worst.0,
            score: worst.1,
        }),
    }
}

fn trim_stats(values: &[f64], min_samples: usize) -> Option<TrimStats> {
    if values.len() < min_samples {
        return None;
    }
    let stats = SignalStats::compute(values);
    Some(TrimStats {
        mean_pct: round_to(stats.mean, 2),
        std_dev_pct: round_to(stats.std_dev, 2),
        samples: stats.count,
    })
}

/// Grading bands for combined trim deviation
fn grade(total_trim_pct: f64) -> (HealthStatus, u8) {
    if total_trim_pct > 15.0 {
        (HealthStatus::Poor, 50)
    } else if total_trim_pct > 10.0 {
        (HealthStatus::Marginal, 70)
    } else if total_trim_pct > 5.0 {
        (HealthStatus::Good, 85)
    } else {
        (HealthStatus::Excellent, 100)
    }
}
