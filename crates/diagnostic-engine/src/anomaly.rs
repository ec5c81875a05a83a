//! Anomaly Detector
//!
//! Scans every recognized numeric channel for readings outside the
//! channel's plausible physical range, and for jumps between consecutive
//! samples faster than the channel's slew limit. One event per offense,
//! with the offending timestamp.

use obd_channels::Channel;
use signal_normalizer::Series;
use tracing::{debug, warn};

use crate::config::AnomalyConfig;
use crate::result::{AnomalyEvent, AnomalyKind, AnomalyScan, MetricKind, MetricResult, MetricValue};
use crate::statistics::round_to;

/// Scan the full series for implausible readings and jumps.
pub fn analyze(series: &Series, config: &AnomalyConfig) -> MetricResult {
    let kind = MetricKind::Anomaly;

    let channels: Vec<Channel> = series
        .coverage()
        .keys()
        .copied()
        .filter(|ch| !ch.is_timestamp())
        .collect();

    let mut events = Vec::new();
    for &channel in &channels {
        scan_channel(series, channel, config, &mut events);
    }

    // Channel scans run independently; order the merged list by time so
    // identical inputs always serialize identically
    events.sort_by(|a, b| {
        a.timestamp_s
            .total_cmp(&b.timestamp_s)
            .then_with(|| a.channel.name().cmp(b.channel.name()))
    });

    let detected = events.len();
    let truncated = detected > config.max_events;
    let mut warnings = Vec::new();
    if truncated {
        warn!(detected, cap = config.max_events, "anomaly list truncated");
        warnings.push(format!(
            "anomaly list truncated to {} events ({} detected)",
            config.max_events, detected
        ));
        events.truncate(config.max_events);
    }

    debug!(
        channels = channels.len(),
        events = events.len(),
        "anomaly scan complete"
    );

    MetricResult {
        kind,
        valid: true,
        warnings,
        value: MetricValue::Anomalies(AnomalyScan {
            events,
            channels_scanned: channels.len(),
            truncated,
        }),
    }
}

fn scan_channel(
    series: &Series,
    channel: Channel,
    config: &AnomalyConfig,
    events: &mut Vec<AnomalyEvent>,
) {
    let points = series.channel_points(channel);

    if let Some((min, max)) = channel.plausible_range() {
        for &(t, v) in &points {
            if v < min || v > max {
                events.push(AnomalyEvent {
                    timestamp_s: t,
                    channel,
                    value: v,
                    kind: AnomalyKind::OutOfRange { min, max },
                });
            }
        }
    }

    if let Some(limit) = channel.slew_limit_per_s() {
        let limit = limit * config.slew_scale;
        for w in points.windows(2) {
            let dt = w[1].0 - w[0].0;
            if dt <= 0.0 {
                continue;
            }
            let rate = (w[1].1 - w[0].1).abs() / dt;
            if rate > limit {
                events.push(AnomalyEvent {
                    timestamp_s: w[1].0,
                    channel,
                    value: w[1].1,
                    kind: AnomalyKind::RateJump {
                        rate_per_s: round_to(rate, 2),
                        limit_per_s: limit,
                    },
                });
            }
        }
    }
}
