//! Series Data Model

use obd_channels::Channel;
use serde::Serialize;
use std::collections::BTreeMap;

/// One timestamped reading across all recognized channels.
///
/// `None` is the explicit missing marker: the column existed but this row
/// carried no usable value for it.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Seconds since the start of the log, non-decreasing across a Series
    pub timestamp_s: f64,
    /// Value per recognized channel
    pub values: BTreeMap<Channel, Option<f64>>,
}

impl Sample {
    /// Reading for a channel, flattening the missing marker
    pub fn value(&self, channel: Channel) -> Option<f64> {
        self.values.get(&channel).copied().flatten()
    }
}

/// Per-channel data quality counters accumulated during normalization
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ChannelCoverage {
    /// Rows inspected for this channel
    pub total_rows: usize,
    /// Cells that yielded a usable reading
    pub valid: usize,
    /// Cells that were empty, a missing marker, or unparseable
    pub missing: usize,
    /// Cells matching a known adapter error sentinel
    pub error_values: usize,
}

impl ChannelCoverage {
    /// Share of rows with a usable reading, in percent
    pub fn valid_rate(&self) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        self.valid as f64 / self.total_rows as f64 * 100.0
    }
}

/// An immutable, time-ordered sequence of samples for one log.
///
/// Built once by the normalizer and then only read, so the calculator
/// stage can share it across tasks without synchronization.
#[derive(Debug)]
pub struct Series {
    samples: Vec<Sample>,
    coverage: BTreeMap<Channel, ChannelCoverage>,
    duration_s: f64,
}

impl Series {
    pub(crate) fn new(samples: Vec<Sample>, coverage: BTreeMap<Channel, ChannelCoverage>) -> Self {
        let duration_s = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => last.timestamp_s - first.timestamp_s,
            _ => 0.0,
        };
        Self {
            samples,
            coverage,
            duration_s,
        }
    }

    /// All samples in time order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Seconds between the first and last sample
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// Whether any sample carries a usable reading for the channel
    pub fn has_channel(&self, channel: Channel) -> bool {
        self.coverage
            .get(&channel)
            .map(|c| c.valid > 0)
            .unwrap_or(false)
    }

    /// Usable readings for a channel, in time order
    pub fn channel_values(&self, channel: Channel) -> Vec<f64> {
        self.samples
            .iter()
            .filter_map(|s| s.value(channel))
            .collect()
    }

    /// (timestamp, reading) pairs for a channel, in time order
    pub fn channel_points(&self, channel: Channel) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(|s| s.value(channel).map(|v| (s.timestamp_s, v)))
            .collect()
    }

    /// Coverage counters per recognized channel
    pub fn coverage(&self) -> &BTreeMap<Channel, ChannelCoverage> {
        &self.coverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64, rpm: Option<f64>) -> Sample {
        let mut values = BTreeMap::new();
        values.insert(Channel::EngineRpm, rpm);
        Sample {
            timestamp_s: t,
            values,
        }
    }

    #[test]
    fn test_channel_values_skip_missing() {
        let series = Series::new(
            vec![sample(0.0, Some(800.0)), sample(1.0, None), sample(2.0, Some(900.0))],
            BTreeMap::new(),
        );
        assert_eq!(series.channel_values(Channel::EngineRpm), vec![800.0, 900.0]);
        assert_eq!(
            series.channel_points(Channel::EngineRpm),
            vec![(0.0, 800.0), (2.0, 900.0)]
        );
    }

    #[test]
    fn test_duration() {
        let series = Series::new(vec![sample(0.0, None), sample(12.5, None)], BTreeMap::new());
        assert_eq!(series.duration_s(), 12.5);
        assert_eq!(Series::new(Vec::new(), BTreeMap::new()).duration_s(), 0.0);
    }

    #[test]
    fn test_valid_rate() {
        let coverage = ChannelCoverage {
            total_rows: 10,
            valid: 7,
            missing: 2,
            error_values: 1,
        };
        assert!((coverage.valid_rate() - 70.0).abs() < 1e-9);
        assert_eq!(ChannelCoverage::default().valid_rate(), 0.0);
    }
}
