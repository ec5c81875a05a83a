//! Windowed Signal Statistics

/// Summary statistics for one signal window
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalStats {
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Number of crossings of the mean (switching activity)
    pub mean_crossings: usize,
    /// Sample count
    pub count: usize,
}

impl SignalStats {
    /// Compute statistics over a slice of readings
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        let mut m2 = 0.0;
        for &v in values {
            let d = v - mean;
            m2 += d * d;
        }
        let std_dev = (m2 / n).sqrt();

        let mut mean_crossings = 0;
        for w in values.windows(2) {
            let prev = w[0] - mean;
            let curr = w[1] - mean;
            if prev.signum() != curr.signum() && prev != 0.0 && curr != 0.0 {
                mean_crossings += 1;
            }
        }

        Self {
            mean,
            std_dev,
            min,
            max,
            mean_crossings,
            count: values.len(),
        }
    }

    /// Peak-to-peak amplitude of the window
    pub fn range(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max - self.min
        }
    }
}

/// Round to a fixed number of decimals so equal inputs print identically
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean() {
        let stats = SignalStats::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((stats.mean - 3.0).abs() < 1e-9);
        assert_eq!(stats.count, 5);
    }

    #[test]
    fn test_std_dev() {
        let stats = SignalStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.std_dev - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_range() {
        let stats = SignalStats::compute(&[0.1, 0.9, 0.2, 0.8]);
        assert!((stats.range() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_mean_crossings_counts_switching() {
        // Oscillates around a mean of 5
        let stats = SignalStats::compute(&[3.0, 7.0, 4.0, 8.0, 2.0, 6.0]);
        assert!(stats.mean_crossings >= 2);
    }

    #[test]
    fn test_empty_window() {
        let stats = SignalStats::compute(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.range(), 0.0);
        assert_eq!(stats.count, 0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(14.6789, 2), 14.68);
        assert_eq!(round_to(0.123456, 3), 0.123);
    }

    proptest! {
        #[test]
        fn prop_stats_within_bounds(values in proptest::collection::vec(-1000.0f64..1000.0, 1..200)) {
            let stats = SignalStats::compute(&values);
            prop_assert!(stats.min <= stats.mean + 1e-9);
            prop_assert!(stats.mean <= stats.max + 1e-9);
            prop_assert!(stats.std_dev >= 0.0);
            prop_assert!(stats.std_dev <= stats.range() + 1e-9);
        }
    }
}
