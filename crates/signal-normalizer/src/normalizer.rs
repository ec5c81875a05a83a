//! Record Normalization

use log_parser::ParsedLog;
use obd_channels::{is_error_sentinel, Channel, DEVICE_ERROR_FLOOR};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{NormalizationError, NormalizeWarning};
use crate::sample::{ChannelCoverage, Sample, Series};
use crate::timestamp::parse_timestamp;

/// Outcome of coercing one cell
enum Cell {
    /// Usable reading
    Valid(f64),
    /// Known adapter error code; kept only when it could still be data
    Error(Option<f64>),
    /// Empty, a missing marker, or unparseable
    Missing,
}

/// Coerce one raw cell to a numeric reading.
///
/// Torque writes `-`, `N/A` or nothing for channels the adapter did not
/// answer; readings at or above the device error floor are "no reading"
/// codes. Sentinels below the floor (-1, 255, ...) are legitimate values
/// on some channels, so they stay in the data and are only counted.
fn coerce(raw: Option<&str>) -> Cell {
    let Some(raw) = raw else {
        return Cell::Missing;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed == "-"
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("na")
    {
        return Cell::Missing;
    }

    let Ok(value) = trimmed.parse::<f64>() else {
        return Cell::Missing;
    };
    if !value.is_finite() {
        return Cell::Missing;
    }

    if value >= DEVICE_ERROR_FLOOR {
        return Cell::Error(None);
    }
    if is_error_sentinel(value) {
        return Cell::Error(Some(value));
    }
    Cell::Valid(value)
}

/// A normalized log: the series plus what normalization had to repair
#[derive(Debug)]
pub struct NormalizedLog {
    /// The immutable time series
    pub series: Series,
    /// Recoverable conditions encountered on the way
    pub warnings: Vec<NormalizeWarning>,
}

/// Builds a `Series` from parsed records
pub struct SignalNormalizer;

impl SignalNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize parsed records onto a monotonic time axis.
    ///
    /// Fails only when the timestamp axis itself is unusable; every other
    /// problem degrades to a warning or a missing value.
    pub fn normalize(&self, log: &ParsedLog) -> Result<NormalizedLog, NormalizationError> {
        let (ts_channel, ts_index) = log
            .mapping
            .timestamp_column()
            .ok_or(NormalizationError::MissingTimestampColumn)?;

        let columns: Vec<(Channel, usize)> = log
            .mapping
            .mapped
            .iter()
            .filter(|(ch, _)| !ch.is_timestamp())
            .map(|(ch, col)| (*ch, col.index))
            .collect();

        let mut coverage: BTreeMap<Channel, ChannelCoverage> = BTreeMap::new();
        let mut rows: Vec<(f64, BTreeMap<Channel, Option<f64>>)> =
            Vec::with_capacity(log.records.len());
        let mut skipped = 0usize;

        for record in &log.records {
            let Some(t) = record.get(ts_index).and_then(parse_timestamp) else {
                skipped += 1;
                continue;
            };

            let mut values = BTreeMap::new();
            for (channel, index) in &columns {
                let cov = coverage.entry(*channel).or_default();
                cov.total_rows += 1;

                let value = match coerce(record.get(*index)) {
                    Cell::Valid(v) => {
                        cov.valid += 1;
                        Some(v)
                    }
                    Cell::Error(kept) => {
                        cov.error_values += 1;
                        kept
                    }
                    Cell::Missing => {
                        cov.missing += 1;
                        None
                    }
                };
                values.insert(*channel, value);
            }
            rows.push((t, values));
        }

        if rows.is_empty() {
            return Err(NormalizationError::UnparseableTimestamps {
                total: log.records.len(),
            });
        }

        let mut warnings = Vec::new();
        if skipped > 0 {
            warn!(skipped, "rows without usable timestamp");
            warnings.push(NormalizeWarning::RowsWithoutTimestamp { count: skipped });
        }

        let inversions = rows.windows(2).filter(|w| w[1].0 < w[0].0).count();
        if inversions > 0 {
            warn!(inversions, "timestamps out of order, reordering");
            warnings.push(NormalizeWarning::OutOfOrderTimestamps { count: inversions });
        }
        // Stable sort keeps file order among equal timestamps, which is
        // what makes the duplicate merge "last write wins"
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let t0 = rows[0].0;
        let mut samples: Vec<Sample> = Vec::with_capacity(rows.len());
        let mut merged = 0usize;

        for (t, values) in rows {
            let timestamp_s = t - t0;
            match samples.last_mut() {
                Some(last) if last.timestamp_s == timestamp_s => {
                    merged += 1;
                    for (channel, value) in values {
                        if value.is_some() {
                            last.values.insert(channel, value);
                        } else {
                            last.values.entry(channel).or_insert(None);
                        }
                    }
                }
                _ => samples.push(Sample {
                    timestamp_s,
                    values,
                }),
            }
        }

        if merged > 0 {
            warnings.push(NormalizeWarning::DuplicateTimestamps { merged });
        }

        debug!(
            timestamp_channel = ts_channel.name(),
            samples = samples.len(),
            channels = columns.len(),
            "normalization complete"
        );

        Ok(NormalizedLog {
            series: Series::new(samples, coverage),
            warnings,
        })
    }
}

impl Default for SignalNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
