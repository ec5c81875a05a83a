//! Torque CSV Header Mapping
//!
//! Maps the header names Torque exports (verbose, vendor specific, often
//! duplicated across ECUs) onto canonical channels. Matching is
//! case-insensitive on the trimmed header; when several columns resolve to
//! the same channel the lowest-priority variant wins and the duplicates are
//! kept for diagnostics.

use crate::channel::Channel;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Header variants per channel, ordered by priority (index 0 = preferred
/// source). Distilled from Torque Pro exports across vendors.
const ALIASES: &[(Channel, &[&str])] = &[
    (
        Channel::DeviceTime,
        &["Device Time", "Phone Time", "System Time", "device_time"],
    ),
    (Channel::GpsTime, &["GPS Time", "GPS Timestamp", "gps_time"]),
    (
        Channel::EngineRpm,
        &[
            "Engine RPM(rpm)",
            "ECU(7EA): Engine RPM(rpm)",
            "Engine Speed(rpm)",
            "RPM",
            "Engine RPM",
            "rpm",
        ],
    ),
    (
        Channel::VehicleSpeed,
        &[
            "Speed (OBD)(km/h)",
            "ECU(7EA): Speed (OBD)(km/h)",
            "Vehicle Speed(km/h)",
            "Speed",
            "VSS(km/h)",
            "vehicle_speed_kmh",
        ],
    ),
    (
        Channel::EngineLoad,
        &[
            "Engine Load(%)",
            "ECU(7EA): Engine Load(%)",
            "Calculated Engine Load(%)",
            "Load(%)",
            "engine_load_pct",
        ],
    ),
    (
        Channel::ThrottlePosition,
        &[
            "Throttle Position(Manifold)(%)",
            "ECU(7EA): Throttle Position(Manifold)(%)",
            "Throttle Position(%)",
            "TPS(%)",
            "Throttle Pos(%)",
            "throttle_pct",
        ],
    ),
    (
        Channel::MafRate,
        &["Mass Air Flow Rate(g/s)", "MAF(g/s)", "Air Flow Rate", "maf"],
    ),
    (
        Channel::CoolantTemp,
        &[
            "Engine Coolant Temperature(°C)",
            "ECU(7EA): Engine Coolant Temperature(°C)",
            "Coolant Temperature(°C)",
            "Engine Coolant Temp(°C)",
            "Coolant Temp(°C)",
            "ECT(°C)",
            "coolant_temp_c",
        ],
    ),
    (
        Channel::IntakeAirTemp,
        &[
            "Intake Air Temperature(°C)",
            "ECU(7EA): Intake Air Temperature(°C)",
            "IAT(°C)",
            "Intake Air Temp(°C)",
            "Air Intake Temperature(°C)",
            "intake_temp_c",
        ],
    ),
    (
        Channel::AmbientTemp,
        &[
            "Ambient air temp(°C)",
            "Ambient Air Temperature(°C)",
            "Outside Temperature(°C)",
            "Ambient Temp(°C)",
            "ambient_temp_c",
        ],
    ),
    (
        Channel::BarometricPressure,
        &[
            "Barometric pressure (from vehicle)(kPa)",
            "Barometric Pressure(kPa)",
            "BARO(kPa)",
            "baro_pressure",
        ],
    ),
    (
        Channel::ManifoldPressure,
        &[
            "Intake Manifold Pressure(kPa)",
            "MAP(kPa)",
            "Manifold Pressure",
            "map_pressure",
        ],
    ),
    (
        Channel::O2UpstreamVoltage,
        &[
            "O2 Bank 1 Sensor 1 Voltage(V)",
            "O2 Sensor Bank 1 - Sensor 1(V)",
            "O2 B1S1(V)",
            "O2 Volts Bank 1 sensor 1(V)",
            "o2_b1s1_v",
        ],
    ),
    (
        Channel::O2DownstreamVoltage,
        &[
            "O2 Bank 1 Sensor 2 Voltage(V)",
            "O2 Sensor Bank 1 - Sensor 2(V)",
            "O2 B1S2(V)",
            "O2 Volts Bank 1 sensor 2(V)",
            "o2_b1s2_v",
        ],
    ),
    (
        Channel::O2UpstreamLambda,
        &[
            "O2 Bank 1 Sensor 1 Wide Range Equivalence Ratio(λ)",
            "O2 Sensor1 Wide Range Equivalence Ratio(lambda)",
            "O2 B1S1 Lambda",
            "Lambda B1S1",
            "o2_b1s1_lambda",
        ],
    ),
    (
        Channel::StftBank1,
        &[
            "Fuel Trim Bank 1 Short Term(%)",
            "Short Term Fuel Trim Bank 1(%)",
            "STFT B1(%)",
            "Short term fuel trim—Bank 1(%)",
            "stft_b1",
        ],
    ),
    (
        Channel::LtftBank1,
        &[
            "Fuel Trim Bank 1 Long Term(%)",
            "Long Term Fuel Trim Bank 1(%)",
            "LTFT B1(%)",
            "Long term fuel trim—Bank 1(%)",
            "ltft_b1",
        ],
    ),
    (
        Channel::StftBank2,
        &[
            "Fuel Trim Bank 2 Short Term(%)",
            "Short Term Fuel Trim Bank 2(%)",
            "STFT B2(%)",
            "stft_b2",
        ],
    ),
    (
        Channel::LtftBank2,
        &[
            "Fuel Trim Bank 2 Long Term(%)",
            "Long Term Fuel Trim Bank 2(%)",
            "LTFT B2(%)",
            "ltft_b2",
        ],
    ),
    (
        Channel::AfrMeasured,
        &[
            "Air Fuel Ratio(Measured)(:1)",
            "AFR Measured(:1)",
            "Measured AFR",
            "afr_measured",
        ],
    ),
    (
        Channel::AfrCommanded,
        &[
            "Air Fuel Ratio(Commanded)(:1)",
            "AFR Commanded(:1)",
            "Commanded AFR",
            "afr_commanded",
        ],
    ),
    (
        Channel::CatalystTempB1S1,
        &[
            "Catalyst Temperature (Bank 1 Sensor 1)(°C)",
            "Cat Temp B1S1(°C)",
            "Catalyst Temp B1S1",
            "cat_temp_b1s1",
        ],
    ),
    (
        Channel::CatalystTempB1S2,
        &[
            "Catalyst Temperature (Bank 1 Sensor 2)(°C)",
            "Cat Temp B1S2(°C)",
            "Catalyst Temp B1S2",
            "cat_temp_b1s2",
        ],
    ),
];

/// One CSV column bound to a canonical channel
#[derive(Debug, Clone, Serialize)]
pub struct MappedColumn {
    /// Header exactly as it appeared in the CSV
    pub csv_column: String,
    /// Zero-based column index
    pub index: usize,
    /// Variant priority (lower = preferred source)
    pub priority: u8,
}

/// Result of mapping a CSV header row
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderMapping {
    /// Winning column per recognized channel
    pub mapped: BTreeMap<Channel, MappedColumn>,
    /// Headers no channel claims; kept as passthrough, never an error
    pub unmapped: Vec<String>,
    /// All candidate columns for channels that had more than one source
    pub duplicates: BTreeMap<Channel, Vec<MappedColumn>>,
}

impl HeaderMapping {
    /// Column index of a mapped channel
    pub fn column_index(&self, channel: Channel) -> Option<usize> {
        self.mapped.get(&channel).map(|c| c.index)
    }

    /// Preferred timestamp source: device time, then GPS time
    pub fn timestamp_column(&self) -> Option<(Channel, usize)> {
        [Channel::DeviceTime, Channel::GpsTime]
            .into_iter()
            .find_map(|ch| self.column_index(ch).map(|idx| (ch, idx)))
    }

    /// Recognized data channels (timestamps excluded) in canonical order
    pub fn data_channels(&self) -> Vec<Channel> {
        self.mapped
            .keys()
            .copied()
            .filter(|ch| !ch.is_timestamp())
            .collect()
    }
}

/// Case-insensitive lookup from Torque header names to channels
pub struct ChannelMap {
    lookup: HashMap<String, (Channel, u8)>,
}

impl Default for ChannelMap {
    fn default() -> Self {
        let mut lookup = HashMap::new();
        for (channel, variants) in ALIASES {
            for (priority, variant) in variants.iter().enumerate() {
                lookup.insert(variant.to_lowercase(), (*channel, priority as u8));
            }
        }
        Self { lookup }
    }
}

impl ChannelMap {
    /// Resolve a single header to its channel and variant priority
    pub fn resolve(&self, header: &str) -> Option<(Channel, u8)> {
        self.lookup.get(header.trim().to_lowercase().as_str()).copied()
    }

    /// Map a full header row, selecting the best source per channel
    pub fn map_headers(&self, headers: &[String]) -> HeaderMapping {
        let mut mapping = HeaderMapping::default();

        for (index, raw) in headers.iter().enumerate() {
            let header = raw.trim();
            if header.is_empty() {
                continue;
            }

            let Some((channel, priority)) = self.resolve(header) else {
                mapping.unmapped.push(header.to_string());
                continue;
            };

            let entry = MappedColumn {
                csv_column: header.to_string(),
                index,
                priority,
            };

            match mapping.mapped.get(&channel).cloned() {
                Some(current) => {
                    let candidates = mapping
                        .duplicates
                        .entry(channel)
                        .or_insert_with(|| vec![current.clone()]);
                    candidates.push(entry.clone());
                    if entry.priority < current.priority {
                        mapping.mapped.insert(channel, entry);
                    }
                }
                None => {
                    mapping.mapped.insert(channel, entry);
                }
            }
        }

        mapping
    }
}
