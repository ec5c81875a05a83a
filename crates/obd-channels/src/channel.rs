//! Canonical Channel Catalog

use serde::{Deserialize, Serialize};

/// Readings at or above this value are device error codes, not data
/// (51199 is the Toyota "active test not performed" marker).
pub const DEVICE_ERROR_FLOOR: f64 = 51199.0;

/// Known error sentinels emitted by OBD adapters and gateways
const ERROR_SENTINELS: [f64; 6] = [51199.0, 65535.0, -1.0, 255.0, 32767.0, -32768.0];

/// Check whether a reading matches a known adapter error sentinel.
///
/// Used for coverage statistics only: several sentinels (-1, 255) are
/// legitimate values on some channels, so matching one never drops data.
pub fn is_error_sentinel(value: f64) -> bool {
    ERROR_SENTINELS.iter().any(|s| (value - s).abs() < 0.01)
}

/// Canonical sensor channels recognized by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Phone/head-unit clock ("Device Time")
    #[serde(rename = "timestamp_device")]
    DeviceTime,
    /// GPS receiver clock ("GPS Time")
    #[serde(rename = "timestamp_gps")]
    GpsTime,
    /// Engine speed
    #[serde(rename = "engine_rpm")]
    EngineRpm,
    /// Vehicle speed from the OBD bus
    #[serde(rename = "vehicle_speed")]
    VehicleSpeed,
    /// Calculated engine load
    #[serde(rename = "engine_load")]
    EngineLoad,
    /// Throttle position
    #[serde(rename = "throttle_position")]
    ThrottlePosition,
    /// Mass air flow rate
    #[serde(rename = "maf_rate")]
    MafRate,
    /// Engine coolant temperature
    #[serde(rename = "coolant_temp")]
    CoolantTemp,
    /// Intake air temperature
    #[serde(rename = "intake_air_temp")]
    IntakeAirTemp,
    /// Ambient air temperature
    #[serde(rename = "ambient_temp")]
    AmbientTemp,
    /// Barometric pressure
    #[serde(rename = "barometric_pressure")]
    BarometricPressure,
    /// Intake manifold absolute pressure
    #[serde(rename = "manifold_pressure")]
    ManifoldPressure,
    /// Upstream (pre-cat) narrow band O2 voltage, bank 1 sensor 1
    #[serde(rename = "o2_b1s1_voltage")]
    O2UpstreamVoltage,
    /// Downstream (post-cat) narrow band O2 voltage, bank 1 sensor 2
    #[serde(rename = "o2_b1s2_voltage")]
    O2DownstreamVoltage,
    /// Upstream wideband equivalence ratio
    #[serde(rename = "o2_b1s1_lambda")]
    O2UpstreamLambda,
    /// Short-term fuel trim, bank 1
    #[serde(rename = "stft_b1")]
    StftBank1,
    /// Long-term fuel trim, bank 1
    #[serde(rename = "ltft_b1")]
    LtftBank1,
    /// Short-term fuel trim, bank 2
    #[serde(rename = "stft_b2")]
    StftBank2,
    /// Long-term fuel trim, bank 2
    #[serde(rename = "ltft_b2")]
    LtftBank2,
    /// Measured air/fuel ratio
    #[serde(rename = "afr_measured")]
    AfrMeasured,
    /// Commanded air/fuel ratio
    #[serde(rename = "afr_commanded")]
    AfrCommanded,
    /// Catalyst temperature, bank 1 sensor 1
    #[serde(rename = "catalyst_temp_b1s1")]
    CatalystTempB1S1,
    /// Catalyst temperature, bank 1 sensor 2
    #[serde(rename = "catalyst_temp_b1s2")]
    CatalystTempB1S2,
}

impl Channel {
    /// All channels in canonical order
    pub fn all() -> &'static [Channel] {
        use Channel::*;
        &[
            DeviceTime,
            GpsTime,
            EngineRpm,
            VehicleSpeed,
            EngineLoad,
            ThrottlePosition,
            MafRate,
            CoolantTemp,
            IntakeAirTemp,
            AmbientTemp,
            BarometricPressure,
            ManifoldPressure,
            O2UpstreamVoltage,
            O2DownstreamVoltage,
            O2UpstreamLambda,
            StftBank1,
            LtftBank1,
            StftBank2,
            LtftBank2,
            AfrMeasured,
            AfrCommanded,
            CatalystTempB1S1,
            CatalystTempB1S2,
        ]
    }

    /// Canonical snake_case name used across the report boundary
    pub fn name(&self) -> &'static str {
        use Channel::*;
        match self {
            DeviceTime => "timestamp_device",
            GpsTime => "timestamp_gps",
            EngineRpm => "engine_rpm",
            VehicleSpeed => "vehicle_speed",
            EngineLoad => "engine_load",
            ThrottlePosition => "throttle_position",
            MafRate => "maf_rate",
            CoolantTemp => "coolant_temp",
            IntakeAirTemp => "intake_air_temp",
            AmbientTemp => "ambient_temp",
            BarometricPressure => "barometric_pressure",
            ManifoldPressure => "manifold_pressure",
            O2UpstreamVoltage => "o2_b1s1_voltage",
            O2DownstreamVoltage => "o2_b1s2_voltage",
            O2UpstreamLambda => "o2_b1s1_lambda",
            StftBank1 => "stft_b1",
            LtftBank1 => "ltft_b1",
            StftBank2 => "stft_b2",
            LtftBank2 => "ltft_b2",
            AfrMeasured => "afr_measured",
            AfrCommanded => "afr_commanded",
            CatalystTempB1S1 => "catalyst_temp_b1s1",
            CatalystTempB1S2 => "catalyst_temp_b1s2",
        }
    }

    /// Measurement unit, if any
    pub fn unit(&self) -> Option<&'static str> {
        use Channel::*;
        match self {
            DeviceTime | GpsTime => None,
            EngineRpm => Some("rpm"),
            VehicleSpeed => Some("km/h"),
            EngineLoad | ThrottlePosition | StftBank1 | LtftBank1 | StftBank2 | LtftBank2 => {
                Some("%")
            }
            MafRate => Some("g/s"),
            CoolantTemp | IntakeAirTemp | AmbientTemp | CatalystTempB1S1 | CatalystTempB1S2 => {
                Some("°C")
            }
            BarometricPressure | ManifoldPressure => Some("kPa"),
            O2UpstreamVoltage | O2DownstreamVoltage => Some("V"),
            O2UpstreamLambda => Some("λ"),
            AfrMeasured | AfrCommanded => Some(":1"),
        }
    }

    /// Whether this channel carries the time axis rather than a reading
    pub fn is_timestamp(&self) -> bool {
        matches!(self, Channel::DeviceTime | Channel::GpsTime)
    }

    /// Plausible physical range (inclusive) for anomaly screening
    pub fn plausible_range(&self) -> Option<(f64, f64)> {
        use Channel::*;
        match self {
            DeviceTime | GpsTime => None,
            EngineRpm => Some((0.0, 10000.0)),
            VehicleSpeed => Some((0.0, 250.0)),
            EngineLoad | ThrottlePosition => Some((0.0, 100.0)),
            MafRate => Some((0.0, 300.0)),
            CoolantTemp => Some((-40.0, 150.0)),
            IntakeAirTemp => Some((-40.0, 100.0)),
            AmbientTemp => Some((-40.0, 60.0)),
            BarometricPressure => Some((80.0, 110.0)),
            ManifoldPressure => Some((0.0, 255.0)),
            O2UpstreamVoltage | O2DownstreamVoltage => Some((0.0, 1.1)),
            O2UpstreamLambda => Some((0.5, 2.0)),
            StftBank1 | LtftBank1 | StftBank2 | LtftBank2 => Some((-50.0, 50.0)),
            AfrMeasured | AfrCommanded => Some((10.0, 20.0)),
            CatalystTempB1S1 | CatalystTempB1S2 => Some((0.0, 1000.0)),
        }
    }

    /// Maximum physically plausible rate of change (units per second).
    ///
    /// Only defined for signals with real inertia (rotational or thermal);
    /// step inputs such as throttle or O2 switching carry no limit.
    pub fn slew_limit_per_s(&self) -> Option<f64> {
        use Channel::*;
        match self {
            EngineRpm => Some(5000.0),
            VehicleSpeed => Some(30.0),
            CoolantTemp => Some(5.0),
            IntakeAirTemp => Some(20.0),
            AmbientTemp => Some(2.0),
            BarometricPressure => Some(5.0),
            LtftBank1 | LtftBank2 => Some(5.0),
            CatalystTempB1S1 | CatalystTempB1S2 => Some(50.0),
            _ => None,
        }
    }
}
