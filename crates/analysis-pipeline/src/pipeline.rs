//! Request Orchestration

use std::sync::Arc;
use std::time::Duration;

use diagnostic_engine::{anomaly, catalyst, fuel_trim, o2_sensor, MetricResult};
use log_parser::LogParser;
use report_aggregator::AnalysisReport;
use signal_normalizer::SignalNormalizer;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Analyze one uploaded log.
///
/// Parse and normalize run in sequence, then the four calculators fan
/// out over the shared immutable series and are joined before the report
/// is assembled. No state survives the call.
pub async fn analyze(
    bytes: &[u8],
    filename: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    info!(filename, size = bytes.len(), "starting analysis");

    let parsed = LogParser::new().parse(bytes)?;
    let normalized = SignalNormalizer::new().normalize(&parsed)?;

    let mut warnings: Vec<String> = Vec::new();
    warnings.extend(parsed.warnings.iter().map(|w| w.to_string()));
    warnings.extend(normalized.warnings.iter().map(|w| w.to_string()));

    let series = Arc::new(normalized.series);
    let diag = &config.diagnostics;

    let handles: Vec<JoinHandle<MetricResult>> = vec![
        {
            let series = series.clone();
            let cfg = diag.catalyst.clone();
            tokio::task::spawn_blocking(move || catalyst::analyze(&series, &cfg))
        },
        {
            let series = series.clone();
            let cfg = diag.fuel_trim.clone();
            tokio::task::spawn_blocking(move || fuel_trim::analyze(&series, &cfg))
        },
        {
            let series = series.clone();
            let cfg = diag.o2_sensor.clone();
            tokio::task::spawn_blocking(move || o2_sensor::analyze(&series, &cfg))
        },
        {
            let series = series.clone();
            let cfg = diag.anomaly.clone();
            tokio::task::spawn_blocking(move || anomaly::analyze(&series, &cfg))
        },
    ];

    let mut metrics = Vec::with_capacity(handles.len());
    for handle in handles {
        let metric = handle
            .await
            .map_err(|e| AnalysisError::Internal(format!("calculator task failed: {e}")))?;
        metrics.push(metric);
    }

    debug!(metrics = metrics.len(), "calculators joined");

    let report = AnalysisReport::assemble(filename, &series, &parsed.mapping, metrics, warnings);
    info!(
        filename,
        samples = report.metadata.sample_count,
        "analysis complete"
    );
    Ok(report)
}

/// `analyze` under a caller-supplied deadline.
///
/// On expiry the request fails with `Timeout` and no partial results;
/// report construction is all-or-nothing.
pub async fn analyze_with_timeout(
    bytes: &[u8],
    filename: &str,
    config: &AnalysisConfig,
    deadline: Duration,
) -> Result<AnalysisReport, AnalysisError> {
    match tokio::time::timeout(deadline, analyze(bytes, filename, config)).await {
        Ok(result) => result,
        Err(_) => Err(AnalysisError::Timeout {
            timeout_ms: deadline.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostic_engine::HealthStatus;
    use log_parser::ParseError;
    use obd_channels::Channel;

    /// A warm steady cruise with switching upstream O2 and a quiet
    /// downstream trace, in Torque's verbose export shape
    fn healthy_log(rows: usize) -> String {
        let mut data = String::from(
            "GPS Time,Device Time,Longitude,Latitude,Engine RPM(rpm),Speed (OBD)(km/h),\
             Engine Coolant Temperature(\u{b0}C),Engine Load(%),\
             O2 Bank 1 Sensor 1 Voltage(V),O2 Bank 1 Sensor 2 Voltage(V),\
             Fuel Trim Bank 1 Short Term(%),Fuel Trim Bank 1 Long Term(%)\n",
        );
        for i in 0..rows {
            let clock = 10 * 3600 + 30 * 60 + i;
            let (hour, min, sec) = (clock / 3600, clock / 60 % 60, clock % 60);
            let up = if i % 2 == 0 { 0.15 } else { 0.85 };
            let down = if i % 2 == 0 { 0.44 } else { 0.46 };
            let stft = if i % 2 == 0 { 1.5 } else { -1.5 };
            data.push_str(&format!(
                "Thu Oct 24 {hour:02}:{min:02}:{sec:02} GMT+01:00 2024,\
                 24-Oct.-2024 {hour:02}:{min:02}:{sec:02}.000,\
                 2.3522,48.8566,{rpm},61,89,36,{up},{down},{stft},1.5\n",
                rpm = 1900 + (i % 5) * 50,
            ));
        }
        data
    }

    #[tokio::test]
    async fn test_healthy_log_full_report() {
        let data = healthy_log(30);
        let report = analyze(data.as_bytes(), "trip.csv", &AnalysisConfig::default())
            .await
            .unwrap();

        assert!(report.results.catalyst_efficiency.valid);
        assert!(report.results.fuel_trims.valid);
        assert!(report.results.o2_sensors.valid);
        assert!(report.results.anomalies.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.metadata.sample_count, 30);
        assert_eq!(
            report.metadata.unmapped_columns,
            vec!["Longitude".to_string(), "Latitude".to_string()]
        );
        assert!(report
            .metadata
            .channel_coverage
            .contains_key(&Channel::EngineRpm));

        let diagnostic_engine::MetricValue::CatalystEfficiency(cat) =
            &report.results.catalyst_efficiency.value
        else {
            panic!("wrong payload");
        };
        assert_eq!(cat.status, HealthStatus::Excellent);
    }

    #[tokio::test]
    async fn test_boundary_json_shape() {
        let data = healthy_log(30);
        let report = analyze(data.as_bytes(), "trip.csv", &AnalysisConfig::default())
            .await
            .unwrap();
        let json = report.to_json().unwrap();

        assert!(json.contains("\"filename\":\"trip.csv\""));
        assert!(json.contains("\"status\":\"analyzed\""));
        assert!(json.contains("\"catalyst_efficiency\""));
        assert!(json.contains("\"fuel_trims\""));
        assert!(json.contains("\"anomalies\""));
        assert!(json.contains("\"warnings\""));
    }

    #[tokio::test]
    async fn test_missing_o2_channels_degrade_only_their_metrics() {
        let mut data = String::from(
            "Device Time,Engine RPM(rpm),Engine Coolant Temperature(\u{b0}C),\
             Fuel Trim Bank 1 Short Term(%),Fuel Trim Bank 1 Long Term(%)\n",
        );
        for i in 0..20 {
            data.push_str(&format!("{i},2000,88,0.5,1.0\n"));
        }

        let report = analyze(data.as_bytes(), "no_o2.csv", &AnalysisConfig::default())
            .await
            .unwrap();

        assert!(!report.results.catalyst_efficiency.valid);
        assert!(!report.results.catalyst_efficiency.warnings.is_empty());
        assert!(!report.results.o2_sensors.valid);
        assert!(report.results.fuel_trims.valid);
        assert_eq!(report.status, report_aggregator::AnalysisStatus::Analyzed);
    }

    #[tokio::test]
    async fn test_malformed_row_warning_carries_line_number() {
        let mut data = healthy_log(15);
        // Wreck the 5th data row (line 6 of the file)
        let lines: Vec<&str> = data.lines().collect();
        let mut wrecked: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        wrecked[5] = "24-Oct.-2024 10:31:00.000,broken".to_string();
        data = wrecked.join("\n");
        data.push('\n');

        let report = analyze(data.as_bytes(), "trip.csv", &AnalysisConfig::default())
            .await
            .unwrap();

        assert!(report.warnings.iter().any(|w| w.contains("line 6")));
    }

    #[tokio::test]
    async fn test_no_header_fails_as_422() {
        let data = "1.0,2.0,3.0\n4.0,5.0,6.0\n";
        let err = analyze(data.as_bytes(), "raw.csv", &AnalysisConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Parse(ParseError::MissingHeader)));
        assert_eq!(err.http_status(), 422);
    }

    #[tokio::test]
    async fn test_binary_content_fails_as_400() {
        let bytes = [0x89u8, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00];
        let err = analyze(&bytes, "image.csv", &AnalysisConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::Parse(ParseError::BinaryContent(_))
        ));
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.kind(), "parse_error");
    }

    #[tokio::test]
    async fn test_identical_input_yields_identical_report() {
        let data = healthy_log(30);
        let config = AnalysisConfig::default();

        let a = analyze(data.as_bytes(), "trip.csv", &config)
            .await
            .unwrap()
            .to_json()
            .unwrap();
        let b = analyze(data.as_bytes(), "trip.csv", &config)
            .await
            .unwrap()
            .to_json()
            .unwrap();

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_deadline_expiry_returns_timeout() {
        let data = healthy_log(20_000);
        let err = analyze_with_timeout(
            data.as_bytes(),
            "big.csv",
            &AnalysisConfig::default(),
            Duration::from_nanos(1),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AnalysisError::Timeout { .. }));
        assert_eq!(err.http_status(), 504);
    }

    #[tokio::test]
    async fn test_generous_deadline_succeeds() {
        let data = healthy_log(30);
        let report = analyze_with_timeout(
            data.as_bytes(),
            "trip.csv",
            &AnalysisConfig::default(),
            Duration::from_secs(30),
        )
        .await
        .unwrap();

        assert_eq!(report.metadata.sample_count, 30);
    }
}
