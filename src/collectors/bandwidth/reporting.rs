//! Monitoring-plugin output for bandwidth checks
//!
//! This module renders the single status line consumed by monitoring
//! frameworks:
//!
//! ```text
//! BANDWIDTH WARNING: eth0(Rx 1.20Mbit/s Tx 80.00Kbit/s) eth1(...);|eth0_Rx=1200000.00b/s;500000000;1000000000;; eth0_Tx=...
//! ```
//!
//! and the optional debug block printed after it.

use chrono::{DateTime, Local};
use log::debug;
use serde::Serialize;
use std::time::Duration;

use crate::collectors::bandwidth::formatting::{UnitMode, format_rate};
use crate::collectors::bandwidth::stats::DeltaRecord;
use crate::collectors::bandwidth::thresholds::{Classification, Status, ThresholdConfig, classify};

/// Headline used when no interface could be measured
pub const UNKNOWN_INTERFACES_MESSAGE: &str = "Unable to determine network interfaces.";

/// Final output of a check and the status it maps to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub status: Status,
    /// Newline-terminated plugin output
    pub output: String,
}

impl Report {
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }

    /// A report that only carries an UNKNOWN status and a message
    pub fn unknown(message: &str) -> Self {
        Report {
            status: Status::Unknown,
            output: format!("BANDWIDTH {}: {}\n", Status::Unknown, message),
        }
    }
}

/// Human-readable block: `eth0(Rx 1.00Mbit/s Tx 2.00Mbit/s) eth1(...)`
pub fn render_details(records: &[DeltaRecord], unit: UnitMode) -> String {
    records
        .iter()
        .map(|record| {
            format!(
                "{}(Rx {} Tx {})",
                record.interface_name,
                format_rate(record.rx_rate(), unit),
                format_rate(record.tx_rate(), unit)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Performance data block with values and limits in the display unit
pub fn render_perfdata(
    records: &[DeltaRecord],
    thresholds: &ThresholdConfig,
    unit: UnitMode,
) -> String {
    let uom = unit.perfdata_uom();
    records
        .iter()
        .map(|record| {
            let limits = thresholds.limits_for(record.speed_bps).in_unit(unit);
            let name = &record.interface_name;
            format!(
                "{name}_Rx={:.2}{uom};{:.0};{:.0};; {name}_Tx={:.2}{uom};{:.0};{:.0};;",
                record.rx_rate_in(unit),
                limits.warning,
                limits.critical,
                record.tx_rate_in(unit),
                limits.warning,
                limits.critical,
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a classified measurement
pub fn render_report(
    classification: &Classification,
    records: &[DeltaRecord],
    thresholds: &ThresholdConfig,
    unit: UnitMode,
) -> Report {
    if classification.overall == Status::Unknown || records.is_empty() {
        return Report::unknown(UNKNOWN_INTERFACES_MESSAGE);
    }

    let output = format!(
        "BANDWIDTH {}: {};|{}\n",
        classification.overall,
        render_details(records, unit),
        render_perfdata(records, thresholds, unit)
    );

    Report {
        status: classification.overall,
        output,
    }
}

/// Classifies the deltas and renders the result
pub fn build_report(records: &[DeltaRecord], thresholds: &ThresholdConfig, unit: UnitMode) -> Report {
    let classification = classify(records, thresholds);
    let report = render_report(&classification, records, thresholds, unit);
    debug!(
        "Report built: status={} exit_code={} interfaces={}",
        report.status,
        report.exit_code(),
        records.len()
    );
    report
}

/// Runtime figures printed after the report in debug mode
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    pub start: DateTime<Local>,
    pub elapsed: Duration,
    pub sleep: Duration,
    pub devices: usize,
}

impl DebugStats {
    /// Time spent outside the measurement window
    pub fn overhead(&self) -> Duration {
        self.elapsed.saturating_sub(self.sleep)
    }

    /// Blank line followed by one right-aligned line per figure
    pub fn render(&self) -> String {
        let mut output = String::from("\n");
        output.push_str(&format!(
            "{:>10}: {}\n",
            "Start",
            self.start.format("%Y-%m-%d %H:%M:%S%.6f %z")
        ));
        output.push_str(&format!("{:>10}: {:?}\n", "Elapsed", self.elapsed));
        output.push_str(&format!("{:>10}: {:?}\n", "Sleep", self.sleep));
        output.push_str(&format!("{:>10}: {:?}\n", "Overhead", self.overhead()));
        output.push_str(&format!("{:>10}: {}\n", "Devices", self.devices));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::bandwidth::thresholds::ThresholdMode;

    fn record(name: &str, rx_delta: u64, tx_delta: u64, speed_bps: u64) -> DeltaRecord {
        DeltaRecord {
            interface_name: name.to_string(),
            rx_delta,
            tx_delta,
            elapsed_secs: 1.0,
            speed_bps,
        }
    }

    #[test]
    fn test_render_details_joins_without_trailing_space() {
        let records = vec![record("eth0", 1024, 0, 0), record("eth1", 0, 2048, 0)];
        assert_eq!(
            render_details(&records, UnitMode::Bytes),
            "eth0(Rx 1.00KByte/s Tx 0.00Byte/s) eth1(Rx 0.00Byte/s Tx 2.00KByte/s)"
        );
    }

    #[test]
    fn test_render_perfdata_percent_mode_in_bits() {
        let thresholds = ThresholdConfig {
            warning: 50.0,
            critical: 100.0,
            mode: ThresholdMode::PercentOfSpeed,
        };
        let records = vec![record("eth0", 1000, 500, 100_000_000)];
        assert_eq!(
            render_perfdata(&records, &thresholds, UnitMode::Bits),
            "eth0_Rx=8000.00b/s;50000000;100000000;; eth0_Tx=4000.00b/s;50000000;100000000;;"
        );
    }

    #[test]
    fn test_render_perfdata_converts_limits_to_display_unit() {
        let thresholds = ThresholdConfig {
            warning: 800.0,
            critical: 1600.0,
            mode: ThresholdMode::AbsoluteBits,
        };
        let records = vec![record("eth0", 10, 20, 0)];
        assert_eq!(
            render_perfdata(&records, &thresholds, UnitMode::Bytes),
            "eth0_Rx=10.00B/s;100;200;; eth0_Tx=20.00B/s;100;200;;"
        );
    }

    #[test]
    fn test_unknown_report() {
        let report = Report::unknown(UNKNOWN_INTERFACES_MESSAGE);
        assert_eq!(
            report.output,
            "BANDWIDTH UNKNOWN: Unable to determine network interfaces.\n"
        );
        assert_eq!(report.exit_code(), 3);
    }

    #[test]
    fn test_debug_stats_render() {
        let stats = DebugStats {
            start: Local::now(),
            elapsed: Duration::from_millis(10_250),
            sleep: Duration::from_secs(10),
            devices: 2,
        };
        assert_eq!(stats.overhead(), Duration::from_millis(250));

        let rendered = stats.render();
        assert!(rendered.starts_with('\n'));
        assert!(rendered.contains("   Elapsed: 10.25s\n"));
        assert!(rendered.contains("     Sleep: 10s\n"));
        assert!(rendered.contains("  Overhead: 250ms\n"));
        assert!(rendered.ends_with("   Devices: 2\n"));
    }

    #[test]
    fn test_debug_stats_overhead_never_negative() {
        let stats = DebugStats {
            start: Local::now(),
            elapsed: Duration::from_secs(1),
            sleep: Duration::from_secs(2),
            devices: 0,
        };
        assert_eq!(stats.overhead(), Duration::ZERO);
    }
}
