//! Threshold evaluation for measured rates
//!
//! Classifies every interface into OK/WARNING/CRITICAL and folds the results
//! into one overall status. Limits are either absolute rates or a percentage
//! of each interface's own link speed.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::collectors::bandwidth::formatting::UnitMode;
use crate::collectors::bandwidth::stats::DeltaRecord;

/// Result of a check, ordered by severity
///
/// `Unknown` sits outside the OK < WARNING < CRITICAL scale: it only appears
/// when no interface could be measured at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Process exit code understood by monitoring frameworks
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }

    fn severity(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 0,
        }
    }

    /// The more severe of two statuses; the earlier one wins a tie
    pub fn worst(self, other: Status) -> Status {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the warning and critical limits are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ThresholdMode {
    /// Limits are bytes per second
    #[value(name = "bytes")]
    #[serde(rename = "bytes")]
    AbsoluteBytes,
    /// Limits are bits per second
    #[value(name = "bits")]
    #[serde(rename = "bits")]
    AbsoluteBits,
    /// Limits are a percentage of the interface link speed
    #[default]
    #[value(name = "percent")]
    #[serde(rename = "percent")]
    PercentOfSpeed,
}

impl ThresholdMode {
    /// Unit the limits are expressed in
    pub fn unit(self) -> UnitMode {
        match self {
            ThresholdMode::AbsoluteBytes => UnitMode::Bytes,
            ThresholdMode::AbsoluteBits | ThresholdMode::PercentOfSpeed => UnitMode::Bits,
        }
    }
}

/// Warning and critical limits, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub warning: f64,
    pub critical: f64,
    pub mode: ThresholdMode,
}

/// Effective limits for one interface, in the unit of the threshold mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub warning: f64,
    pub critical: f64,
    pub unit: UnitMode,
}

impl Limits {
    /// Converts the limits into another display unit
    pub fn in_unit(self, unit: UnitMode) -> Limits {
        if unit == self.unit {
            return self;
        }
        let factor = match (self.unit, unit) {
            (UnitMode::Bits, UnitMode::Bytes) => 1.0 / 8.0,
            _ => 8.0,
        };
        Limits {
            warning: self.warning * factor,
            critical: self.critical * factor,
            unit,
        }
    }
}

impl ThresholdConfig {
    /// Limits that apply to an interface with the given link speed
    ///
    /// In percentage mode an unknown speed of 0 yields limits of 0, so any
    /// traffic at all is critical.
    pub fn limits_for(&self, speed_bps: u64) -> Limits {
        let (warning, critical) = match self.mode {
            ThresholdMode::AbsoluteBytes | ThresholdMode::AbsoluteBits => {
                (self.warning, self.critical)
            }
            ThresholdMode::PercentOfSpeed => {
                let speed = speed_bps as f64;
                (speed * self.warning / 100.0, speed * self.critical / 100.0)
            }
        };
        Limits {
            warning,
            critical,
            unit: self.mode.unit(),
        }
    }

    /// Classifies a single interface
    pub fn classify_record(&self, record: &DeltaRecord) -> Status {
        let limits = self.limits_for(record.speed_bps);
        let rx = record.rx_rate_in(limits.unit);
        let tx = record.tx_rate_in(limits.unit);

        let status = if rx > limits.critical || tx > limits.critical {
            Status::Critical
        } else if rx > limits.warning || tx > limits.warning {
            Status::Warning
        } else {
            Status::Ok
        };

        trace!(
            "Interface '{}': rx={:.2} tx={:.2} warning={:.2} critical={:.2} ({:?}) -> {}",
            record.interface_name,
            rx,
            tx,
            limits.warning,
            limits.critical,
            limits.unit,
            status
        );
        status
    }
}

/// Overall and per-interface outcome of a check
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub overall: Status,
    pub per_interface: Vec<(String, Status)>,
}

impl Classification {
    pub fn status_of(&self, interface_name: &str) -> Option<Status> {
        self.per_interface
            .iter()
            .find(|(name, _)| name == interface_name)
            .map(|(_, status)| *status)
    }
}

/// Classifies every record and derives the overall status
///
/// The overall status is the worst per-interface status. With no records at
/// all the result is `Unknown`.
pub fn classify(records: &[DeltaRecord], thresholds: &ThresholdConfig) -> Classification {
    if records.is_empty() {
        debug!("No interfaces to classify, reporting UNKNOWN");
        return Classification {
            overall: Status::Unknown,
            per_interface: Vec::new(),
        };
    }

    let mut overall = Status::Ok;
    let mut per_interface = Vec::with_capacity(records.len());

    for record in records {
        if thresholds.mode == ThresholdMode::PercentOfSpeed && record.speed_bps == 0 {
            warn!(
                "Interface '{}' has no known link speed; percentage limits evaluate to 0",
                record.interface_name
            );
        }

        let status = thresholds.classify_record(record);
        overall = overall.worst(status);
        per_interface.push((record.interface_name.clone(), status));
    }

    debug!(
        "Classified {} interfaces, overall status {}",
        per_interface.len(),
        overall
    );

    Classification {
        overall,
        per_interface,
    }
}
