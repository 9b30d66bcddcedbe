//! Formatting utilities for bandwidth rates
//!
//! Rates are measured in bytes per second everywhere in the probe. This module
//! converts them into the unit the operator asked for and scales them into a
//! human-readable string such as `16.78Mbit/s` or `2.00MByte/s`.

use serde::{Deserialize, Serialize};

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;
const TIB: f64 = GIB * 1024.0;

const KILO: f64 = 1e3;
const MEGA: f64 = 1e6;
const GIGA: f64 = 1e9;
const TERA: f64 = 1e12;

/// Unit in which rates are displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitMode {
    /// Bits per second with decimal (1000-based) scaling
    #[default]
    Bits,
    /// Bytes per second with binary (1024-based) scaling
    Bytes,
}

impl UnitMode {
    /// Converts a bytes-per-second rate into this unit
    pub fn rate_from_bytes(self, bytes_per_second: f64) -> f64 {
        match self {
            UnitMode::Bits => bytes_per_second * 8.0,
            UnitMode::Bytes => bytes_per_second,
        }
    }

    /// Unit name used in the human-readable rate
    pub fn label(self) -> &'static str {
        match self {
            UnitMode::Bits => "bit",
            UnitMode::Bytes => "Byte",
        }
    }

    /// Unit of measurement used in performance data
    pub fn perfdata_uom(self) -> &'static str {
        match self {
            UnitMode::Bits => "b/s",
            UnitMode::Bytes => "B/s",
        }
    }
}

/// Picks the scale prefix and divisor for a value already in the target unit
fn scale(value: f64, mode: UnitMode) -> (f64, &'static str) {
    let steps: [(f64, &'static str); 4] = match mode {
        UnitMode::Bytes => [(KIB, "K"), (MIB, "M"), (GIB, "G"), (TIB, "T")],
        UnitMode::Bits => [(KILO, "K"), (MEGA, "M"), (GIGA, "G"), (TERA, "T")],
    };

    steps
        .iter()
        .rev()
        .find(|(divisor, _)| value >= *divisor)
        .map(|(divisor, prefix)| (value / divisor, *prefix))
        .unwrap_or((value, ""))
}

/// Formats a rate given in bytes per second
///
/// Byte mode scales by powers of 1024, bit mode multiplies by 8 first and
/// scales by powers of 1000. Values beyond the tera range stay in `T`.
///
/// # Examples
///
/// ```
/// use check_bandwidth::collectors::bandwidth::formatting::{format_rate, UnitMode};
///
/// assert_eq!(format_rate(2_097_152.0, UnitMode::Bytes), "2.00MByte/s");
/// assert_eq!(format_rate(2_097_152.0, UnitMode::Bits), "16.78Mbit/s");
/// assert_eq!(format_rate(64.0, UnitMode::Bits), "512.00bit/s");
/// ```
pub fn format_rate(bytes_per_second: f64, mode: UnitMode) -> String {
    let value = mode.rate_from_bytes(bytes_per_second);
    let (scaled, prefix) = scale(value, mode);
    format!("{:.2}{}{}/s", scaled, prefix, mode.label())
}
