//! Bandwidth sampling and evaluation module
//!
//! This module implements the two-point sampling protocol of the probe and
//! everything that turns its result into a monitoring-plugin verdict.
//!
//! ## Module Organization
//!
//! - `collector`: BandwidthCollector, sample → wait → sample
//! - `errors`: Error types and degradation logging
//! - `stats`: CounterSnapshot and DeltaRecord
//! - `validation`: Interval validation and delta calculation
//! - `thresholds`: Status, threshold modes and classification
//! - `formatting`: Human-readable rate formatting
//! - `reporting`: Status line, performance data and debug block
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use check_bandwidth::collectors::bandwidth::{BandwidthCollector, ThresholdConfig, ThresholdMode, UnitMode, build_report};
//! use check_bandwidth::collectors::platform::{InterfaceFilter, sysinfo_source::SysinfoSource};
//!
//! # async fn run() -> Result<(), check_bandwidth::collectors::bandwidth::BandwidthError> {
//! let mut collector = BandwidthCollector::new(
//!     Box::new(SysinfoSource::new()),
//!     InterfaceFilter::All,
//!     Duration::from_secs(10),
//! );
//! let records = collector.collect().await?;
//! let thresholds = ThresholdConfig { warning: 50.0, critical: 100.0, mode: ThresholdMode::PercentOfSpeed };
//! let report = build_report(&records, &thresholds, UnitMode::Bits);
//! print!("{}", report.output);
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod errors;
pub mod formatting;
pub mod reporting;
pub mod stats;
pub mod thresholds;
pub mod validation;

pub use collector::{BandwidthCollector, Measurement};
pub use errors::BandwidthError;
pub use formatting::{UnitMode, format_rate};
pub use reporting::{DebugStats, Report, build_report, render_report};
pub use stats::{CounterSnapshot, DeltaRecord, InterfaceCounters};
pub use thresholds::{Classification, Status, ThresholdConfig, ThresholdMode, classify};
pub use validation::compute_deltas;

#[cfg(test)]
pub mod tests;
