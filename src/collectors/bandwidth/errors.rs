//! Error types for bandwidth sampling and evaluation
//!
//! Most failures in the probe degrade instead of aborting: an unreadable
//! statistics source becomes an empty snapshot and a malformed line is
//! skipped. These variants describe what went wrong so the degradation can be
//! logged, and carry the few errors that do reach the caller.

use log::{debug, warn};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading counters, computing deltas or validating configuration
#[derive(Debug, Error, PartialEq)]
pub enum BandwidthError {
    /// The interface statistics source could not be read
    #[error("statistics source {path:?} unavailable: {message}")]
    SourceUnavailable { path: PathBuf, message: String },

    /// A line of the statistics table did not have the expected shape
    #[error("malformed statistics line {line_number}: {reason}")]
    MalformedLine { line_number: usize, reason: String },

    /// The sampling interval was zero, negative or not a number
    #[error("invalid sampling interval: {elapsed_secs}s")]
    InvalidInterval { elapsed_secs: f64 },

    /// A configuration value was out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BandwidthError {
    /// Whether the probe can carry on after this error
    ///
    /// Source and line errors only reduce the data available; interval and
    /// configuration errors make the measurement meaningless.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            BandwidthError::SourceUnavailable { .. } | BandwidthError::MalformedLine { .. }
        )
    }
}

/// Logs an error that the caller is about to degrade around
pub fn log_degraded(error: &BandwidthError, context: &str) {
    if error.is_degradable() {
        warn!("{}: {} - continuing with partial data", context, error);
    } else {
        debug!("{}: {} - not degradable", context, error);
    }
}
