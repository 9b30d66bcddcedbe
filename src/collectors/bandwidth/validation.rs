//! Delta calculation between two counter snapshots
//!
//! This module turns a pair of snapshots into per-interface delta records,
//! validating the sampling interval and noting interfaces that vanished or
//! whose counters went backwards.

use log::{debug, trace, warn};

use crate::collectors::bandwidth::errors::BandwidthError;
use crate::collectors::bandwidth::stats::{CounterSnapshot, DeltaRecord};

/// Validates the interval between two samples
///
/// # Returns
///
/// * `Ok(elapsed_secs)` when the interval is a positive, finite number of seconds
/// * `Err(BandwidthError::InvalidInterval)` otherwise
pub fn validate_interval(elapsed_secs: f64) -> Result<f64, BandwidthError> {
    if elapsed_secs.is_finite() && elapsed_secs > 0.0 {
        Ok(elapsed_secs)
    } else {
        Err(BandwidthError::InvalidInterval { elapsed_secs })
    }
}

/// Difference of two cumulative counters
///
/// Counters are assumed not to wrap within one interval. A decrease (counter
/// reset, driver reload) is not corrected; it is logged and counted as zero.
fn counter_delta(interface_name: &str, direction: &str, before: u64, after: u64) -> u64 {
    if after < before {
        warn!(
            "Interface '{}': {} counter went backwards ({} -> {}), treating delta as 0",
            interface_name, direction, before, after
        );
    }
    after.saturating_sub(before)
}

/// Computes per-interface deltas between two snapshots
///
/// Every interface of `before` that is still present in `after` yields one
/// record, in the order of `before`. Interfaces that disappeared between the
/// samples are dropped. The link speed is taken from the later sample.
///
/// # Arguments
///
/// * `before` - The first snapshot
/// * `after` - The second snapshot
/// * `elapsed_secs` - Seconds between the two snapshots, must be positive
pub fn compute_deltas(
    before: &CounterSnapshot,
    after: &CounterSnapshot,
    elapsed_secs: f64,
) -> Result<Vec<DeltaRecord>, BandwidthError> {
    let elapsed_secs = validate_interval(elapsed_secs)?;
    let mut records = Vec::with_capacity(before.len());

    for (name, first) in before.iter() {
        let Some(second) = after.get(name) else {
            debug!(
                "Interface '{}' vanished between samples, dropping it from the measurement",
                name
            );
            continue;
        };

        let record = DeltaRecord {
            interface_name: name.to_string(),
            rx_delta: counter_delta(name, "rx", first.rx_bytes, second.rx_bytes),
            tx_delta: counter_delta(name, "tx", first.tx_bytes, second.tx_bytes),
            elapsed_secs,
            speed_bps: second.speed_bps,
        };

        trace!(
            "Interface '{}': rx_delta={} tx_delta={} over {:.3}s (rx={:.2}B/s tx={:.2}B/s)",
            name,
            record.rx_delta,
            record.tx_delta,
            elapsed_secs,
            record.rx_rate(),
            record.tx_rate()
        );
        records.push(record);
    }

    debug!(
        "Computed {} deltas from {} and {} interfaces over {:.3}s",
        records.len(),
        before.len(),
        after.len(),
        elapsed_secs
    );

    Ok(records)
}
