//! Two-point sampling driver
//!
//! This module contains the BandwidthCollector, which reads the counters,
//! waits for the measurement window, reads them again and hands both
//! snapshots to the delta calculator.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::collectors::bandwidth::errors::BandwidthError;
use crate::collectors::bandwidth::stats::{CounterSnapshot, DeltaRecord};
use crate::collectors::bandwidth::validation::compute_deltas;
use crate::collectors::platform::{CounterSource, InterfaceFilter};

/// Both snapshots of one measurement window and the time between them
#[derive(Debug, Clone)]
pub struct Measurement {
    pub before: CounterSnapshot,
    pub after: CounterSnapshot,
    /// Monotonic time between the two reads
    pub elapsed: Duration,
}

impl Measurement {
    /// Per-interface deltas of this measurement
    pub fn deltas(&self) -> Result<Vec<DeltaRecord>, BandwidthError> {
        compute_deltas(&self.before, &self.after, self.elapsed.as_secs_f64())
    }

    /// Lines skipped across both samples
    pub fn skipped_lines(&self) -> usize {
        self.before.skipped_lines + self.after.skipped_lines
    }
}

/// Samples interface counters twice, a fixed window apart
pub struct BandwidthCollector {
    /// Where counters come from
    source: Box<dyn CounterSource>,
    /// Which interfaces to keep
    filter: InterfaceFilter,
    /// Length of the measurement window
    sleep: Duration,
    /// Counter for samples taken, used in log messages
    sample_count: u64,
    /// Wall-clock time the first sample was requested
    started_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for BandwidthCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandwidthCollector")
            .field("source", &self.source.name())
            .field("filter", &self.filter)
            .field("sleep", &self.sleep)
            .field("sample_count", &self.sample_count)
            .finish()
    }
}

impl BandwidthCollector {
    /// Creates a collector over the given source
    pub fn new(source: Box<dyn CounterSource>, filter: InterfaceFilter, sleep: Duration) -> Self {
        Self {
            source,
            filter,
            sleep,
            sample_count: 0,
            started_at: None,
        }
    }

    pub fn sleep(&self) -> Duration {
        self.sleep
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Wall-clock time of the first sample, if one was taken
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Reads one snapshot from the source
    pub fn sample(&mut self) -> CounterSnapshot {
        self.sample_count += 1;
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }

        let snapshot = self.source.read_counters(&self.filter);
        debug!(
            "Sample #{} from {}: {} interfaces at {} (skipped_lines={})",
            self.sample_count,
            self.source.name(),
            snapshot.len(),
            snapshot.captured_at.format("%H:%M:%S%.3f"),
            snapshot.skipped_lines
        );
        if snapshot.is_empty() {
            warn!(
                "Sample #{} found no interfaces matching '{}'",
                self.sample_count, self.filter
            );
        }
        snapshot
    }

    /// Samples, waits for the measurement window and samples again
    ///
    /// The two reads are strictly sequential. The wait cannot be cancelled:
    /// a process killed during it produces no output.
    pub async fn measure(&mut self) -> Measurement {
        info!(
            "Measuring '{}' over {:.3}s using {}",
            self.filter,
            self.sleep.as_secs_f64(),
            self.source.name()
        );

        let before = self.sample();
        let first_read = Instant::now();

        tokio::time::sleep(self.sleep).await;

        let after = self.sample();
        let elapsed = first_read.elapsed();

        debug!(
            "Measurement window closed after {:.3}s (requested {:.3}s)",
            elapsed.as_secs_f64(),
            self.sleep.as_secs_f64()
        );

        Measurement {
            before,
            after,
            elapsed,
        }
    }

    /// Measures one window and returns the per-interface deltas
    pub async fn collect(&mut self) -> Result<Vec<DeltaRecord>, BandwidthError> {
        self.measure().await.deltas()
    }
}
