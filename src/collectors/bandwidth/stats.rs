//! Counter snapshots and delta records
//!
//! This module contains the data structures that flow through one probe run:
//! the point-in-time counter readings and the per-interface deltas derived
//! from two of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collectors::bandwidth::formatting::UnitMode;

/// Cumulative counters of a single interface at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceCounters {
    /// Total bytes received since the interface came up
    pub rx_bytes: u64,
    /// Total bytes transmitted since the interface came up
    pub tx_bytes: u64,
    /// Nominal link speed in bits per second, 0 when unknown
    pub speed_bps: u64,
}

/// One point-in-time reading of every matching interface
///
/// Interfaces keep the order in which they were inserted, which is the order
/// the statistics source lists them in. Lookup by name and ordered iteration
/// are both served by the same storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Wall-clock time the snapshot was taken
    pub captured_at: DateTime<Utc>,
    /// Number of statistics lines that could not be parsed
    pub skipped_lines: usize,
    entries: Vec<(String, InterfaceCounters)>,
}

impl Default for CounterSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSnapshot {
    /// Creates an empty snapshot stamped with the current time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates an empty snapshot stamped with the given time
    pub fn at(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            skipped_lines: 0,
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces the counters for an interface
    ///
    /// A replaced interface keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, counters: InterfaceCounters) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = counters,
            None => self.entries.push((name, counters)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceCounters> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, counters)| counters)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates interfaces in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InterfaceCounters)> {
        self.entries
            .iter()
            .map(|(name, counters)| (name.as_str(), counters))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counter movement of one interface between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaRecord {
    /// Name of the network interface (e.g., "eth0", "wlan0")
    pub interface_name: String,
    /// Bytes received during the interval
    pub rx_delta: u64,
    /// Bytes transmitted during the interval
    pub tx_delta: u64,
    /// Length of the interval in seconds, always positive
    pub elapsed_secs: f64,
    /// Link speed in bits per second from the later snapshot
    pub speed_bps: u64,
}

impl DeltaRecord {
    /// Receive rate in bytes per second
    pub fn rx_rate(&self) -> f64 {
        self.rx_delta as f64 / self.elapsed_secs
    }

    /// Transmit rate in bytes per second
    pub fn tx_rate(&self) -> f64 {
        self.tx_delta as f64 / self.elapsed_secs
    }

    /// Receive rate expressed in the given unit
    pub fn rx_rate_in(&self, unit: UnitMode) -> f64 {
        unit.rate_from_bytes(self.rx_rate())
    }

    /// Transmit rate expressed in the given unit
    pub fn tx_rate_in(&self, unit: UnitMode) -> f64 {
        unit.rate_from_bytes(self.tx_rate())
    }

    /// Whether any traffic moved during the interval
    pub fn has_activity(&self) -> bool {
        self.rx_delta > 0 || self.tx_delta > 0
    }
}
