use log::debug;
use sysinfo::Networks;

use super::CounterSource;
use super::interface_filter::InterfaceFilter;
use crate::collectors::bandwidth::stats::{CounterSnapshot, InterfaceCounters};

/// Reads interface counters through `sysinfo`, for platforms without procfs
///
/// `sysinfo` exposes no link speed, so every interface reports 0 and
/// percentage limits only make sense with the procfs source.
#[derive(Debug, Default)]
pub struct SysinfoSource;

impl SysinfoSource {
    pub fn new() -> Self {
        Self
    }
}

impl CounterSource for SysinfoSource {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn read_counters(&self, filter: &InterfaceFilter) -> CounterSnapshot {
        let mut snapshot = CounterSnapshot::new();
        let networks = Networks::new_with_refreshed_list();

        // sysinfo keeps interfaces in a hash map; sort for a stable report order
        let mut interfaces: Vec<(String, u64, u64)> = networks
            .iter()
            .filter(|(name, _)| filter.matches(name))
            .map(|(name, data)| {
                (
                    name.to_string(),
                    data.total_received(),
                    data.total_transmitted(),
                )
            })
            .collect();
        interfaces.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, rx_bytes, tx_bytes) in interfaces {
            snapshot.insert(
                name,
                InterfaceCounters {
                    rx_bytes,
                    tx_bytes,
                    speed_bps: 0,
                },
            );
        }

        debug!(
            "Read {} interfaces through sysinfo (filter={})",
            snapshot.len(),
            filter
        );
        snapshot
    }
}
