use log::{debug, trace};
use std::fs;
use std::path::{Path, PathBuf};

use super::CounterSource;
use super::interface_filter::InterfaceFilter;
use crate::collectors::bandwidth::errors::{BandwidthError, log_degraded};
use crate::collectors::bandwidth::stats::{CounterSnapshot, InterfaceCounters};

/// Index of the transmitted-bytes column after the interface name
const TX_BYTES_FIELD: usize = 8;

/// Reads interface counters from `/proc/net/dev` and link speeds from
/// `/sys/class/net/<iface>/speed`
#[derive(Debug, Clone)]
pub struct ProcNetDevSource {
    proc_root: PathBuf,
    sys_root: PathBuf,
}

impl Default for ProcNetDevSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Interface counters parsed from the statistics table, before speeds are attached
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedNetDev {
    /// `(name, rx_bytes, tx_bytes)` in table order
    pub interfaces: Vec<(String, u64, u64)>,
    /// Lines that looked like interface rows but could not be parsed
    pub skipped_lines: usize,
}

/// Parses the contents of `/proc/net/dev`
///
/// Header lines have no `:` and are ignored. A row that matches the filter
/// but has too few columns or a non-numeric counter is logged, counted and
/// skipped; parsing continues with the next row.
pub fn parse_net_dev(content: &str, filter: &InterfaceFilter) -> ParsedNetDev {
    let mut parsed = ParsedNetDev::default();

    for (index, line) in content.lines().enumerate() {
        let Some((name, values)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if !filter.matches(name) {
            continue;
        }

        match parse_counters(values) {
            Ok((rx_bytes, tx_bytes)) => {
                trace!("Interface '{}': rx={} tx={}", name, rx_bytes, tx_bytes);
                parsed.interfaces.push((name.to_string(), rx_bytes, tx_bytes));
            }
            Err(reason) => {
                let error = BandwidthError::MalformedLine {
                    line_number: index + 1,
                    reason: format!("interface '{}': {}", name, reason),
                };
                log_degraded(&error, "Parsing interface statistics");
                parsed.skipped_lines += 1;
            }
        }
    }

    parsed
}

fn parse_counters(values: &str) -> Result<(u64, u64), String> {
    let fields: Vec<&str> = values.split_whitespace().collect();
    if fields.len() <= TX_BYTES_FIELD {
        return Err(format!(
            "expected at least {} fields, found {}",
            TX_BYTES_FIELD + 1,
            fields.len()
        ));
    }

    let rx_bytes = fields[0]
        .parse::<u64>()
        .map_err(|e| format!("rx_bytes {:?}: {}", fields[0], e))?;
    let tx_bytes = fields[TX_BYTES_FIELD]
        .parse::<u64>()
        .map_err(|e| format!("tx_bytes {:?}: {}", fields[TX_BYTES_FIELD], e))?;
    Ok((rx_bytes, tx_bytes))
}

/// Converts the contents of a sysfs `speed` attribute (Mbps) into bits per second
///
/// Virtual interfaces report `-1` or refuse the read; both map to 0.
pub fn parse_link_speed(content: &str) -> u64 {
    match content.trim().parse::<i64>() {
        Ok(mbps) if mbps > 0 => (mbps as u64).saturating_mul(1_000_000),
        _ => 0,
    }
}

impl ProcNetDevSource {
    pub fn new() -> Self {
        Self::with_roots("/proc", "/sys")
    }

    /// Creates a source reading below alternative proc and sys mount points
    pub fn with_roots(proc_root: impl Into<PathBuf>, sys_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
        }
    }

    pub fn net_dev_path(&self) -> PathBuf {
        self.proc_root.join("net").join("dev")
    }

    pub fn speed_path(&self, interface_name: &str) -> PathBuf {
        self.sys_root
            .join("class")
            .join("net")
            .join(interface_name)
            .join("speed")
    }

    /// Nominal link speed of an interface in bits per second, 0 when unknown
    pub fn link_speed(&self, interface_name: &str) -> u64 {
        let path = self.speed_path(interface_name);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let speed = parse_link_speed(&content);
                debug!(
                    "Interface '{}': speed file {:?} reads {:?} -> {} bit/s",
                    interface_name,
                    path,
                    content.trim(),
                    speed
                );
                speed
            }
            Err(e) => {
                debug!(
                    "Interface '{}': speed file {:?} unreadable ({}), assuming 0",
                    interface_name, path, e
                );
                0
            }
        }
    }

    fn read_table(&self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                let error = BandwidthError::SourceUnavailable {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                };
                log_degraded(&error, "Reading interface statistics");
                None
            }
        }
    }
}

impl CounterSource for ProcNetDevSource {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn read_counters(&self, filter: &InterfaceFilter) -> CounterSnapshot {
        let mut snapshot = CounterSnapshot::new();
        let path = self.net_dev_path();
        let Some(content) = self.read_table(&path) else {
            return snapshot;
        };

        let parsed = parse_net_dev(&content, filter);
        snapshot.skipped_lines = parsed.skipped_lines;

        for (name, rx_bytes, tx_bytes) in parsed.interfaces {
            let speed_bps = self.link_speed(&name);
            snapshot.insert(
                name,
                InterfaceCounters {
                    rx_bytes,
                    tx_bytes,
                    speed_bps,
                },
            );
        }

        debug!(
            "Read {} interfaces from {:?} (filter={}, skipped_lines={})",
            snapshot.len(),
            path,
            filter,
            snapshot.skipped_lines
        );
        snapshot
    }
}
