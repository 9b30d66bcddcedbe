use std::path::Path;

use crate::collectors::bandwidth::stats::CounterSnapshot;

// Platform-specific interface counter readers
// Every reader degrades to an empty snapshot instead of failing, leaving the
// "no interfaces" decision to the report

/// Interface selection and loopback detection
pub mod interface_filter;

/// Linux reader backed by /proc/net/dev and /sys/class/net
#[cfg(target_os = "linux")]
pub mod linux;

/// Portable reader backed by the sysinfo crate
pub mod sysinfo_source;

pub use interface_filter::{InterfaceFilter, is_loopback};

/// A source of cumulative interface counters
pub trait CounterSource {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Reads the current counters of every interface matching the filter
    ///
    /// Never fails: an unreadable source yields an empty snapshot.
    fn read_counters(&self, filter: &InterfaceFilter) -> CounterSnapshot;
}

/// Creates the counter source for the current platform
///
/// `proc_root` and `sys_root` only apply to the Linux reader.
#[allow(unused_variables)]
pub fn create_counter_source(proc_root: &Path, sys_root: &Path) -> Box<dyn CounterSource> {
    #[cfg(target_os = "linux")]
    {
        Box::new(linux::ProcNetDevSource::with_roots(proc_root, sys_root))
    }

    #[cfg(not(target_os = "linux"))]
    {
        Box::new(sysinfo_source::SysinfoSource::new())
    }
}
