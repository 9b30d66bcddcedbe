//! check_bandwidth - network interface throughput probe for monitoring frameworks
//!
//! The probe reads the interface counters twice, a sleep interval apart,
//! turns the difference into Rx/Tx rates and compares them against warning
//! and critical limits. The result is a single monitoring-plugin line with
//! performance data and an exit code of 0 (OK), 1 (WARNING), 2 (CRITICAL) or
//! 3 (UNKNOWN).

pub mod check;
pub mod cli;
pub mod collectors;
pub mod config;
