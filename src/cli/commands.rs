use clap::Parser;
use std::path::PathBuf;

use crate::collectors::bandwidth::thresholds::ThresholdMode;
use crate::config::ConfigOverrides;

/// Main CLI structure for the check_bandwidth probe
/// Uses clap's derive macros for automatic CLI generation
#[derive(Parser, Debug)]
#[command(author = "Kaipo Chen")]
#[command(disable_version_flag = true)]
#[command(about = "Bandwidth check for monitoring frameworks - measures interface throughput and reports OK/WARNING/CRITICAL")]
#[command(long_about = "Samples the network interface counters, waits for the sleep interval, samples again \
and compares the measured Rx/Tx rates against warning and critical limits. Limits are a percentage of each \
interface's link speed by default, or absolute byte/bit rates.\n\n\
Exit codes: 0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN.\n\n\
Examples:\n  \
check_bandwidth                                  # 50%/100% of link speed on all interfaces, 10s window\n  \
check_bandwidth -i eth0 -w 70 -c 90 -s 5         # Single interface, 5 second window\n  \
check_bandwidth -m bytes -w 5000000 -c 10000000  # Absolute limits in bytes per second\n  \
check_bandwidth -B -S                            # Display bytes and print runtime stats")]
pub struct Cli {
    /// Warning limit, a percentage of link speed or an absolute rate
    #[arg(short = 'w', long, help = "Warning limit (percentage of link speed, or rate for -m bytes/bits) [default: 50]")]
    pub warning: Option<f64>,

    /// Critical limit, a percentage of link speed or an absolute rate
    #[arg(short = 'c', long, help = "Critical limit (percentage of link speed, or rate for -m bytes/bits) [default: 100]")]
    pub critical: Option<f64>,

    /// Length of the measurement window in seconds
    #[arg(
        short = 's',
        long = "sleep",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Sleep time between the two samples in seconds [default: 10]"
    )]
    pub sleep_secs: Option<u64>,

    /// Interface to measure, or `all` / `*` for every non-loopback interface
    #[arg(short = 'i', long, help = "Interface name, or 'all' for every interface [default: all]")]
    pub interface: Option<String>,

    /// How the warning and critical limits are interpreted
    #[arg(short = 'm', long, value_enum, help = "Threshold mode [default: percent]")]
    pub threshold_mode: Option<ThresholdMode>,

    /// Display rates in bytes instead of bits
    #[arg(short = 'B', long, help = "Switch to using bytes, default is bits")]
    pub bytes: bool,

    /// Print runtime stats after the report and enable debug logging
    #[arg(short = 'S', long, help = "Runtime stats for debugging")]
    pub stats: bool,

    /// Print version and build information
    #[arg(short = 'v', long, help = "Version information")]
    pub version: bool,

    /// Optional configuration file (TOML, YAML, JSON or INI)
    #[arg(long, value_name = "FILE", help = "Configuration file")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Command-line values that take precedence over file and environment settings
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            warning: self.warning,
            critical: self.critical,
            sleep_secs: self.sleep_secs,
            interface: self.interface.clone(),
            threshold_mode: self.threshold_mode,
            bytes: self.bytes,
            stats: self.stats,
        }
    }
}

/// Version and build metadata, one right-aligned line per field
pub fn version_info() -> String {
    format!(
        "{:>10}: {}\n{:>10}: {}\n{:>10}: {}\n",
        "VERSION",
        env!("CARGO_PKG_VERSION"),
        "GITHASH",
        option_env!("CHECK_BANDWIDTH_GITHASH").unwrap_or("unknown"),
        "BUILD DATE",
        option_env!("CHECK_BANDWIDTH_BUILD_DATE").unwrap_or("unknown"),
    )
}
