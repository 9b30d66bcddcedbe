//! Probe configuration
//!
//! Settings are layered, lowest precedence first: built-in defaults, an
//! optional configuration file, `CHECK_BANDWIDTH_*` environment variables and
//! finally command-line flags. The merged result is validated once and frozen
//! into a [`CheckConfig`] that is passed explicitly to every component.

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::collectors::bandwidth::errors::BandwidthError;
use crate::collectors::bandwidth::formatting::UnitMode;
use crate::collectors::bandwidth::thresholds::{ThresholdConfig, ThresholdMode};
use crate::collectors::platform::InterfaceFilter;

/// Prefix of the environment variables read by the probe
pub const ENV_PREFIX: &str = "CHECK_BANDWIDTH";

pub const DEFAULT_WARNING: f64 = 50.0;
pub const DEFAULT_CRITICAL: f64 = 100.0;
pub const DEFAULT_SLEEP_SECS: u64 = 10;

/// Raw settings as merged from every source
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub warning: f64,
    pub critical: f64,
    pub sleep_secs: u64,
    pub interface: String,
    pub threshold_mode: ThresholdMode,
    pub bytes: bool,
    pub stats: bool,
    pub proc_root: PathBuf,
    pub sys_root: PathBuf,
}

/// Values given on the command line; `None` leaves lower layers in charge
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub warning: Option<f64>,
    pub critical: Option<f64>,
    pub sleep_secs: Option<u64>,
    pub interface: Option<String>,
    pub threshold_mode: Option<ThresholdMode>,
    pub bytes: bool,
    pub stats: bool,
}

/// Immutable configuration for one probe run
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    pub thresholds: ThresholdConfig,
    /// Unit used for display and performance data
    pub unit: UnitMode,
    /// Length of the measurement window
    pub sleep: Duration,
    pub filter: InterfaceFilter,
    /// Print the debug block after the report
    pub debug_stats: bool,
    pub proc_root: PathBuf,
    pub sys_root: PathBuf,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig {
                warning: DEFAULT_WARNING,
                critical: DEFAULT_CRITICAL,
                mode: ThresholdMode::PercentOfSpeed,
            },
            unit: UnitMode::Bits,
            sleep: Duration::from_secs(DEFAULT_SLEEP_SECS),
            filter: InterfaceFilter::All,
            debug_stats: false,
            proc_root: PathBuf::from("/proc"),
            sys_root: PathBuf::from("/sys"),
        }
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("warning", DEFAULT_WARNING)?
        .set_default("critical", DEFAULT_CRITICAL)?
        .set_default("sleep_secs", DEFAULT_SLEEP_SECS)?
        .set_default("interface", "all")?
        .set_default("threshold_mode", "percent")?
        .set_default("bytes", false)?
        .set_default("stats", false)?
        .set_default("proc_root", "/proc")?
        .set_default("sys_root", "/sys")?)
}

fn apply_overrides(
    builder: ConfigBuilder<DefaultState>,
    overrides: &ConfigOverrides,
) -> Result<ConfigBuilder<DefaultState>> {
    let mut builder = builder
        .set_override_option("warning", overrides.warning)?
        .set_override_option("critical", overrides.critical)?
        .set_override_option("sleep_secs", overrides.sleep_secs)?
        .set_override_option("interface", overrides.interface.clone())?
        .set_override_option(
            "threshold_mode",
            overrides.threshold_mode.map(threshold_mode_key),
        )?;

    // Flags can only switch a setting on
    if overrides.bytes {
        builder = builder.set_override("bytes", true)?;
    }
    if overrides.stats {
        builder = builder.set_override("stats", true)?;
    }
    Ok(builder)
}

fn threshold_mode_key(mode: ThresholdMode) -> &'static str {
    match mode {
        ThresholdMode::AbsoluteBytes => "bytes",
        ThresholdMode::AbsoluteBits => "bits",
        ThresholdMode::PercentOfSpeed => "percent",
    }
}

impl CheckConfig {
    /// Loads the configuration from every layer, reading the process environment
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        Self::load_with_environment(
            overrides,
            Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        )
    }

    /// Loads the configuration with an explicit environment layer
    pub fn load_with_environment(
        overrides: &ConfigOverrides,
        environment: Environment,
    ) -> Result<Self> {
        let mut builder = with_defaults()?;

        if let Some(path) = &overrides.config_file {
            debug!("Loading configuration file {:?}", path);
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        builder = builder.add_source(environment);
        builder = apply_overrides(builder, overrides)?;

        let merged: FileConfig = builder
            .build()
            .context("Failed to merge configuration sources")?
            .try_deserialize()
            .context("Failed to read configuration values")?;

        debug!("Merged configuration: {:?}", merged);
        Ok(Self::try_from(merged)?)
    }
}

impl TryFrom<FileConfig> for CheckConfig {
    type Error = BandwidthError;

    fn try_from(raw: FileConfig) -> Result<Self, Self::Error> {
        if !raw.warning.is_finite() || raw.warning < 0.0 {
            return Err(BandwidthError::InvalidConfig(format!(
                "warning limit must be a non-negative number, got {}",
                raw.warning
            )));
        }
        if !raw.critical.is_finite() || raw.critical < raw.warning {
            return Err(BandwidthError::InvalidConfig(format!(
                "critical limit ({}) must not be below the warning limit ({})",
                raw.critical, raw.warning
            )));
        }
        if raw.sleep_secs == 0 {
            return Err(BandwidthError::InvalidConfig(
                "sleep must be at least 1 second".to_string(),
            ));
        }

        Ok(CheckConfig {
            thresholds: ThresholdConfig {
                warning: raw.warning,
                critical: raw.critical,
                mode: raw.threshold_mode,
            },
            unit: if raw.bytes {
                UnitMode::Bytes
            } else {
                UnitMode::Bits
            },
            sleep: Duration::from_secs(raw.sleep_secs),
            filter: InterfaceFilter::from(raw.interface),
            debug_stats: raw.stats,
            proc_root: raw.proc_root,
            sys_root: raw.sys_root,
        })
    }
}
