//! One complete probe run: measure, classify, render

use chrono::Local;
use log::{error, info, warn};
use std::time::Instant;

use crate::collectors::bandwidth::BandwidthCollector;
use crate::collectors::bandwidth::reporting::{DebugStats, Report, build_report};
use crate::collectors::platform::{CounterSource, create_counter_source};
use crate::config::CheckConfig;

/// Result of a probe run, ready to be printed
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub report: Report,
    /// Present when debug stats were requested
    pub debug_stats: Option<DebugStats>,
}

impl CheckOutcome {
    /// Everything the probe writes to stdout
    pub fn output(&self) -> String {
        let mut output = self.report.output.clone();
        if let Some(stats) = &self.debug_stats {
            output.push_str(&stats.render());
        }
        output
    }

    pub fn exit_code(&self) -> i32 {
        self.report.exit_code()
    }
}

/// Runs the probe against the counter source of the current platform
pub async fn run(config: &CheckConfig) -> CheckOutcome {
    let source = create_counter_source(&config.proc_root, &config.sys_root);
    run_with_source(config, source).await
}

/// Runs the probe against an explicit counter source
pub async fn run_with_source(config: &CheckConfig, source: Box<dyn CounterSource>) -> CheckOutcome {
    let start = Local::now();
    let started = Instant::now();

    let mut collector = BandwidthCollector::new(source, config.filter.clone(), config.sleep);
    let measurement = collector.measure().await;

    if measurement.skipped_lines() > 0 {
        warn!(
            "{} statistics lines could not be parsed and were skipped",
            measurement.skipped_lines()
        );
    }

    let (report, devices) = match measurement.deltas() {
        Ok(records) => (
            build_report(&records, &config.thresholds, config.unit),
            records.len(),
        ),
        Err(e) => {
            error!("Unable to compute interface rates: {}", e);
            (Report::unknown(&e.to_string()), 0)
        }
    };

    info!(
        "Check finished with {} across {} interfaces",
        report.status, devices
    );

    let debug_stats = config.debug_stats.then(|| DebugStats {
        start,
        elapsed: started.elapsed(),
        sleep: config.sleep,
        devices,
    });

    CheckOutcome {
        report,
        debug_stats,
    }
}
