#![cfg(target_os = "linux")]

use check_bandwidth::check::{self, CheckOutcome};
use check_bandwidth::collectors::bandwidth::{
    CounterSnapshot, Status, ThresholdConfig, ThresholdMode, UnitMode,
};
use check_bandwidth::collectors::platform::linux::ProcNetDevSource;
use check_bandwidth::collectors::platform::{CounterSource, InterfaceFilter};
use check_bandwidth::config::CheckConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Integration tests for complete probe runs
/// These tests drive the procfs reader against temporary proc and sys trees

const HEADER: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
";

fn net_dev(rows: &[(&str, u64, u64)]) -> String {
    let mut content = String::from(HEADER);
    for (name, rx_bytes, tx_bytes) in rows {
        content.push_str(&format!(
            "{:>6}: {} 10 0 0 0 0 0 0 {} 10 0 0 0 0 0 0\n",
            name, rx_bytes, tx_bytes
        ));
    }
    content
}

struct Fixture {
    _dir: TempDir,
    proc_root: PathBuf,
    sys_root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let proc_root = dir.path().join("proc");
        let sys_root = dir.path().join("sys");
        fs::create_dir_all(proc_root.join("net")).unwrap();
        fs::create_dir_all(sys_root.join("class").join("net")).unwrap();
        Self {
            _dir: dir,
            proc_root,
            sys_root,
        }
    }

    fn net_dev_path(&self) -> PathBuf {
        self.proc_root.join("net").join("dev")
    }

    fn write_net_dev(&self, content: &str) {
        fs::write(self.net_dev_path(), content).unwrap();
    }

    fn write_speed(&self, interface_name: &str, speed: &str) {
        let dir = self.sys_root.join("class").join("net").join(interface_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("speed"), speed).unwrap();
    }

    fn config(&self, thresholds: ThresholdConfig) -> CheckConfig {
        CheckConfig {
            thresholds,
            sleep: Duration::from_millis(100),
            proc_root: self.proc_root.clone(),
            sys_root: self.sys_root.clone(),
            ..CheckConfig::default()
        }
    }

    /// Source that replaces /proc/net/dev with the next table after every read
    fn source(&self, later: Vec<String>) -> Box<dyn CounterSource> {
        Box::new(RewritingSource {
            inner: ProcNetDevSource::with_roots(&self.proc_root, &self.sys_root),
            path: self.net_dev_path(),
            later: Mutex::new(later),
        })
    }
}

struct RewritingSource {
    inner: ProcNetDevSource,
    path: PathBuf,
    later: Mutex<Vec<String>>,
}

impl CounterSource for RewritingSource {
    fn name(&self) -> &'static str {
        "rewriting"
    }

    fn read_counters(&self, filter: &InterfaceFilter) -> CounterSnapshot {
        let snapshot = self.inner.read_counters(filter);
        let mut later = self.later.lock().unwrap();
        if !later.is_empty() {
            write_table(&self.path, &later.remove(0));
        }
        snapshot
    }
}

fn write_table(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn absolute_bytes(warning: f64, critical: f64) -> ThresholdConfig {
    ThresholdConfig {
        warning,
        critical,
        mode: ThresholdMode::AbsoluteBytes,
    }
}

async fn run(fixture: &Fixture, config: &CheckConfig, second: String) -> CheckOutcome {
    check::run_with_source(config, fixture.source(vec![second])).await
}

#[tokio::test]
async fn test_idle_interfaces_are_ok() {
    let fixture = Fixture::new();
    let table = net_dev(&[("eth0", 1000, 2000), ("eth1", 5000, 6000)]);
    fixture.write_net_dev(&table);

    let config = fixture.config(absolute_bytes(1.0, 2.0));
    let outcome = run(&fixture, &config, table).await;

    assert_eq!(outcome.report.status, Status::Ok);
    assert_eq!(outcome.exit_code(), 0);
    assert!(outcome.report.output.starts_with(
        "BANDWIDTH OK: eth0(Rx 0.00bit/s Tx 0.00bit/s) eth1(Rx 0.00bit/s Tx 0.00bit/s);|"
    ));
    assert!(outcome.report.output.contains("eth0_Rx=0.00b/s;8;16;;"));
    assert!(outcome.debug_stats.is_none());
}

#[tokio::test]
async fn test_traffic_above_warning_limit() {
    let fixture = Fixture::new();
    fixture.write_net_dev(&net_dev(&[("eth0", 0, 0)]));

    // At most 1 MB over at least 100ms stays below 10 MB/s
    let config = fixture.config(absolute_bytes(1.0, 1e12));
    let outcome = run(&fixture, &config, net_dev(&[("eth0", 1_000_000, 0)])).await;

    assert_eq!(outcome.report.status, Status::Warning);
    assert_eq!(outcome.exit_code(), 1);
    assert!(outcome.report.output.starts_with("BANDWIDTH WARNING: eth0(Rx "));
}

#[tokio::test]
async fn test_percent_mode_uses_speed_file() {
    let fixture = Fixture::new();
    fixture.write_net_dev(&net_dev(&[("eth0", 0, 0), ("eth1", 0, 0)]));
    fixture.write_speed("eth0", "10\n");
    fixture.write_speed("eth1", "10000\n");

    let config = fixture.config(ThresholdConfig {
        warning: 50.0,
        critical: 100.0,
        mode: ThresholdMode::PercentOfSpeed,
    });
    // 10 MB in roughly 100ms is far above a 10 Mbit/s link and far below 10 Gbit/s
    let outcome = run(
        &fixture,
        &config,
        net_dev(&[("eth0", 10_000_000, 0), ("eth1", 0, 10_000_000)]),
    )
    .await;

    assert_eq!(outcome.report.status, Status::Critical);
    assert_eq!(outcome.exit_code(), 2);
    assert!(outcome.report.output.contains(";5000000;10000000;;"));
    assert!(outcome.report.output.contains(";5000000000;10000000000;;"));
}

#[tokio::test]
async fn test_unknown_speed_in_percent_mode_is_critical_on_any_traffic() {
    let fixture = Fixture::new();
    fixture.write_net_dev(&net_dev(&[("tun0", 0, 0)]));
    fixture.write_speed("tun0", "-1\n");

    let config = fixture.config(ThresholdConfig {
        warning: 50.0,
        critical: 100.0,
        mode: ThresholdMode::PercentOfSpeed,
    });
    let outcome = run(&fixture, &config, net_dev(&[("tun0", 1, 0)])).await;

    assert_eq!(outcome.report.status, Status::Critical);
    assert!(outcome.report.output.contains("tun0_Rx="));
    assert!(outcome.report.output.contains(";0;0;;"));
}

#[tokio::test]
async fn test_loopback_is_never_reported() {
    let fixture = Fixture::new();
    fixture.write_net_dev(&net_dev(&[("lo", 0, 0), ("eth0", 0, 0)]));

    let config = fixture.config(absolute_bytes(1.0, 2.0));
    let outcome = run(
        &fixture,
        &config,
        net_dev(&[("lo", 999_999_999, 999_999_999), ("eth0", 0, 0)]),
    )
    .await;

    assert_eq!(outcome.report.status, Status::Ok);
    assert!(!outcome.report.output.contains("lo("));
    assert!(!outcome.report.output.contains("lo_Rx"));
}

#[tokio::test]
async fn test_named_interface_filter() {
    let fixture = Fixture::new();
    fixture.write_net_dev(&net_dev(&[("eth0", 0, 0), ("eth1", 0, 0)]));

    let mut config = fixture.config(absolute_bytes(1.0, 1e12));
    config.filter = InterfaceFilter::Named("eth1".to_string());
    let outcome = run(
        &fixture,
        &config,
        net_dev(&[("eth0", 500_000, 0), ("eth1", 0, 0)]),
    )
    .await;

    assert_eq!(outcome.report.status, Status::Ok);
    assert!(outcome.report.output.contains("eth1(Rx"));
    assert!(!outcome.report.output.contains("eth0"));
}

#[tokio::test]
async fn test_filter_without_match_is_unknown() {
    let fixture = Fixture::new();
    let table = net_dev(&[("eth0", 0, 0)]);
    fixture.write_net_dev(&table);

    let mut config = fixture.config(absolute_bytes(1.0, 2.0));
    config.filter = InterfaceFilter::Named("wlan9".to_string());
    let outcome = run(&fixture, &config, table).await;

    assert_eq!(outcome.report.status, Status::Unknown);
    assert_eq!(outcome.exit_code(), 3);
    assert_eq!(
        outcome.report.output,
        "BANDWIDTH UNKNOWN: Unable to determine network interfaces.\n"
    );
}

#[tokio::test]
async fn test_missing_statistics_file_is_unknown() {
    let fixture = Fixture::new();
    let config = fixture.config(absolute_bytes(1.0, 2.0));

    let outcome = check::run(&config).await;
    assert_eq!(outcome.report.status, Status::Unknown);
    assert_eq!(outcome.exit_code(), 3);
}

#[tokio::test]
async fn test_malformed_line_does_not_hide_other_interfaces() {
    let fixture = Fixture::new();
    let mut table = net_dev(&[("eth0", 0, 0)]);
    table.push_str("  bad0: not numbers at all\n");
    table.push_str(&net_dev(&[("eth1", 0, 0)])[HEADER.len()..]);
    fixture.write_net_dev(&table);

    let config = fixture.config(absolute_bytes(1.0, 2.0));
    let outcome = run(&fixture, &config, table).await;

    assert_eq!(outcome.report.status, Status::Ok);
    assert!(outcome.report.output.contains("eth0(Rx"));
    assert!(outcome.report.output.contains("eth1(Rx"));
    assert!(!outcome.report.output.contains("bad0"));
}

#[tokio::test]
async fn test_byte_units_and_debug_stats() {
    let fixture = Fixture::new();
    let table = net_dev(&[("eth0", 0, 0)]);
    fixture.write_net_dev(&table);

    let mut config = fixture.config(ThresholdConfig {
        warning: 800.0,
        critical: 1600.0,
        mode: ThresholdMode::AbsoluteBits,
    });
    config.unit = UnitMode::Bytes;
    config.debug_stats = true;
    let outcome = run(&fixture, &config, table).await;

    assert!(outcome.report.output.contains("eth0(Rx 0.00Byte/s Tx 0.00Byte/s)"));
    assert!(outcome.report.output.contains("eth0_Rx=0.00B/s;100;200;;"));

    let stats = outcome.debug_stats.as_ref().unwrap();
    assert_eq!(stats.devices, 1);
    assert_eq!(stats.sleep, Duration::from_millis(100));
    assert!(stats.elapsed >= stats.sleep);

    let output = outcome.output();
    assert!(output.starts_with(&outcome.report.output));
    assert!(output.contains("\n   Devices: 1\n"));
}
