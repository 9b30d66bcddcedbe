use anyhow::Result;
use clap::Parser;
use log::{debug, error};
use std::io::Write;
use std::process;

use check_bandwidth::check;
use check_bandwidth::cli::{Cli, version_info};
use check_bandwidth::collectors::bandwidth::{Report, Status};
use check_bandwidth::config::CheckConfig;

fn init_logging(stats: bool) {
    let default_filter = if stats { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn emit(output: &str, exit_code: i32) -> ! {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(output.as_bytes());
    let _ = stdout.flush();
    process::exit(exit_code)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors are UNKNOWN to a monitoring framework; help is not an error
            let code = if e.use_stderr() {
                Status::Unknown.exit_code()
            } else {
                0
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(cli.stats);

    if cli.version {
        emit(&version_info(), 0);
    }

    let config = match CheckConfig::load(&cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            let report = Report::unknown(&format!("{:#}", e));
            emit(&report.output, report.exit_code());
        }
    };
    debug!("Effective configuration: {:?}", config);

    let outcome = check::run(&config).await;
    emit(&outcome.output(), outcome.exit_code())
}
