use std::process::ExitCode;

use modalmask_demo::config::Config;
use modalmask_demo::{logging, report};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_settings());

    tracing::debug!(?config, "demo configuration loaded");

    let report = match report::run(&config) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "demo run failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize report");
            ExitCode::FAILURE
        }
    }
}
