//! Tasklist Backend Binary
//!
//! Reads configuration from the environment, then serves the account API
//! on BIND_ADDR (default 0.0.0.0:8080).
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match tsk_server::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = tsk_core::log(settings.level()) {
        eprintln!("failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }
    match tsk_server::run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("server failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
