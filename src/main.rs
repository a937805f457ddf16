use std::env;
use std::process::ExitCode;

use applog::{Config, Logger, install_interrupt_handler};
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

fn parse_config_path() -> String {
    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = parse_config_path();

    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let logger = match Logger::init() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to install logger: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let log_file = match logger.configure(&config.log) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to configure logger: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Closes the log file on Ctrl+C or SIGTERM
    let mut shutdown = match install_interrupt_handler(logger.clone(), log_file) {
        Ok(shutdown) => shutdown,
        Err(e) => {
            eprintln!("Failed to install interrupt handler: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        app = %config.app.name,
        env = %config.app.env,
        config = %config_path,
        "Logger configured, waiting for interrupt"
    );

    shutdown.wait().await;

    debug!(logger = ?logger, "Exiting");
    ExitCode::SUCCESS
}
