//! Document locker server.
//!
//! Loads configuration, initializes logging, and hands over to
//! [`locker_api::run_server`].

use tracing_subscriber::{EnvFilter, fmt};

use locker_core::config::{AppConfig, LoggingConfig};
use locker_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = locker_api::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load `LOCKER_CONFIG` (default `config/default.toml`), the
/// `LOCKER_ENV` overlay next to it, and `LOCKER__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("LOCKER_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("LOCKER_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load_from(&config_path, &env)
}

/// Initialize tracing/logging. `RUST_LOG` wins over the configured level.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
