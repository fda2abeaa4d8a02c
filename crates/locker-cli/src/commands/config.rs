//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use locker_core::config::AppConfig;
use locker_core::error::AppError;
use locker_database::connection::mask_password;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let masked = masked(config);
            match format {
                OutputFormat::Json => output::print_json(&masked),
                OutputFormat::Table => {
                    println!("Configuration from '{}':", config_path);
                    output::print_kv(
                        "Server",
                        &format!("{}:{}", masked.server.host, masked.server.port),
                    );
                    output::print_kv("Public URL", masked.server.base_url());
                    output::print_kv("Share links", masked.share_link_base());
                    output::print_kv("Database", &masked.database.url);
                    output::print_kv(
                        "Storage",
                        &format!("{:?} ({})", masked.storage.provider, masked.storage.bucket),
                    );
                    output::print_kv(
                        "Categorizer",
                        if masked.categorizer.enabled { "enabled" } else { "heuristics only" },
                    );
                    output::print_kv(
                        "Trash retention",
                        &format!("{} days", masked.trash.retention_days),
                    );
                    output::print_kv(
                        "Logging",
                        &format!("{} ({})", masked.logging.level, masked.logging.format),
                    );
                }
            }
        }
    }

    Ok(())
}

const MASK: &str = "****";

/// Copy of the configuration with every secret replaced.
fn masked(config: &AppConfig) -> AppConfig {
    let mut masked = config.clone();
    masked.database.url = mask_password(&config.database.url);
    masked.auth.jwt_secret = MASK.to_string();
    masked.storage.url_signing_secret = MASK.to_string();
    if !masked.storage.s3.secret_key.is_empty() {
        masked.storage.s3.secret_key = MASK.to_string();
    }
    if masked.categorizer.api_key.is_some() {
        masked.categorizer.api_key = Some(MASK.to_string());
    }
    masked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_are_masked() {
        let mut config = AppConfig::default();
        config.database.url = "postgres://locker:hunter2@db:5432/locker".to_string();
        config.categorizer.api_key = Some("sk-live".to_string());

        let masked = masked(&config);
        assert_eq!(masked.database.url, "postgres://locker:****@db:5432/locker");
        assert_eq!(masked.auth.jwt_secret, MASK);
        assert_eq!(masked.categorizer.api_key.as_deref(), Some(MASK));
        assert_eq!(masked.server.port, config.server.port);
    }
}
