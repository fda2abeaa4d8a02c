//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod serve;
pub mod share;
pub mod trash;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use locker_core::config::AppConfig;
use locker_core::error::AppError;
use locker_database::DatabasePool;

/// Document locker administration
#[derive(Debug, Parser)]
#[command(name = "locker", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file; `{env}.toml` next to it is layered on top
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Configuration environment
    #[arg(short, long, env = "LOCKER_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Inspect and purge a user's trash
    Trash(trash::TrashArgs),
    /// Inspect a user's share links
    Share(share::ShareArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Commands {
    /// Whether this is the long-running server command.
    pub fn is_serve(&self) -> bool {
        matches!(self, Self::Serve(_))
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Trash(args) => trash::execute(args, &config, self.format).await,
            Commands::Share(args) => share::execute(args, &config, self.format).await,
            Commands::Config(args) => config::execute(args, &config, &self.config, self.format),
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }
}

/// Helper: connect to the configured database
pub async fn connect_db(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
