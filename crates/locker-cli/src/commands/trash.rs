//! Trash inspection and purge commands.

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use locker_core::config::AppConfig;
use locker_core::error::AppError;
use locker_core::types::UserId;
use locker_database::repositories::{FolderRepository, ShareRepository, TrashRepository};
use locker_service::{RequestContext, TrashService};
use locker_storage::build_provider;

/// Arguments for trash commands
#[derive(Debug, Args)]
pub struct TrashArgs {
    /// Trash subcommand
    #[command(subcommand)]
    pub command: TrashCommand,
}

/// Trash subcommands
#[derive(Debug, Subcommand)]
pub enum TrashCommand {
    /// List a user's trashed documents
    List {
        /// Owning user
        #[arg(short, long)]
        user: UserId,
    },
    /// Permanently delete trash entries older than a number of days
    Purge {
        /// Owning user
        #[arg(short, long)]
        user: UserId,
        /// Age threshold; defaults to the configured retention
        #[arg(short, long)]
        days: Option<u32>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Trash display row for table output
#[derive(Debug, Serialize, Tabled)]
struct TrashRow {
    /// Marker ID
    id: String,
    /// Display name
    name: String,
    /// Category
    category: String,
    /// Size in bytes
    size: u64,
    /// Whether the object still exists
    available: bool,
    /// Deleted at
    deleted_at: String,
}

/// Execute trash commands
pub async fn execute(
    args: &TrashArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect_db(config).await?;
    let storage = build_provider(&config.storage, config.server.base_url()).await?;
    let trash = TrashService::new(
        storage,
        Arc::new(TrashRepository::new(db.pool().clone())),
        Arc::new(ShareRepository::new(db.pool().clone())),
        Arc::new(FolderRepository::new(db.pool().clone())),
        Duration::from_secs(config.storage.signed_url_ttl_seconds),
        config.trash.retention_days,
    );

    match &args.command {
        TrashCommand::List { user } => {
            let items = trash.list_trashed(&cli_context(*user)).await?;
            let rows: Vec<TrashRow> = items
                .iter()
                .map(|t| TrashRow {
                    id: t.id.to_string(),
                    name: t.display_name.clone(),
                    category: t.category.to_string(),
                    size: t.size,
                    available: t.available,
                    deleted_at: t.deleted_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        TrashCommand::Purge { user, days, yes } => {
            let days = days.unwrap_or(config.trash.retention_days);
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Permanently delete trash entries older than {days} days for {user}?"
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let outcome = trash.purge(&cli_context(*user), Some(days)).await?;
            match format {
                OutputFormat::Json => output::print_json(&outcome),
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "Purged {} trash entries",
                        outcome.value.purged
                    ));
                    output::print_kv("Cutoff", &outcome.value.cutoff.to_rfc3339());
                    output::print_kv(
                        "Objects removed",
                        &outcome.value.objects_removed.to_string(),
                    );
                    for advisory in &outcome.advisories {
                        output::print_warning(&format!("{}: {}", advisory.step, advisory.message));
                    }
                }
            }
        }
    }

    db.close().await;
    Ok(())
}

fn cli_context(user: UserId) -> RequestContext {
    RequestContext::new(user, None, "cli".to_string(), Some("locker-cli".to_string()))
}
