//! Share link inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use locker_core::config::AppConfig;
use locker_core::error::AppError;
use locker_core::types::UserId;
use locker_database::ShareStore;
use locker_database::repositories::ShareRepository;
use locker_entity::share::ShareLink;

/// Arguments for share commands
#[derive(Debug, Args)]
pub struct ShareArgs {
    /// Share subcommand
    #[command(subcommand)]
    pub command: ShareCommand,
}

/// Share subcommands
#[derive(Debug, Subcommand)]
pub enum ShareCommand {
    /// List a user's share links
    List {
        /// Owning user
        #[arg(short, long)]
        user: UserId,
    },
}

/// Share display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ShareRow {
    /// Share ID
    id: String,
    /// Document key
    document: String,
    /// Public
    public: bool,
    /// Password protected
    password: bool,
    /// Expiry
    expires_at: String,
    /// Access count
    accesses: i32,
}

/// Execute share commands
pub async fn execute(
    args: &ShareArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = super::connect_db(config).await?;
    let shares = ShareRepository::new(db.pool().clone());

    match &args.command {
        ShareCommand::List { user } => {
            let links: Vec<ShareLink> = shares
                .list_for_user(*user)
                .await?
                .iter()
                .map(|s| ShareLink::new(s, config.share_link_base()))
                .collect();

            match format {
                OutputFormat::Json => output::print_json(&links),
                OutputFormat::Table => {
                    let rows: Vec<ShareRow> = links
                        .iter()
                        .map(|l| ShareRow {
                            id: l.share_id.to_string(),
                            document: l.document_path.clone(),
                            public: l.is_public,
                            password: l.is_password_protected,
                            expires_at: l
                                .expires_at
                                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                                .unwrap_or_else(|| "never".to_string()),
                            accesses: l.access_count,
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    db.close().await;
    Ok(())
}
