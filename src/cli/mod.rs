pub mod commands;
pub mod prompt;
pub mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::{self, AppConfig, LOG_FILE};
use crate::credentials::CredentialStore;
use crate::logging::{self, LogTarget};

#[derive(Parser)]
#[command(name = "lert")]
#[command(about = "Lert - watch automated investigation reports for triggered alerts")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Backend base URL (overrides LERT_HOST_URL)")]
    pub host_url: Option<String>,

    #[arg(long, global = true, help = "Credential directory (overrides LERT_CONFIG_DIR)")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Set up credentials if needed, then open the dashboard (default)")]
    Dashboard,

    #[command(about = "Credential setup and inspection")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "List investigation reports once and exit")]
    Reports,

    #[command(about = "Show a single investigation report")]
    Report {
        #[arg(help = "Alert ID")]
        alert_id: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Resolved settings shared by every command handler
pub struct Context {
    pub config: AppConfig,
    pub store: CredentialStore,
    pub output_format: OutputFormat,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config = config::config()
            .clone()
            .with_overrides(cli.host_url.as_deref(), cli.config_dir.clone())?;
        let store = CredentialStore::new(config.config_dir()?, config.api.host_url.clone());

        Ok(Self {
            config,
            store,
            output_format: OutputFormat::from_cli(cli),
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::from_cli(&cli)?;

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => {
            logging::init(LogTarget::File(ctx.config.config_dir()?.join(LOG_FILE)))?;
            commands::dashboard::handle(&ctx).await
        }
        Commands::Auth { cmd } => {
            logging::init(LogTarget::Stderr)?;
            commands::auth::handle(cmd, &ctx).await
        }
        Commands::Reports => {
            logging::init(LogTarget::Stderr)?;
            commands::reports::list(&ctx).await
        }
        Commands::Report { alert_id } => {
            logging::init(LogTarget::Stderr)?;
            commands::reports::show(&alert_id, &ctx).await
        }
    }
}
