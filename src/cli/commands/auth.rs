use clap::Subcommand;
use serde_json::json;

use crate::auth::AuthGateway;
use crate::cli::prompt::prompt_for_read_token;
use crate::cli::utils::{output_error, output_success};
use crate::cli::Context;
use crate::error::AlreadyReported;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Exchange a logfire read token for new credentials")]
    Login {
        #[arg(long, help = "Read token (will prompt if not provided)")]
        token: Option<String>,
    },

    #[command(about = "Show the stored user id and webhook URL")]
    Status,

    #[command(about = "Delete stored credentials so the next start re-authenticates")]
    Logout,
}

pub async fn handle(cmd: AuthCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { token } => {
            let token = match token {
                Some(token) => token,
                None => prompt_for_read_token(&mut std::io::stdin().lock(), &mut std::io::stdout())?,
            };

            let gateway = AuthGateway::new(ctx.config.api.host_url.clone(), ctx.store.clone());
            let credentials = gateway
                .authenticate(&token)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

            output_success(
                &ctx.output_format,
                &format!("User created successfully! User ID: {}", credentials.user_id),
                Some(json!({
                    "id": credentials.user_id,
                    "webhook_url": credentials.webhook_url,
                })),
            )
        }
        AuthCommands::Status => match ctx.store.load() {
            Some(credentials) => output_success(
                &ctx.output_format,
                &format!(
                    "User ID: {} | Webhook URL: {} (stored in {})",
                    credentials.user_id,
                    credentials.webhook_url,
                    ctx.store.path().display()
                ),
                Some(json!({
                    "id": credentials.user_id,
                    "webhook_url": credentials.webhook_url,
                    "path": ctx.store.path(),
                })),
            ),
            None => {
                output_error(&ctx.output_format, "Not authenticated", Some("UNAUTHENTICATED"))?;
                Err(AlreadyReported("Not authenticated".to_string()).into())
            }
        },
        AuthCommands::Logout => {
            let removed = ctx.store.delete()?;
            let message = if removed {
                format!("Removed {}", ctx.store.path().display())
            } else {
                "No stored credentials".to_string()
            };
            output_success(&ctx.output_format, &message, Some(json!({ "removed": removed })))
        }
    }
}
