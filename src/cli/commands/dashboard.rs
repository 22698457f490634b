use std::io::{BufRead, Write};

use crate::auth::AuthGateway;
use crate::cli::prompt::prompt_for_read_token;
use crate::cli::Context;
use crate::dashboard;
use crate::types::Credentials;

/// First-run setup: reuse stored credentials, otherwise prompt for a read
/// token and run the handshake. Any failure here is fatal.
pub async fn setup_user_if_needed<R: BufRead, W: Write>(
    gateway: &AuthGateway,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<Credentials> {
    if let Some(credentials) = gateway.store().load() {
        writeln!(output, "✓ Existing credentials found. Starting application...")?;
        return Ok(credentials);
    }

    writeln!(output, "Setting up user credentials for first time...")?;
    let token = prompt_for_read_token(input, output)
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;
    let credentials = gateway
        .authenticate(&token)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    writeln!(output, "✓ User created successfully! User ID: {}", credentials.user_id)?;
    writeln!(output, "Webhook URL: {}", credentials.webhook_url)?;
    writeln!(output, "Starting application...")?;
    Ok(credentials)
}

pub async fn handle(ctx: &Context) -> anyhow::Result<()> {
    let gateway = AuthGateway::new(ctx.config.api.host_url.clone(), ctx.store.clone());
    setup_user_if_needed(&gateway, &mut std::io::stdin().lock(), &mut std::io::stdout()).await?;

    dashboard::run(&ctx.config, &ctx.store).await
}
