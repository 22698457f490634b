use crate::cli::utils::{format_report_table, output_error};
use crate::cli::{Context, OutputFormat};
use crate::client::{ReportClient, ReportSource};
use crate::error::AlreadyReported;

fn authenticated_client(ctx: &Context) -> anyhow::Result<ReportClient> {
    let credentials = ctx
        .store
        .load()
        .ok_or_else(|| anyhow::anyhow!("Not authenticated. Run `lert auth login` first."))?;
    Ok(ReportClient::new(ctx.config.api.host_url.clone(), Some(credentials)))
}

pub async fn list(ctx: &Context) -> anyhow::Result<()> {
    let client = authenticated_client(ctx)?;
    let reports = client.list_reports().await?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text if reports.is_empty() => println!("No investigations yet"),
        OutputFormat::Text => print!("{}", format_report_table(&reports)),
    }
    Ok(())
}

pub async fn show(alert_id: &str, ctx: &Context) -> anyhow::Result<()> {
    let client = authenticated_client(ctx)?;

    let Some(report) = client.get_report(alert_id).await? else {
        let message = format!("No investigation report for alert '{}'", alert_id);
        output_error(&ctx.output_format, &message, Some("NOT_FOUND"))?;
        return Err(AlreadyReported(message).into());
    };

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Alert ID: {}", report.alert_id);
            println!("Status: {}", report.status);
            println!("ID: {}", report.id);
            println!();
            println!("{}", report.report.as_deref().unwrap_or("No report available"));
        }
    }
    Ok(())
}
