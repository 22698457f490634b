use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::types::InvestigationReport;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Plain text table of reports, one per line
pub fn format_report_table(reports: &[InvestigationReport]) -> String {
    let alert_width = reports
        .iter()
        .map(|r| r.alert_id.chars().count())
        .chain(std::iter::once("Alert ID".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<width$}  {:<10}  {}\n", "Alert ID", "Status", "ID", width = alert_width);
    for report in reports {
        out.push_str(&format!(
            "{:<width$}  {:<10}  {}\n",
            report.alert_id,
            report.status.as_str(),
            report.id,
            width = alert_width
        ));
    }
    out
}
