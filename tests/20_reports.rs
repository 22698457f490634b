mod common;

use anyhow::Result;
use lert::client::{ReportClient, ReportSource};
use lert::types::{Credentials, ReportStatus};
use reqwest::StatusCode;

fn credentials() -> Credentials {
    Credentials {
        user_id: common::USER_ID.to_string(),
        secret: common::SECRET.to_string(),
        webhook_url: String::new(),
    }
}

#[tokio::test]
async fn lists_reports_with_basic_auth() -> Result<()> {
    let server = common::start_server().await?;
    server.backend.set_reports(vec![
        common::report(1, "alert-a", "pending", None),
        common::report(2, "alert-b", "success", Some("# Root cause\nDisk full")),
    ]);

    let client = ReportClient::new(server.base_url.as_str(), Some(credentials()));
    let reports = client.list_reports().await?;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].alert_id, "alert-a");
    assert_eq!(reports[0].status, ReportStatus::Pending);
    assert_eq!(reports[0].report, None);
    assert_eq!(reports[1].report.as_deref(), Some("# Root cause\nDisk full"));
    assert_eq!(server.backend.auth_headers(), vec![common::EXPECTED_AUTH.to_string()]);
    Ok(())
}

#[tokio::test]
async fn fetches_single_report_and_maps_404_to_none() -> Result<()> {
    let server = common::start_server().await?;
    server.backend.set_reports(vec![common::report(9, "alert-z", "running", None)]);
    let client = ReportClient::new(server.base_url.as_str(), Some(credentials()));

    let found = client.get_report("alert-z").await?.expect("report should exist");
    assert_eq!(found.id, 9);
    assert_eq!(found.status, ReportStatus::Running);

    assert_eq!(client.get_report("missing").await?, None);
    assert_eq!(server.backend.report_calls(), 2);
    Ok(())
}

#[tokio::test]
async fn unauthenticated_client_makes_no_requests() -> Result<()> {
    let server = common::start_server().await?;
    let client = ReportClient::new(server.base_url.as_str(), None);

    assert!(client.list_reports().await?.is_empty());
    assert_eq!(client.get_report("alert-a").await?, None);
    assert_eq!(server.backend.listing_calls(), 0);
    assert_eq!(server.backend.report_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn server_errors_are_network_errors() -> Result<()> {
    let server = common::start_server().await?;
    server.backend.fail_listing(StatusCode::INTERNAL_SERVER_ERROR);
    let client = ReportClient::new(server.base_url.as_str(), Some(credentials()));

    let err = client.list_reports().await.unwrap_err();
    assert!(err.is_network(), "got {err}");
    assert!(err.to_string().contains("upstream exploded"));
    Ok(())
}

#[tokio::test]
async fn wrong_secret_is_a_network_error() -> Result<()> {
    let server = common::start_server().await?;
    let mut creds = credentials();
    creds.secret = "wrong".to_string();
    let client = ReportClient::new(server.base_url.as_str(), Some(creds));

    let err = client.list_reports().await.unwrap_err();
    assert!(err.is_network());
    assert!(err.to_string().contains("Bad credentials"));
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() -> Result<()> {
    let server = common::start_server().await?;
    server.backend.malformed_listing();
    let client = ReportClient::new(server.base_url.as_str(), Some(credentials()));

    let err = client.list_reports().await.unwrap_err();
    assert!(err.is_parse(), "got {err}");
    assert!(!err.is_network());
    Ok(())
}
