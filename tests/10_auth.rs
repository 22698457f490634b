mod common;

use std::io::Cursor;

use anyhow::Result;
use lert::auth::AuthGateway;
use lert::cli::commands::dashboard::setup_user_if_needed;
use lert::credentials::CredentialStore;
use lert::error::AuthError;
use reqwest::StatusCode;
use tempfile::TempDir;

fn gateway(base_url: &str, dir: &TempDir) -> AuthGateway {
    AuthGateway::new(base_url, CredentialStore::new(dir.path().join(".lert"), base_url))
}

#[tokio::test]
async fn handshake_persists_minted_identity() -> Result<()> {
    let server = common::start_server().await?;
    let dir = TempDir::new()?;
    let gateway = gateway(&server.base_url, &dir);

    let credentials = gateway.authenticate("tok-123").await?;
    assert_eq!(server.backend.tokens(), vec!["tok-123".to_string()]);
    assert_eq!(credentials.user_id, "7");
    assert_eq!(credentials.secret, "s3cr3t");

    let loaded = gateway.store().load().expect("credentials should be persisted");
    assert_eq!(loaded.user_id, "7");
    assert_eq!(loaded.secret, "s3cr3t");
    assert!(loaded.webhook_url.ends_with("/logfire/s3cr3t"));
    assert_eq!(loaded.webhook_url, format!("{}/logfire/s3cr3t", server.base_url));

    // The file uses the documented field names
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(gateway.store().path())?)?;
    assert_eq!(raw["id"], "7");
    assert_eq!(raw["secret"], "s3cr3t");
    assert!(raw["webhook_url"].is_string());
    Ok(())
}

#[tokio::test]
async fn rejected_token_surfaces_backend_message() -> Result<()> {
    let server = common::start_server().await?;
    let dir = TempDir::new()?;
    let gateway = gateway(&server.base_url, &dir);

    let err = gateway.authenticate("bad-token").await.unwrap_err();
    match err {
        AuthError::Rejected { status, message } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "Invalid read token");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(gateway.store().load(), None);
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("free port");
    let base_url = format!("http://127.0.0.1:{}", port);
    let dir = TempDir::new()?;

    let err = gateway(&base_url, &dir).authenticate("tok-123").await.unwrap_err();
    assert!(matches!(err, AuthError::Transport(_)), "got {err}");
    Ok(())
}

#[tokio::test]
async fn first_run_setup_prompts_then_authenticates() -> Result<()> {
    let server = common::start_server().await?;
    let dir = TempDir::new()?;
    let gateway = gateway(&server.base_url, &dir);

    let mut input = Cursor::new(b"\ny\ntok-123\n".to_vec());
    let mut output = Vec::new();
    let credentials = setup_user_if_needed(&gateway, &mut input, &mut output).await?;
    assert_eq!(credentials.user_id, "7");

    let printed = String::from_utf8(output)?;
    assert!(printed.contains("Token cannot be empty"));
    assert!(printed.contains("User created successfully! User ID: 7"));

    // Second start reuses the stored record without another handshake
    let mut output = Vec::new();
    setup_user_if_needed(&gateway, &mut Cursor::new(Vec::new()), &mut output).await?;
    assert!(String::from_utf8(output)?.contains("Existing credentials found"));
    assert_eq!(server.backend.tokens().len(), 1);
    Ok(())
}

#[tokio::test]
async fn first_run_setup_fails_when_token_declined() -> Result<()> {
    let server = common::start_server().await?;
    let dir = TempDir::new()?;
    let gateway = gateway(&server.base_url, &dir);

    let mut input = Cursor::new(b"\nn\n".to_vec());
    let err = setup_user_if_needed(&gateway, &mut input, &mut Vec::new()).await.unwrap_err();
    assert!(err.to_string().starts_with("Failed to create user"));
    assert!(server.backend.tokens().is_empty());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn dashboard_startup_keeps_credentials_private() -> Result<()> {
    use lert::config::LOG_FILE;
    use lert::logging::{self, LogTarget};
    use std::os::unix::fs::PermissionsExt;

    let server = common::start_server().await?;
    let dir = TempDir::new()?;
    let config_dir = dir.path().join(".lert");

    // The dashboard opens its log file in the config dir before first-run setup
    logging::init(LogTarget::File(config_dir.join(LOG_FILE)))?;
    let gateway = gateway(&server.base_url, &dir);
    gateway.authenticate("tok-123").await?;

    let dir_mode = std::fs::metadata(&config_dir)?.permissions().mode();
    assert_eq!(dir_mode & 0o777, 0o700);
    let file_mode = std::fs::metadata(gateway.store().path())?.permissions().mode();
    assert_eq!(file_mode & 0o777, 0o600);
    Ok(())
}
