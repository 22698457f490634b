use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::CREDENTIALS_FILE;
use crate::error::PersistenceError;
use crate::types::Credentials;

/// Local persistence for the {id, secret, webhook_url} record.
///
/// No networking happens here; the store only knows the backend base URL so it
/// can derive the webhook URL handed to the user.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    config_dir: PathBuf,
    host_url: String,
}

impl CredentialStore {
    pub fn new(config_dir: impl Into<PathBuf>, host_url: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
            host_url: host_url.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.config_dir.join(CREDENTIALS_FILE)
    }

    pub fn webhook_url(&self, secret: &str) -> String {
        format!("{}/logfire/{}", self.host_url, secret)
    }

    /// Read the persisted record. Missing, unreadable or incomplete files all
    /// come back as `None` so the caller falls through to re-authentication.
    pub fn load(&self) -> Option<Credentials> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No credentials at {}: {}", path.display(), e);
                return None;
            }
        };

        let data: Value = match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                warn!("Ignoring unparseable credential file {}: {}", path.display(), e);
                return None;
            }
        };

        let user_id = data.get("id").and_then(id_to_string)?;
        let secret = data.get("secret").and_then(Value::as_str)?.to_string();
        let webhook_url = data
            .get("webhook_url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.webhook_url(&secret));

        let credentials = Credentials { user_id, secret, webhook_url };
        if !credentials.is_complete() {
            warn!("Credential file {} lacks id or secret", path.display());
            return None;
        }
        Some(credentials)
    }

    /// Write the record, replacing whatever was there. The webhook URL is
    /// always re-derived from the secret.
    pub fn save(&self, credentials: Credentials) -> Result<Credentials, PersistenceError> {
        create_private_dir(&self.config_dir)?;

        let credentials = Credentials {
            webhook_url: self.webhook_url(&credentials.secret),
            ..credentials
        };

        let content = serde_json::to_string_pretty(&credentials)?;
        write_private(&self.path(), &content)?;
        info!("Saved credentials for user {} to {}", credentials.user_id, self.path().display());
        Ok(credentials)
    }

    /// Remove the record. Returns whether a file was actually deleted.
    pub fn delete(&self) -> Result<bool, PersistenceError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// The backend sends ids as strings or bare numbers.
pub(crate) fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Create `dir` if needed and restrict it to the owner, even when something
/// else (the log file) created it first.
#[cfg(unix)]
pub(crate) fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)?;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
pub(crate) fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private(path: &Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(content.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)
}
