use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::PersistenceError;

pub const DEFAULT_HOST_URL: &str = "http://localhost:8000";
pub const CREDENTIALS_FILE: &str = "credentials.json";
pub const LOG_FILE: &str = "lert.log";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub polling: PollingConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// None means "resolve from HOME at use time"
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub notice_ttl_secs: u64,
    pub max_notices: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host_url: DEFAULT_HOST_URL.to_string(),
            },
            storage: StorageConfig { config_dir: None },
            polling: PollingConfig { interval_secs: 5 },
            dashboard: DashboardConfig {
                notice_ttl_secs: 4,
                max_notices: 5,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("LERT_HOST_URL") {
            self.api.host_url = normalize_host_url(&v).unwrap_or(self.api.host_url);
        }
        if let Ok(v) = env::var("LERT_CONFIG_DIR") {
            if !v.trim().is_empty() {
                self.storage.config_dir = Some(PathBuf::from(v));
            }
        }
        if let Ok(v) = env::var("LERT_POLL_INTERVAL_SECS") {
            self.polling.interval_secs = v.parse().unwrap_or(self.polling.interval_secs);
        }
        if let Ok(v) = env::var("LERT_NOTICE_TTL_SECS") {
            self.dashboard.notice_ttl_secs = v.parse().unwrap_or(self.dashboard.notice_ttl_secs);
        }

        self
    }

    /// Apply per-invocation overrides (command line flags).
    pub fn with_overrides(mut self, host_url: Option<&str>, config_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        if let Some(url) = host_url {
            self.api.host_url = normalize_host_url(url)
                .ok_or_else(|| anyhow::anyhow!("Invalid host URL: {}", url))?;
        }
        if let Some(dir) = config_dir {
            self.storage.config_dir = Some(dir);
        }
        Ok(self)
    }

    pub fn poll_interval(&self) -> Duration {
        // Zero would make tokio's interval panic
        Duration::from_secs(self.polling.interval_secs.max(1))
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.dashboard.notice_ttl_secs)
    }

    pub fn config_dir(&self) -> Result<PathBuf, PersistenceError> {
        match &self.storage.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let home = env::var("HOME").map_err(|_| PersistenceError::MissingHome)?;
                Ok(PathBuf::from(home).join(".lert"))
            }
        }
    }
}

/// Validate a base URL and strip any trailing slash.
pub fn normalize_host_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).ok()?;
    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    Some(trimmed.to_string())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.host_url, DEFAULT_HOST_URL);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert!(config.storage.config_dir.is_none());
    }

    #[test]
    fn test_host_url_normalization() {
        assert_eq!(
            normalize_host_url("https://alerts.example.com/"),
            Some("https://alerts.example.com".to_string())
        );
        assert_eq!(normalize_host_url("not a url"), None);
        assert_eq!(normalize_host_url("ftp://example.com"), None);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default()
            .with_overrides(Some("http://127.0.0.1:9000/"), Some(PathBuf::from("/tmp/lert")))
            .unwrap();
        assert_eq!(config.api.host_url, "http://127.0.0.1:9000");
        assert_eq!(config.config_dir().unwrap(), PathBuf::from("/tmp/lert"));

        assert!(AppConfig::default().with_overrides(Some("nope"), None).is_err());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut config = AppConfig::default();
        config.polling.interval_secs = 0;
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
