use serde_json::{json, Value};
use tracing::{info, warn};

use crate::client::{endpoint, error_message};
use crate::credentials::{id_to_string, CredentialStore};
use crate::error::AuthError;
use crate::types::Credentials;

/// One-time exchange of a logfire read token for a long-lived id + secret.
///
/// The gateway never prompts; token acquisition belongs to the caller.
pub struct AuthGateway {
    http: reqwest::Client,
    host_url: String,
    store: CredentialStore,
}

impl AuthGateway {
    pub fn new(host_url: impl Into<String>, store: CredentialStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            host_url: host_url.into(),
            store,
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub async fn authenticate(&self, read_token: &str) -> Result<Credentials, AuthError> {
        let read_token = read_token.trim();
        if read_token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        let url = endpoint(&self.host_url, &["logfire", "user"])?;
        info!("Creating user at {}", url);

        let response = self
            .http
            .post(url)
            .json(&json!({ "logfire_read_token": read_token }))
            .send()
            .await
            .map_err(AuthError::Transport)?;

        if !response.status().is_success() {
            let (status, message) = error_message(response).await;
            warn!("User creation rejected with {}: {}", status, message);
            return Err(AuthError::Rejected { status, message });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))?;

        let user_id = data
            .get("id")
            .and_then(id_to_string)
            .ok_or_else(|| AuthError::Parse("response is missing 'id'".to_string()))?;
        let secret = data
            .get("secret")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::Parse("response is missing 'secret'".to_string()))?
            .to_string();

        let credentials = self.store.save(Credentials {
            user_id,
            secret,
            webhook_url: String::new(),
        })?;

        info!("Created user {}", credentials.user_id);
        Ok(credentials)
    }
}
