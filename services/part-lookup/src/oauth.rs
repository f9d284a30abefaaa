//! OAuth2 token handling for the Digi-Key API.
//!
//! Tokens come from the two-legged `client_credentials` grant, or from the
//! `refresh_token` grant when a stored token carries a refresh token. The
//! current token is kept in memory and in `token_storage.json`.

use chrono::{Duration, Utc};
use reqwest::Client;
use semiconductor_models::{AccessToken, Credentials, TokenResponse};
use semiconductor_utils::{PartLookupError, PartLookupResult};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const TOKEN_PATH: &str = "/v1/oauth2/token";
const EXPIRY_SKEW_SECONDS: i64 = 60;

pub struct TokenManager {
    client: Client,
    token_url: String,
    storage_file: PathBuf,
    current: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    pub fn new(client: Client, base_url: &str, storage_file: impl Into<PathBuf>) -> Self {
        Self {
            client,
            token_url: format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH),
            storage_file: storage_file.into(),
            current: Mutex::new(None),
        }
    }

    /// A usable token, from memory, from storage, or freshly issued.
    pub async fn access_token(&self, credentials: &Credentials) -> PartLookupResult<AccessToken> {
        let mut current = self.current.lock().await;
        let skew = Duration::seconds(EXPIRY_SKEW_SECONDS);

        if current.is_none() {
            *current = self.load_stored().await;
        }

        if let Some(token) = current.as_ref() {
            if token.is_valid_at(Utc::now(), skew) {
                return Ok(token.clone());
            }
        }

        let refresh_token = current.as_ref().and_then(|t| t.refresh_token.clone());
        let token = match refresh_token {
            Some(refresh_token) => match self.refresh(credentials, &refresh_token).await {
                Ok(token) => token,
                Err(e) => {
                    warn!(error = %e, "Token refresh failed, requesting a new token");
                    self.client_credentials(credentials).await?
                }
            },
            None => self.client_credentials(credentials).await?,
        };

        self.store(&token).await;
        *current = Some(token.clone());
        Ok(token)
    }

    /// Drop the current token so the next call requests a new one.
    pub async fn invalidate(&self) {
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_mut() {
            token.expires_at = Utc::now();
        }
    }

    async fn client_credentials(&self, credentials: &Credentials) -> PartLookupResult<AccessToken> {
        debug!("Requesting client credentials token");
        self.request_token(&[
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ])
        .await
    }

    async fn refresh(&self, credentials: &Credentials, refresh_token: &str) -> PartLookupResult<AccessToken> {
        debug!("Refreshing access token");
        self.request_token(&[
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> PartLookupResult<AccessToken> {
        let issued_at = Utc::now();
        let response = self
            .client
            .post(&self.token_url)
            .header("Accept", "application/json")
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PartLookupError::authentication(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PartLookupError::authentication(format!("unreadable token response: {}", e)))?;

        info!("Obtained Digi-Key access token");
        Ok(AccessToken::from_response(token, issued_at))
    }

    async fn load_stored(&self) -> Option<AccessToken> {
        let contents = tokio::fs::read_to_string(&self.storage_file).await.ok()?;
        match serde_json::from_str(&contents) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(error = %e, path = %self.storage_file.display(), "Ignoring unreadable token storage");
                None
            }
        }
    }

    async fn store(&self, token: &AccessToken) {
        let result = async {
            if let Some(parent) = self.storage_file.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let contents = serde_json::to_string(token)?;
            tokio::fs::write(&self.storage_file, contents).await?;
            anyhow::Ok(())
        }
        .await;

        if let Err(e) = result {
            warn!(error = %e, path = %self.storage_file.display(), "Could not persist access token");
        }
    }
}
