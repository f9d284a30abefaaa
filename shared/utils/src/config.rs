use config::{Config, ConfigError, Environment, File};
use semiconductor_models::Credentials;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DIGIKEY_PRODUCTION_URL: &str = "https://api.digikey.com";
pub const DIGIKEY_SANDBOX_URL: &str = "https://sandbox-api.digikey.com";

pub const CREDENTIALS_FILE_NAME: &str = "digikey_credentials.json";
pub const TOKEN_FILE_NAME: &str = "token_storage.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub digikey: DigiKeyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigiKeyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub storage_path: PathBuf,
    /// Overrides the production/sandbox base URL when set.
    pub api_url: Option<String>,
    pub sandbox: bool,
    pub locale_site: String,
    pub locale_language: String,
    pub locale_currency: String,
    pub lookup_timeout_seconds: u64,
    /// Prompt on the terminal when no credentials are configured or stored.
    pub interactive_credentials: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("PARTLOOKUP").separator("__"))
            // The distributor variables keep their historical names
            .set_override_option("digikey.client_id", non_blank_var("DIGIKEY_CLIENT_ID"))?
            .set_override_option("digikey.client_secret", non_blank_var("DIGIKEY_CLIENT_SECRET"))?
            .set_override_option("digikey.storage_path", non_blank_var("DIGIKEY_STORAGE_PATH"))?;

        config.build()?.try_deserialize()
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl DigiKeyConfig {
    pub fn base_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.sandbox => DIGIKEY_SANDBOX_URL.to_string(),
            None => DIGIKEY_PRODUCTION_URL.to_string(),
        }
    }

    /// Credentials supplied directly through configuration, if both halves are present.
    pub fn configured_credentials(&self) -> Option<Credentials> {
        let client_id = self.client_id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let client_secret = self.client_secret.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some(Credentials::new(client_id, client_secret))
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.storage_path.join(CREDENTIALS_FILE_NAME)
    }

    pub fn token_file(&self) -> PathBuf {
        self.storage_path.join(TOKEN_FILE_NAME)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_seconds)
    }
}

impl std::fmt::Debug for DigiKeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigiKeyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("storage_path", &self.storage_path)
            .field("api_url", &self.api_url)
            .field("sandbox", &self.sandbox)
            .field("locale_site", &self.locale_site)
            .field("locale_language", &self.locale_language)
            .field("locale_currency", &self.locale_currency)
            .field("lookup_timeout_seconds", &self.lookup_timeout_seconds)
            .field("interactive_credentials", &self.interactive_credentials)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_request_size: 64 * 1024,
        }
    }
}

impl Default for DigiKeyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            storage_path: PathBuf::from("storage"),
            api_url: None,
            sandbox: false,
            locale_site: "US".to_string(),
            locale_language: "en".to_string(),
            locale_currency: "USD".to_string(),
            lookup_timeout_seconds: 20,
            interactive_credentials: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file_path: None,
        }
    }
}
