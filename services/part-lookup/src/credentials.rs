//! Credential chain
//!
//! Distributor credentials come from configuration first, then from the
//! credential file in the storage directory, then from an injected
//! [`CredentialProvider`]. Anything not read from the file is written back to it.

use async_trait::async_trait;
use semiconductor_models::Credentials;
use semiconductor_utils::{DigiKeyConfig, PartLookupError, PartLookupResult};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Supplies credentials when neither configuration nor the credential file has them.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolve credentials or fail with `CredentialsMissing`.
    async fn resolve(&self) -> PartLookupResult<Credentials>;
}

/// Provider for non-interactive deployments.
#[derive(Debug, Clone, Default)]
pub struct NoCredentialProvider;

#[async_trait]
impl CredentialProvider for NoCredentialProvider {
    async fn resolve(&self) -> PartLookupResult<Credentials> {
        Err(PartLookupError::CredentialsMissing)
    }
}

/// Asks for the client id and secret on the controlling terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompt;

#[async_trait]
impl CredentialProvider for TerminalPrompt {
    async fn resolve(&self) -> PartLookupResult<Credentials> {
        let prompted = tokio::task::spawn_blocking(|| {
            let stdin = std::io::stdin();
            let stderr = std::io::stderr();
            read_credentials(&mut stdin.lock(), &mut stderr.lock())
        })
        .await
        .map_err(|e| PartLookupError::credential_storage(format!("prompt task failed: {}", e)))??;

        prompted.ok_or(PartLookupError::CredentialsMissing)
    }
}

/// Reads a client id and secret, one per line. Blank answers yield `None`.
pub fn read_credentials<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> std::io::Result<Option<Credentials>> {
    writeln!(output, "Digi-Key credentials are not configured. Please provide them.")?;

    write!(output, "Digi-Key Client ID: ")?;
    output.flush()?;
    let mut client_id = String::new();
    input.read_line(&mut client_id)?;

    write!(output, "Digi-Key Client Secret: ")?;
    output.flush()?;
    let mut client_secret = String::new();
    input.read_line(&mut client_secret)?;

    let credentials = Credentials::new(client_id.trim(), client_secret.trim());
    Ok(credentials.is_complete().then_some(credentials))
}

/// JSON credential file inside the storage directory.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist yet.
    pub async fn load(&self) -> PartLookupResult<Option<Credentials>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let credentials: Credentials = serde_json::from_str(&contents).map_err(|e| {
            PartLookupError::credential_storage(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(Some(credentials))
    }

    pub async fn save(&self, credentials: &Credentials) -> PartLookupResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(credentials)
            .map_err(|e| PartLookupError::credential_storage(e.to_string()))?;
        tokio::fs::write(&self.path, contents).await?;

        info!("Stored Digi-Key credentials into {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Configuration,
    File,
    Provider,
}

/// Runs the credential chain once and remembers the answer.
pub struct CredentialResolver {
    configured: Option<Credentials>,
    store: CredentialStore,
    provider: Arc<dyn CredentialProvider>,
    resolved: RwLock<Option<Credentials>>,
}

impl CredentialResolver {
    pub fn new(
        configured: Option<Credentials>,
        store: CredentialStore,
        provider: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            configured,
            store,
            provider,
            resolved: RwLock::new(None),
        }
    }

    pub fn from_config(config: &DigiKeyConfig, provider: Arc<dyn CredentialProvider>) -> Self {
        Self::new(
            config.configured_credentials(),
            CredentialStore::new(config.credentials_file()),
            provider,
        )
    }

    pub async fn resolve(&self) -> PartLookupResult<Credentials> {
        if let Some(credentials) = self.resolved.read().await.as_ref() {
            return Ok(credentials.clone());
        }

        let mut resolved = self.resolved.write().await;
        if let Some(credentials) = resolved.as_ref() {
            return Ok(credentials.clone());
        }

        let (credentials, source) = self.run_chain().await?;
        debug!(client_id = %credentials.client_id, ?source, "Resolved distributor credentials");

        if source != CredentialSource::File {
            if let Err(e) = self.store.save(&credentials).await {
                warn!(error = %e, path = %self.store.path().display(), "Could not persist credentials");
            }
        }

        *resolved = Some(credentials.clone());
        Ok(credentials)
    }

    async fn run_chain(&self) -> PartLookupResult<(Credentials, CredentialSource)> {
        if let Some(credentials) = &self.configured {
            return Ok((credentials.clone(), CredentialSource::Configuration));
        }

        match self.store.load().await {
            Ok(Some(credentials)) if credentials.is_complete() => {
                return Ok((credentials, CredentialSource::File));
            }
            Ok(Some(_)) => warn!(
                path = %self.store.path().display(),
                "Stored credentials are incomplete"
            ),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Stored credentials could not be read"),
        }

        let credentials = self.provider.resolve().await?;
        if !credentials.is_complete() {
            return Err(PartLookupError::CredentialsMissing);
        }
        Ok((credentials, CredentialSource::Provider))
    }
}
