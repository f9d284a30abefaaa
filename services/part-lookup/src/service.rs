//! Part Lookup Service
//!
//! Resolves distributor credentials, runs one time-bounded product lookup and
//! flattens the answer into a [`PartRecord`].

use semiconductor_models::{PartInfo, PartRecord};
use semiconductor_utils::{DigiKeyConfig, PartLookupError, PartLookupResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use crate::credentials::{CredentialProvider, CredentialResolver};
use crate::digikey_client::{DigiKeyClient, PartSupplier};
use crate::metrics;
use crate::normalize;

#[derive(Clone)]
pub struct PartLookupAdapter {
    credentials: Arc<CredentialResolver>,
    supplier: Arc<dyn PartSupplier>,
    timeout: Duration,
}

impl PartLookupAdapter {
    /// Adapter backed by the Digi-Key API.
    pub fn new(config: &DigiKeyConfig, provider: Arc<dyn CredentialProvider>) -> PartLookupResult<Self> {
        let client = DigiKeyClient::new(config)?;
        Ok(Self::with_supplier(config, provider, Arc::new(client)))
    }

    pub fn with_supplier(
        config: &DigiKeyConfig,
        provider: Arc<dyn CredentialProvider>,
        supplier: Arc<dyn PartSupplier>,
    ) -> Self {
        Self {
            credentials: Arc::new(CredentialResolver::from_config(config, provider)),
            supplier,
            timeout: config.lookup_timeout(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Look up a part, reporting why it failed.
    pub async fn lookup(&self, part_number: &str) -> PartLookupResult<PartRecord> {
        let credentials = self.credentials.resolve().await?;

        let details = tokio::time::timeout(
            self.timeout,
            self.supplier.product_details(&credentials, part_number),
        )
        .await
        .map_err(|_| PartLookupError::Timeout {
            millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
        })??;

        if details.is_empty() {
            return Err(PartLookupError::not_found(part_number));
        }

        Ok(normalize::part_record(details))
    }

    /// Best-effort lookup: any failure yields an empty result.
    #[instrument(skip(self))]
    pub async fn fetch_part_info(&self, part_number: &str) -> PartInfo {
        let started = Instant::now();
        let result = self.lookup(part_number).await;
        let elapsed = started.elapsed().as_secs_f64();

        match result {
            Ok(record) => {
                metrics::record_lookup("found", elapsed);
                info!(parameters = record.parameters.len(), "Part lookup succeeded");
                PartInfo::found(record)
            }
            Err(e) => {
                metrics::record_lookup(e.outcome(), elapsed);
                warn!(error = %e, code = e.error_code(), "Part lookup failed");
                PartInfo::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialStore, NoCredentialProvider};
    use async_trait::async_trait;
    use semiconductor_models::{Credentials, LimitedTaxonomy, PidVid, ProductDetails};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct FakeSupplier {
        details: Mutex<Option<ProductDetails>>,
        delay: Option<Duration>,
        calls: AtomicUsize,
        seen: Mutex<Vec<Credentials>>,
    }

    impl FakeSupplier {
        fn returning(details: ProductDetails) -> Arc<Self> {
            Arc::new(Self {
                details: Mutex::new(Some(details)),
                delay: None,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                details: Mutex::new(Some(ProductDetails::default())),
                delay: Some(delay),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PartSupplier for FakeSupplier {
        async fn product_details(
            &self,
            credentials: &Credentials,
            part_number: &str,
        ) -> PartLookupResult<ProductDetails> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(credentials.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.details
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| PartLookupError::not_found(part_number))
        }
    }

    struct PromptOnce {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CredentialProvider for PromptOnce {
        async fn resolve(&self) -> PartLookupResult<Credentials> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Credentials::new("prompted-id", "prompted-secret"))
        }
    }

    fn config(dir: &TempDir, with_credentials: bool) -> DigiKeyConfig {
        DigiKeyConfig {
            client_id: with_credentials.then(|| "id".to_string()),
            client_secret: with_credentials.then(|| "secret".to_string()),
            storage_path: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    fn resistor() -> ProductDetails {
        ProductDetails {
            product_description: Some("RES 10K OHM 5% 1/16W 0402".to_string()),
            digi_key_part_number: Some("RMCF0402JT10K0CT-ND".to_string()),
            manufacturer: Some(PidVid::value_only("Acme")),
            limited_taxonomy: Some(LimitedTaxonomy {
                value: Some("Resistors".to_string()),
                children: Some(vec![LimitedTaxonomy {
                    value: Some("Chip Resistor - Surface Mount".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            parameters: Some(vec![PidVid::named("Resistance", "10k")]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_the_network() {
        let dir = TempDir::new().unwrap();
        let supplier = FakeSupplier::returning(resistor());
        let adapter = PartLookupAdapter::with_supplier(
            &config(&dir, false),
            Arc::new(NoCredentialProvider),
            supplier.clone(),
        );

        let info = adapter.fetch_part_info("RMCF0402JT10K0").await;

        assert!(info.is_empty());
        assert_eq!(serde_json::to_value(&info).unwrap(), json!({}));
        assert_eq!(supplier.calls(), 0);
        assert_eq!(
            adapter.lookup("RMCF0402JT10K0").await.unwrap_err(),
            PartLookupError::CredentialsMissing
        );
    }

    #[tokio::test]
    async fn test_successful_lookup_is_flattened() {
        let dir = TempDir::new().unwrap();
        let supplier = FakeSupplier::returning(resistor());
        let adapter = PartLookupAdapter::with_supplier(
            &config(&dir, true),
            Arc::new(NoCredentialProvider),
            supplier.clone(),
        );

        let value = serde_json::to_value(adapter.fetch_part_info("RMCF0402JT10K0").await).unwrap();

        assert_eq!(
            value,
            json!({
                "product_description": "RES 10K OHM 5% 1/16W 0402",
                "digi_key_part_number": "RMCF0402JT10K0CT-ND",
                "manufacturer": "Acme",
                "category": "Resistors",
                "subcategory": "Chip Resistor - Surface Mount",
                "parameters": {"Resistance": "10k"}
            })
        );
        assert_eq!(supplier.seen.lock().unwrap()[0], Credentials::new("id", "secret"));
    }

    #[tokio::test]
    async fn test_missing_taxonomy_gives_empty_categories() {
        let dir = TempDir::new().unwrap();
        let details = ProductDetails {
            limited_taxonomy: None,
            ..resistor()
        };
        let adapter = PartLookupAdapter::with_supplier(
            &config(&dir, true),
            Arc::new(NoCredentialProvider),
            FakeSupplier::returning(details),
        );

        let record = adapter.lookup("RMCF0402JT10K0").await.unwrap();

        assert_eq!(record.category, "");
        assert_eq!(record.subcategory, "");
        assert_eq!(record.manufacturer.as_deref(), Some("Acme"));
        assert_eq!(record.parameters["Resistance"], "10k");
    }

    #[tokio::test]
    async fn test_slow_vendor_times_out() {
        let dir = TempDir::new().unwrap();
        let adapter = PartLookupAdapter::with_supplier(
            &config(&dir, true),
            Arc::new(NoCredentialProvider),
            FakeSupplier::slow(Duration::from_secs(5)),
        )
        .timeout(Duration::from_millis(50));

        let started = Instant::now();
        assert!(adapter.fetch_part_info("SLOW-PART").await.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));

        let error = adapter.lookup("SLOW-PART").await.unwrap_err();
        assert_eq!(error.error_code(), "TIMEOUT");
        assert_eq!(error, PartLookupError::Timeout { millis: 50 });
        assert_eq!(error.to_string(), "Lookup timed out after 50ms");
    }

    #[tokio::test]
    async fn test_empty_vendor_payload_is_not_found() {
        let dir = TempDir::new().unwrap();
        let adapter = PartLookupAdapter::with_supplier(
            &config(&dir, true),
            Arc::new(NoCredentialProvider),
            FakeSupplier::returning(ProductDetails::default()),
        );

        let error = adapter.lookup("").await.unwrap_err();
        assert_eq!(error, PartLookupError::not_found(""));
        assert!(adapter.fetch_part_info("").await.is_empty());
    }

    #[tokio::test]
    async fn test_prompted_credentials_survive_restart() {
        let dir = TempDir::new().unwrap();
        let prompt = Arc::new(PromptOnce {
            calls: AtomicUsize::new(0),
        });

        let first = PartLookupAdapter::with_supplier(
            &config(&dir, false),
            prompt.clone(),
            FakeSupplier::returning(resistor()),
        );
        assert!(!first.fetch_part_info("RMCF0402JT10K0").await.is_empty());
        assert_eq!(prompt.calls.load(Ordering::SeqCst), 1);

        let supplier = FakeSupplier::returning(resistor());
        let second = PartLookupAdapter::with_supplier(
            &config(&dir, false),
            prompt.clone(),
            supplier.clone(),
        );
        assert!(!second.fetch_part_info("RMCF0402JT10K0").await.is_empty());

        assert_eq!(prompt.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            supplier.seen.lock().unwrap()[0],
            Credentials::new("prompted-id", "prompted-secret")
        );
        let stored = CredentialStore::new(dir.path().join("digikey_credentials.json"))
            .load()
            .await
            .unwrap();
        assert_eq!(stored, Some(Credentials::new("prompted-id", "prompted-secret")));
    }
}
