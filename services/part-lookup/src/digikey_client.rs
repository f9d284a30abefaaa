//! Digi-Key API Client
//!
//! Client for the Digi-Key Product Information V3 product-details endpoint.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use semiconductor_models::{AccessToken, Credentials, ProductDetails};
use semiconductor_utils::{DigiKeyConfig, PartLookupError, PartLookupResult};
use tracing::{debug, warn};

use crate::oauth::TokenManager;

/// Source of product details for a distributor part number.
#[async_trait]
pub trait PartSupplier: Send + Sync {
    async fn product_details(
        &self,
        credentials: &Credentials,
        part_number: &str,
    ) -> PartLookupResult<ProductDetails>;
}

/// Digi-Key API client
pub struct DigiKeyClient {
    client: Client,
    base_url: String,
    locale_site: String,
    locale_language: String,
    locale_currency: String,
    tokens: TokenManager,
}

impl DigiKeyClient {
    pub fn new(config: &DigiKeyConfig) -> PartLookupResult<Self> {
        let client = Client::builder()
            .timeout(config.lookup_timeout())
            .user_agent(concat!("semiconductor-part-lookup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PartLookupError::configuration(format!("failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url();
        Url::parse(&base_url)
            .map_err(|e| PartLookupError::configuration(format!("invalid API URL {}: {}", base_url, e)))?;

        Ok(Self {
            tokens: TokenManager::new(client.clone(), &base_url, config.token_file()),
            client,
            base_url,
            locale_site: config.locale_site.clone(),
            locale_language: config.locale_language.clone(),
            locale_currency: config.locale_currency.clone(),
        })
    }

    fn product_url(&self, part_number: &str) -> PartLookupResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PartLookupError::configuration(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| PartLookupError::configuration(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["Search", "v3", "Products", part_number]);
        Ok(url)
    }

    async fn send(
        &self,
        credentials: &Credentials,
        token: &AccessToken,
        part_number: &str,
    ) -> PartLookupResult<Response> {
        let url = self.product_url(part_number)?;
        debug!(%url, "Querying Digi-Key product details");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("Authorization", token.authorization_header())
            .header("X-DIGIKEY-Client-Id", &credentials.client_id)
            .header("X-DIGIKEY-Locale-Site", &self.locale_site)
            .header("X-DIGIKEY-Locale-Language", &self.locale_language)
            .header("X-DIGIKEY-Locale-Currency", &self.locale_currency)
            .send()
            .await?;

        Ok(response)
    }
}

#[async_trait]
impl PartSupplier for DigiKeyClient {
    async fn product_details(
        &self,
        credentials: &Credentials,
        part_number: &str,
    ) -> PartLookupResult<ProductDetails> {
        let token = self.tokens.access_token(credentials).await?;
        let mut response = self.send(credentials, &token, part_number).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("Access token rejected, retrying with a new token");
            self.tokens.invalidate().await;
            let token = self.tokens.access_token(credentials).await?;
            response = self.send(credentials, &token, part_number).await?;
        }

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(PartLookupError::not_found(part_number)),
            StatusCode::UNAUTHORIZED => {
                let body = response.text().await.unwrap_or_default();
                return Err(PartLookupError::authentication(body));
            }
            _ if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(PartLookupError::vendor(status.as_u16(), body));
            }
            _ => {}
        }

        let body = response.text().await?;
        let details: ProductDetails = serde_json::from_str(&body)?;
        Ok(details)
    }
}
