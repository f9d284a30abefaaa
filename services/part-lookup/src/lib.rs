//! Semiconductor Part Lookup Service
//!
//! Fetches component metadata from the Digi-Key product-details API and serves
//! it as flat JSON records.

pub mod credentials;
pub mod digikey_client;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod normalize;
pub mod oauth;
pub mod routes;
pub mod service;

pub use credentials::{CredentialProvider, CredentialResolver, CredentialStore, NoCredentialProvider, TerminalPrompt};
pub use digikey_client::{DigiKeyClient, PartSupplier};
pub use routes::create_app;
pub use service::PartLookupAdapter;

#[derive(Clone)]
pub struct AppState {
    pub adapter: PartLookupAdapter,
}
