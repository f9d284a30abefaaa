//! # Semiconductor Part Lookup Domain Models
//!
//! Data structures shared by the part lookup service and its tooling.
//!
//! ## Key Models
//!
//! - **ProductDetails**: the distributor's product-details payload, read leniently
//! - **PartRecord**: the flat record handed back to callers
//! - **PartInfo**: a best-effort lookup result that is either empty or a `PartRecord`
//! - **Credentials**: distributor API client id and secret
//! - **AccessToken**: an OAuth2 bearer token with its expiry
//!
//! ## Leniency
//!
//! Vendor payload fields that do not have the expected shape are read as absent
//! instead of failing the whole document.

pub mod credentials;
pub mod digikey;
pub mod part;
pub mod token;

pub use credentials::*;
pub use digikey::*;
pub use part::*;
pub use token::*;
