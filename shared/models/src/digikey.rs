//! Digi-Key Product Information V3 wire types.
//!
//! Every field is optional and read leniently: a field whose JSON shape does not
//! match is treated as absent, so one odd field never discards the whole product.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// Product details returned by `GET /Search/v3/Products/{partNumber}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ProductDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub product_description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub detailed_description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub digi_key_part_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub manufacturer: Option<PidVid>,
    #[serde(default, deserialize_with = "lenient")]
    pub manufacturer_part_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub product_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub primary_datasheet: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub primary_photo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub standard_pricing: Option<Vec<PriceBreak>>,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity_available: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub limited_taxonomy: Option<LimitedTaxonomy>,
    #[serde(default, deserialize_with = "lenient")]
    pub parameters: Option<Vec<PidVid>>,
}

impl ProductDetails {
    /// No recognized field was present in the payload.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parameter id / value id pair, used for manufacturers and product parameters.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PidVid {
    #[serde(default, deserialize_with = "lenient")]
    pub parameter_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub value_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub parameter: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
}

impl PidVid {
    pub fn named(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter: Some(parameter.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn value_only(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Category node of the vendor taxonomy; the first child is the subcategory.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LimitedTaxonomy {
    #[serde(default, deserialize_with = "lenient")]
    pub parameter: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub product_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub children: Option<Vec<LimitedTaxonomy>>,
}

/// One quantity break of the standard price list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct PriceBreak {
    #[serde(default, alias = "break_quantity")]
    pub break_quantity: i64,
    #[serde(default, alias = "unit_price")]
    pub unit_price: f64,
    #[serde(default, alias = "total_price")]
    pub total_price: f64,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_expires_in() -> i64 {
    1800
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
