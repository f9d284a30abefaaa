use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PartLookupError {
    #[error("Distributor credentials are not configured")]
    CredentialsMissing,

    #[error("Credential storage error: {message}")]
    CredentialStorage { message: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Lookup timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Vendor error: {status} - {message}")]
    Vendor { status: u16, message: String },

    #[error("Part not found: {part_number}")]
    NotFound { part_number: String },

    #[error("Malformed vendor response: {message}")]
    MalformedResponse { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PartLookupError {
    pub fn credential_storage(message: impl Into<String>) -> Self {
        Self::CredentialStorage {
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn vendor(status: u16, message: impl Into<String>) -> Self {
        Self::Vendor {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(part_number: impl Into<String>) -> Self {
        Self::NotFound {
            part_number: part_number.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CredentialsMissing => "CREDENTIALS_MISSING",
            Self::CredentialStorage { .. } => "CREDENTIAL_STORAGE_ERROR",
            Self::Authentication { .. } => "AUTHENTICATION_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Vendor { .. } => "VENDOR_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::CredentialsMissing => 503,
            Self::CredentialStorage { .. } => 500,
            Self::Authentication { .. } => 502,
            Self::Timeout { .. } => 504,
            Self::Network { .. } => 502,
            Self::Vendor { .. } => 502,
            Self::NotFound { .. } => 404,
            Self::MalformedResponse { .. } => 502,
            Self::Validation { .. } => 400,
            Self::Configuration { .. } => 500,
        }
    }

    /// Short label used for the `outcome` metric dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::CredentialsMissing | Self::CredentialStorage { .. } | Self::Configuration { .. } => {
                "not_configured"
            }
            Self::Timeout { .. } => "timeout",
            Self::NotFound { .. } => "not_found",
            Self::Validation { .. } => "invalid",
            Self::Authentication { .. }
            | Self::Network { .. }
            | Self::Vendor { .. }
            | Self::MalformedResponse { .. } => "vendor_error",
        }
    }
}

pub type PartLookupResult<T> = Result<T, PartLookupError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<PartLookupError> for ErrorResponse {
    fn from(error: PartLookupError) -> Self {
        Self {
            error: error.error_code().to_lowercase(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

// Conversion from common error types
impl From<reqwest::Error> for PartLookupError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::malformed(error.to_string())
        } else {
            Self::network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for PartLookupError {
    fn from(error: serde_json::Error) -> Self {
        Self::malformed(error.to_string())
    }
}

impl From<std::io::Error> for PartLookupError {
    fn from(error: std::io::Error) -> Self {
        Self::credential_storage(error.to_string())
    }
}
