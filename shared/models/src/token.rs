use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::digikey::TokenResponse;

/// OAuth2 access token as cached in memory and in the token storage file.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            token_type: response.token_type,
            expires_at: issued_at + Duration::seconds(response.expires_in),
        }
    }

    /// Still usable at `now`, leaving `skew` of headroom before expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        now + skew < self.expires_at
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token_type", &self.token_type)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: i64) -> TokenResponse {
        TokenResponse {
            access_token: "token".to_string(),
            refresh_token: Some(String::new()),
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }

    #[test]
    fn test_expiry_honours_skew() {
        let now = Utc::now();
        let token = AccessToken::from_response(response(1800), now);

        assert!(token.is_valid_at(now, Duration::seconds(60)));
        assert!(!token.is_valid_at(now + Duration::seconds(1750), Duration::seconds(60)));
    }

    #[test]
    fn test_empty_refresh_token_is_dropped() {
        let token = AccessToken::from_response(response(10), Utc::now());
        assert!(token.refresh_token.is_none());
        assert_eq!(token.authorization_header(), "Bearer token");
    }
}
