use serde::{Deserialize, Serialize};

/// Distributor API client credentials, stored as `{"client_id": .., "client_secret": ..}`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Both halves present and not blank.
    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_file_format() {
        let credentials = Credentials::new("abc", "xyz");
        let json = serde_json::to_value(&credentials).unwrap();
        assert_eq!(json, serde_json::json!({"client_id": "abc", "client_secret": "xyz"}));
    }

    #[test]
    fn test_blank_credentials_are_incomplete() {
        assert!(Credentials::new("abc", "xyz").is_complete());
        assert!(!Credentials::new("abc", "  ").is_complete());
        assert!(!Credentials::new("", "xyz").is_complete());
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", Credentials::new("abc", "xyz"));
        assert!(rendered.contains("abc"));
        assert!(!rendered.contains("xyz"));
    }
}
