//! Package model definitions

use serde::{Deserialize, Serialize};

/// An application registered with the backend.
///
/// `token` is the package's API secret. The backend includes it in the
/// create response and list payloads may omit it; this client never asks
/// for it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Package {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            token: None,
        }
    }

    /// Set the one-time API token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_decodes_backend_payload() {
        let payload = r#"{ "_id": "p1", "name": "My App", "token": "secret" }"#;
        let package: Package = serde_json::from_str(payload).unwrap();
        assert_eq!(package.id, "p1");
        assert_eq!(package.name, "My App");
        assert_eq!(package.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_token_is_optional_in_lists() {
        let payload = r#"{ "_id": "p1", "name": "My App" }"#;
        let package: Package = serde_json::from_str(payload).unwrap();
        assert!(package.token.is_none());
    }
}
