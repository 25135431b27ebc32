//! Typed client for the license backend API
//!
//! One method per endpoint, all bearer-authenticated except login. Each
//! call is fire-once: a failure is mapped onto [`ClientError`] and the
//! caller decides whether to re-invoke.

use reqwest::Client;
use tracing::{debug, info};

use keyrack_core::key::{DurationType, Key};
use keyrack_core::package::Package;

use crate::error::ClientError;
use crate::wire::{
    Ack, CreateKeyRequest, CreatePackageRequest, Envelope, KeyListResponse, LoginRequest,
    LoginResponse,
};
use crate::Result;

/// Parameters for generating a batch of keys
#[derive(Debug, Clone)]
pub struct CreateKeySpec {
    pub package_id: String,
    pub prefix: String,
    pub quantity: u32,
    pub duration: u32,
    pub duration_type: DurationType,
    pub multi_activation: bool,
    pub max_activations: u32,
}

impl CreateKeySpec {
    /// Reject empty or non-positive fields before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.package_id.trim().is_empty() {
            return Err(ClientError::validation("package id is required"));
        }
        if self.prefix.trim().is_empty() {
            return Err(ClientError::validation("key prefix is required"));
        }
        if self.quantity == 0 {
            return Err(ClientError::validation("quantity must be positive"));
        }
        if self.duration == 0 {
            return Err(ClientError::validation("duration must be positive"));
        }
        if self.multi_activation && self.max_activations == 0 {
            return Err(ClientError::validation("max activations must be positive"));
        }
        Ok(())
    }

    /// Single-activation keys always carry a bound of 1.
    fn effective_max_activations(&self) -> u32 {
        if self.multi_activation {
            self.max_activations
        } else {
            1
        }
    }
}

/// HTTP client for the backend's admin endpoints
pub struct Catalog {
    http: Client,
    base_url: String,
}

impl Catalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/auth/login`; returns the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        info!(username, "logging in to {}", self.base_url);
        let res = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let body: LoginResponse = res.json().await?;
        match body.token {
            Some(token) => Ok(token),
            None => Err(ClientError::Auth(
                body.message
                    .unwrap_or_else(|| "invalid username or password".to_string()),
            )),
        }
    }

    /// `GET /api/packages/list`
    pub async fn load_packages(&self, token: &str) -> Result<Vec<Package>> {
        let res = self
            .http
            .get(self.url("/api/packages/list"))
            .bearer_auth(token)
            .send()
            .await?;
        let body: Envelope<Vec<Package>> = res.json().await?;
        body.into_data()
    }

    /// `GET /api/keys/list`
    pub async fn load_keys(&self, token: &str) -> Result<Vec<Key>> {
        let res = self
            .http
            .get(self.url("/api/keys/list"))
            .bearer_auth(token)
            .send()
            .await?;
        let body: KeyListResponse = res.json().await?;
        debug!(count = body.data.len(), "loaded key list");
        Ok(body.data)
    }

    /// `POST /api/packages/create`; the returned package carries its
    /// one-time API token.
    pub async fn create_package(&self, token: &str, name: &str) -> Result<Package> {
        if name.trim().is_empty() {
            return Err(ClientError::validation("package name is required"));
        }
        let res = self
            .http
            .post(self.url("/api/packages/create"))
            .bearer_auth(token)
            .json(&CreatePackageRequest { name })
            .send()
            .await?;
        let body: Envelope<Package> = res.json().await?;
        body.into_data()
    }

    /// `DELETE /api/packages/{id}`; the backend cascades to the package's
    /// keys.
    pub async fn delete_package(&self, token: &str, id: &str) -> Result<()> {
        let res = self
            .http
            .delete(self.url(&format!("/api/packages/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        let body: Ack = res.json().await?;
        body.ensure_success()
    }

    /// `POST /api/keys/create`; returns the generated batch.
    pub async fn create_keys(&self, token: &str, spec: &CreateKeySpec) -> Result<Vec<Key>> {
        spec.validate()?;
        let req = CreateKeyRequest {
            key_type: "prefix",
            prefix: &spec.prefix,
            quantity: spec.quantity,
            package_id: &spec.package_id,
            duration: spec.duration,
            duration_type: spec.duration_type,
            multi_activation: spec.multi_activation,
            max_activations: spec.effective_max_activations(),
        };
        info!(prefix = %spec.prefix, quantity = spec.quantity, "creating key batch");
        let res = self
            .http
            .post(self.url("/api/keys/create"))
            .bearer_auth(token)
            .json(&req)
            .send()
            .await?;
        let body: Envelope<Vec<Key>> = res.json().await?;
        body.into_data()
    }

    /// `POST /api/keys/{id}/reset`; success is the HTTP status.
    pub async fn reset_key(&self, token: &str, id: &str) -> Result<()> {
        let res = self
            .http
            .post(self.url(&format!("/api/keys/{id}/reset")))
            .bearer_auth(token)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(ClientError::api(format!(
                "key reset failed with status {}",
                res.status()
            )));
        }
        Ok(())
    }

    /// `DELETE /api/keys/{id}`; success is the HTTP status.
    pub async fn delete_key(&self, token: &str, id: &str) -> Result<()> {
        let res = self
            .http
            .delete(self.url(&format!("/api/keys/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(ClientError::api(format!(
                "key delete failed with status {}",
                res.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn spec() -> CreateKeySpec {
        CreateKeySpec {
            package_id: "p1".to_string(),
            prefix: "APP".to_string(),
            quantity: 2,
            duration: 30,
            duration_type: DurationType::Days,
            multi_activation: true,
            max_activations: 3,
        }
    }

    #[test]
    fn test_spec_validation_rejects_empty_fields() {
        let mut bad = spec();
        bad.prefix = "  ".to_string();
        assert!(bad.validate().is_err());

        let mut bad = spec();
        bad.quantity = 0;
        assert!(bad.validate().is_err());

        let mut bad = spec();
        bad.duration = 0;
        assert!(bad.validate().is_err());

        let mut bad = spec();
        bad.package_id.clear();
        assert!(bad.validate().is_err());

        assert!(spec().validate().is_ok());
    }

    #[test]
    fn test_single_activation_ignores_max_activations() {
        let mut single = spec();
        single.multi_activation = false;
        single.max_activations = 99;
        assert_eq!(single.effective_max_activations(), 1);
        // A zero bound is fine when multi-activation is off.
        single.max_activations = 0;
        assert!(single.validate().is_ok());
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_partial_json(json!({
                "username": "admin",
                "password": "hunter2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = Catalog::new(server.uri());
        let token = catalog.login("admin", "hunter2").await.unwrap();
        assert_eq!(token, "tok-1");
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "wrong password" })),
            )
            .mount(&server)
            .await;

        let catalog = Catalog::new(server.uri());
        let err = catalog.login("admin", "nope").await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(ref m) if m == "wrong password"));
    }

    #[tokio::test]
    async fn test_load_keys_decodes_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/keys/list"))
            .and(header("Authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "_id": "k1", "key": "APP-1", "package": { "name": "App" } },
                    { "_id": "k2", "key": "APP-2" }
                ]
            })))
            .mount(&server)
            .await;

        let catalog = Catalog::new(server.uri());
        let keys = catalog.load_keys("tok-1").await.unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].key, "APP-1");
    }

    #[tokio::test]
    async fn test_create_package_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/packages/create"))
            .and(body_partial_json(json!({ "name": "My App" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "_id": "p9", "name": "My App", "token": "pkg-secret" }
            })))
            .mount(&server)
            .await;

        let catalog = Catalog::new(server.uri());
        let package = catalog.create_package("tok-1", "My App").await.unwrap();
        assert_eq!(package.id, "p9");
        assert_eq!(package.token.as_deref(), Some("pkg-secret"));
    }

    #[tokio::test]
    async fn test_create_package_rejects_blank_name_locally() {
        // No mock mounted: a request would fail the test via connection error
        // with a different variant.
        let catalog = Catalog::new("http://127.0.0.1:9");
        let err = catalog.create_package("tok-1", "   ").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_keys_sends_effective_activation_bound() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/keys/create"))
            .and(body_partial_json(json!({
                "keyType": "prefix",
                "multiActivation": false,
                "maxActivations": 1
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [ { "_id": "k1", "key": "APP-XYZ" } ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut single = spec();
        single.multi_activation = false;
        single.max_activations = 42;

        let catalog = Catalog::new(server.uri());
        let batch = catalog.create_keys("tok-1", &single).await.unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_package_checks_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/packages/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "package not found"
            })))
            .mount(&server)
            .await;

        let catalog = Catalog::new(server.uri());
        let err = catalog.delete_package("tok-1", "p1").await.unwrap_err();
        assert!(matches!(err, ClientError::Api(ref m) if m == "package not found"));
    }

    #[tokio::test]
    async fn test_status_only_endpoints_map_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/keys/k1/reset"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/keys/k1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let catalog = Catalog::new(server.uri());
        catalog.reset_key("tok-1", "k1").await.unwrap();
        let err = catalog.delete_key("tok-1", "k1").await.unwrap_err();
        assert!(matches!(err, ClientError::Api(_)));
    }
}
