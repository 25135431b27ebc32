//! Wire types for the license backend HTTP API
//!
//! Field names follow the backend's JSON contract: camelCase properties,
//! Mongo-style `_id` entity ids, and a `{success, data, message}` envelope
//! on package endpoints.

use serde::{Deserialize, Serialize};

use keyrack_core::key::{DurationType, Key};

use crate::error::ClientError;
use crate::Result;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login answers `{token}` on success and `{message}` on failure.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The `{success, data, message}` envelope
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope for endpoints whose `data` we never read
pub type Ack = Envelope<serde_json::Value>;

impl<T> Envelope<T> {
    /// Unwrap the payload, or surface the server's failure message.
    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(ClientError::Api(self.failure_message()));
        }
        self.data
            .ok_or_else(|| ClientError::api("response had no data"))
    }

    /// Check `success` on endpoints that return no payload.
    pub fn ensure_success(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(ClientError::Api(self.failure_message()))
        }
    }

    fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "request rejected by the server".to_string())
    }
}

/// `GET /api/keys/list` body
#[derive(Debug, Deserialize)]
pub struct KeyListResponse {
    #[serde(default)]
    pub data: Vec<Key>,
}

#[derive(Debug, Serialize)]
pub struct CreatePackageRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyRequest<'a> {
    pub key_type: &'a str,
    pub prefix: &'a str,
    pub quantity: u32,
    pub package_id: &'a str,
    pub duration: u32,
    pub duration_type: DurationType,
    pub multi_activation: bool,
    pub max_activations: u32,
}
