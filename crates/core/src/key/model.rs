//! Key model definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Expiry dates further out than this many days render as permanent.
///
/// Only the display label is affected; `Key::is_expired` keeps using the
/// raw date.
pub const PERMANENT_THRESHOLD_DAYS: i64 = 10 * 365;

/// The package a key belongs to, as embedded in key payloads.
///
/// The backend may populate only the name, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRef {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Unit for key lifetimes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    Days,
    Weeks,
    Months,
    Years,
}

impl Default for DurationType {
    fn default() -> Self {
        Self::Days
    }
}

impl fmt::Display for DurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        };
        f.write_str(unit)
    }
}

impl FromStr for DurationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "days" => Ok(Self::Days),
            "week" | "weeks" => Ok(Self::Weeks),
            "month" | "months" => Ok(Self::Months),
            "year" | "years" => Ok(Self::Years),
            other => Err(Error::UnknownDurationUnit(other.to_string())),
        }
    }
}

/// A license key mirrored from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    #[serde(rename = "_id")]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub package: Option<PackageRef>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub activated_devices: Vec<String>,
    #[serde(default = "default_max_activations")]
    pub max_activations: u32,
}

fn default_max_activations() -> u32 {
    1
}

impl Key {
    /// Create a key with no expiry and no activations
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            package: None,
            expires_at: None,
            activated_devices: Vec::new(),
            max_activations: 1,
        }
    }

    /// Set the owning package name
    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package = Some(PackageRef {
            id: None,
            name: Some(name.into()),
        });
        self
    }

    /// Set the expiry date
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Set the activated device list
    pub fn with_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.activated_devices = devices.into_iter().map(Into::into).collect();
        self
    }

    /// Set the activation bound
    pub fn with_max_activations(mut self, max_activations: u32) -> Self {
        self.max_activations = max_activations;
        self
    }

    /// A key with no expiry never expires; otherwise it is expired once
    /// `now` is strictly past the expiry date.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }

    /// Whether the expiry column shows "permanent": no expiry date, or one
    /// beyond [`PERMANENT_THRESHOLD_DAYS`]. Independent of `is_expired`.
    pub fn is_permanent(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - now > Duration::days(PERMANENT_THRESHOLD_DAYS),
            None => true,
        }
    }

    /// Label for the expiry column: "permanent" or a UTC timestamp.
    pub fn expiry_label(&self, now: DateTime<Utc>) -> String {
        match self.expires_at {
            Some(expires_at) if !self.is_permanent(now) => {
                expires_at.format("%Y-%m-%d %H:%M").to_string()
            }
            _ => "permanent".to_string(),
        }
    }

    /// Whether at least one device has activated this key
    pub fn is_used(&self) -> bool {
        !self.activated_devices.is_empty()
    }
}
