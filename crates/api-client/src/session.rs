//! Session lifecycle and credential persistence
//!
//! A session is either anonymous or authenticated with a bearer token.
//! Credentials survive restarts through a [`SessionStore`]; the file-backed
//! implementation keeps one small JSON document on disk, written on login
//! and removed on logout.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;

/// Persisted login material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

/// Storage port for credentials that survive process restarts
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read stored credentials, if any
    async fn load(&self) -> Result<Option<Credentials>>;

    /// Persist credentials, replacing any previous ones
    async fn save(&self, credentials: &Credentials) -> Result<()>;

    /// Remove stored credentials; a no-op when none exist
    async fn clear(&self) -> Result<()>;
}

/// Client-side login state: anonymous or authenticated
#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Option<Credentials>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    /// Transition to the authenticated state
    pub fn authenticate(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Transition back to anonymous
    pub fn clear(&mut self) {
        self.credentials = None;
    }
}

/// File-backed session store: one JSON document on disk
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Credentials>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        let credentials = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), "loaded stored session");
        Ok(Some(credentials))
    }

    async fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(credentials)?;
        tokio::fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), "saved session");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn credentials() -> Credentials {
        Credentials {
            username: "admin".to_string(),
            token: "tok-123".to_string(),
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());

        session.authenticate(credentials());
        assert!(session.is_authenticated());
        assert_eq!(session.username(), Some("admin"));
        assert_eq!(session.token(), Some("tok-123"));

        session.clear();
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("session.json"));

        assert!(store.load().await.unwrap().is_none());

        store.save(&credentials()).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, credentials());

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_without_saved_session_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("session.json"));
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("nested/dir/session.json"));
        store.save(&credentials()).await.unwrap();
        assert!(store.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_session_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        let store = FileSessionStore::new(&path);
        assert!(store.load().await.is_err());
    }
}
