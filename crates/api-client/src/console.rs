//! Admin console view model
//!
//! Owns the mirrored package and key lists plus the table cursor. Every
//! mutation is a network round-trip; on success the affected list is
//! replaced wholesale by a fresh load, never patched in place. On any
//! failure the local lists are left exactly as they were.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use keyrack_core::key::Key;
use keyrack_core::package::Package;
use keyrack_core::view::{KeyStats, PageMark, ViewState};

use crate::catalog::{Catalog, CreateKeySpec};
use crate::error::ClientError;
use crate::session::{Credentials, Session, SessionStore};
use crate::Result;

pub struct AdminConsole {
    catalog: Catalog,
    session: Session,
    store: Arc<dyn SessionStore>,
    packages: Vec<Package>,
    keys: Vec<Key>,
    view: ViewState,
}

impl AdminConsole {
    pub fn new(catalog: Catalog, store: Arc<dyn SessionStore>) -> Self {
        Self {
            catalog,
            session: Session::anonymous(),
            store,
            packages: Vec::new(),
            keys: Vec::new(),
            view: ViewState::default(),
        }
    }

    /// Adopt persisted credentials, if any, and load both lists.
    ///
    /// A console with no stored session stays anonymous and empty.
    pub async fn init(&mut self) -> Result<()> {
        if let Some(credentials) = self.store.load().await? {
            info!(username = %credentials.username, "restored saved session");
            self.session.authenticate(credentials);
            self.refresh().await?;
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    fn token(&self) -> Result<&str> {
        self.session.token().ok_or(ClientError::NotAuthenticated)
    }

    /// Log in, persist the credentials and load both lists.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() || password.is_empty() {
            return Err(ClientError::validation(
                "username and password are required",
            ));
        }
        let token = self.catalog.login(username, password).await?;
        let credentials = Credentials {
            username: username.to_string(),
            token,
        };
        self.store.save(&credentials).await?;
        self.session.authenticate(credentials);
        info!(username, "logged in");
        self.refresh().await
    }

    /// Drop the stored credentials and every mirrored list.
    pub async fn logout(&mut self) -> Result<()> {
        self.store.clear().await?;
        self.session.clear();
        self.packages.clear();
        self.keys.clear();
        self.view.reset_page();
        info!("logged out");
        Ok(())
    }

    /// Reload packages then keys.
    pub async fn refresh(&mut self) -> Result<()> {
        self.load_packages().await?;
        self.load_keys().await
    }

    /// Replace the package list with a fresh load.
    pub async fn load_packages(&mut self) -> Result<()> {
        let packages = self.catalog.load_packages(self.token()?).await?;
        self.packages = packages;
        Ok(())
    }

    /// Replace the key list with a fresh load and snap to the first page.
    pub async fn load_keys(&mut self) -> Result<()> {
        let keys = self.catalog.load_keys(self.token()?).await?;
        self.keys = keys;
        self.view.reset_page();
        Ok(())
    }

    /// Create a package. The returned value is the only place its API
    /// token is ever visible.
    pub async fn create_package(&mut self, name: &str) -> Result<Package> {
        let package = self.catalog.create_package(self.token()?, name).await?;
        self.packages.push(package.clone());
        Ok(package)
    }

    /// Delete a package, then reload keys: the backend cascades, so key
    /// associations may have gone stale.
    pub async fn delete_package(&mut self, id: &str) -> Result<()> {
        self.catalog.delete_package(self.token()?, id).await?;
        self.packages.retain(|p| p.id != id);
        warn!(package = id, "package deleted");
        self.load_keys().await
    }

    /// Generate a key batch. The batch is returned for display, but the
    /// mirrored list comes from a full reload.
    pub async fn create_keys(&mut self, spec: &CreateKeySpec) -> Result<Vec<Key>> {
        let batch = self.catalog.create_keys(self.token()?, spec).await?;
        self.load_keys().await?;
        Ok(batch)
    }

    /// Clear a key's activated devices, then reload.
    pub async fn reset_key(&mut self, id: &str) -> Result<()> {
        self.catalog.reset_key(self.token()?, id).await?;
        self.load_keys().await
    }

    /// Permanently delete a key, then reload.
    pub async fn delete_key(&mut self, id: &str) -> Result<()> {
        self.catalog.delete_key(self.token()?, id).await?;
        warn!(key = id, "key deleted");
        self.load_keys().await
    }

    // Cursor updates

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.view.set_search(search);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.view.set_page_size(page_size)?;
        Ok(())
    }

    pub fn set_page(&mut self, page: usize) -> Result<()> {
        self.view.set_page(page)?;
        Ok(())
    }

    // Derived reads, recomputed on every call

    pub fn filtered_keys(&self) -> Vec<&Key> {
        self.view.filtered(&self.keys)
    }

    pub fn page(&self) -> Vec<&Key> {
        self.view.page(&self.keys)
    }

    pub fn total_pages(&self) -> usize {
        self.view.total_pages(&self.keys)
    }

    pub fn visible_pages(&self) -> Vec<PageMark> {
        self.view.visible_pages(&self.keys)
    }

    /// Aggregates over the full, unfiltered key list.
    pub fn stats(&self) -> KeyStats {
        KeyStats::collect(&self.keys, Utc::now())
    }
}
