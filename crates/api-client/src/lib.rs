//! HTTP client for the Keyrack license backend
//!
//! This crate owns the remote-service boundary:
//! - [`Session`] / [`SessionStore`]: login state and its persistence
//! - [`Catalog`]: typed requests for every backend endpoint
//! - [`AdminConsole`]: the view model mirroring packages and keys,
//!   with wholesale reloads after every mutation

pub mod catalog;
pub mod console;
pub mod error;
pub mod session;
pub mod wire;

pub use catalog::{Catalog, CreateKeySpec};
pub use console::AdminConsole;
pub use error::{ClientError, Result};
pub use session::{Credentials, FileSessionStore, Session, SessionStore};
