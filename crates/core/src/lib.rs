//! Core library for Keyrack
//!
//! This crate contains the client-side domain logic, including:
//! - License key and package models
//! - Expiry and permanence rules
//! - The derived search/pagination view over the key list
//!
//! Nothing in this crate performs I/O; the network boundary lives in
//! `keyrack-client`.

pub mod error;
pub mod key;
pub mod package;
pub mod view;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
