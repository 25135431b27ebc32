//! License key module
//!
//! This module contains the key model, expiry rules and lifetime units.

mod model;

pub use model::*;
