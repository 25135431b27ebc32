//! Package module

mod model;

pub use model::*;
