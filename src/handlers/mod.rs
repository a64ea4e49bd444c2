//! HTTP handlers for model operations.

pub mod model;
pub use model::*;
