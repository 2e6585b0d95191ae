//! Configuration module
//!
//! Provides types and parsing for `composer.toml` settings.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
