//! Sprite composer - Library for building shiny sprite archives
//!
//! This library provides functionality to:
//! - Decode a front animation and a back sprite pair
//! - Snap near-white/near-black pixels and clear the white backdrop
//! - Extract a two-color shiny palette and render recolored variants
//! - Write the modern and legacy export archives

pub mod cli;
pub mod color;
pub mod config;
pub mod decode;
pub mod export;
pub mod filmstrip;
pub mod flood;
pub mod models;
pub mod normalize;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod task;
