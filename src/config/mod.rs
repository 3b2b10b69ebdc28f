// src/config/mod.rs

//! Plant description loading and validation.
//!
//! Responsibilities:
//! - Define the input data model (`model.rs`).
//! - Read the line format or TOML from disk (`loader.rs`).
//! - Validate topology invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_with, parse_lines, parse_toml};
pub use model::{LinkConfig, PlantConfig, RawPlantConfig};
