//! Configuration — typed schema + JSON file loader with env overrides.

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config};
pub use schema::{Config, ModelConfig};
