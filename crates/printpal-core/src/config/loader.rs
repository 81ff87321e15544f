//! Config loader — reads `~/.printpal/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.printpal/config.json`
//! 3. Environment variables `PRINTPAL_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be
/// parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `PRINTPAL_<SECTION>__<FIELD>` (double underscore as
/// delimiter).
///
/// Supported overrides:
/// - `PRINTPAL_MODEL__PATH` → `model.path`
/// - `PRINTPAL_MODEL__CONTEXT_WINDOW` → `model.context_window`
/// - `PRINTPAL_MODEL__GPU_LAYERS` → `model.gpu_layers`
/// - `PRINTPAL_GENERATION__MAX_TOKENS` → `generation.max_tokens`
/// - `PRINTPAL_GENERATION__TEMPERATURE` → `generation.temperature`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(path) = std::env::var("PRINTPAL_MODEL__PATH") {
        if !path.is_empty() {
            config.model.path = path;
        }
    }
    if let Some(n) = env_parse::<u32>("PRINTPAL_MODEL__CONTEXT_WINDOW") {
        config.model.context_window = n;
    }
    if let Some(n) = env_parse::<u32>("PRINTPAL_MODEL__GPU_LAYERS") {
        config.model.gpu_layers = n;
    }
    if let Some(n) = env_parse::<u32>("PRINTPAL_GENERATION__MAX_TOKENS") {
        config.generation.max_tokens = n;
    }
    if let Some(t) = env_parse::<f64>("PRINTPAL_GENERATION__TEMPERATURE") {
        config.generation.temperature = t;
    }
    config
}

/// Read and parse an env var, warning (not failing) on malformed values.
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring malformed env override {}={}", name, raw);
            None
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
