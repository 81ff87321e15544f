//! Configuration schema.
//!
//! Hierarchy: `Config` → `ModelConfig`, `GenerationParams`, optional persona
//! override.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

use crate::engine::GenerationParams;
use crate::persona::DEFAULT_PERSONA;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.printpal/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub model: ModelConfig,
    pub generation: GenerationParams,
    /// Optional override of the built-in assistant persona.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
}

impl Config {
    /// The persona text to prepend to every engine request.
    pub fn persona_text(&self) -> &str {
        self.persona.as_deref().unwrap_or(DEFAULT_PERSONA)
    }
}

// ─────────────────────────────────────────────
// Model
// ─────────────────────────────────────────────

/// Settings for loading the local model artifact.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    /// Path to the GGUF artifact (`~` is expanded).
    pub path: String,
    /// Context window size in tokens.
    pub context_window: u32,
    /// Layers to offload to the GPU. 0 = CPU only.
    pub gpu_layers: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "./Phi-3-mini-4k-instruct-q4.gguf".to_string(),
            context_window: 4096,
            gpu_layers: 0,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
