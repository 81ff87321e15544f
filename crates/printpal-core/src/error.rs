//! Error types for the chat core.
//!
//! Exactly two failure kinds cross this crate's boundaries: a fatal model
//! load failure at startup, and a per-turn inference failure. Everything the
//! engine can get wrong mid-turn (decode errors, over-long prompts, a dead
//! worker, a malformed response) folds into [`InferenceError`].

use std::path::PathBuf;

use thiserror::Error;

/// The model artifact could not be found or initialized.
///
/// Fatal: callers must stop before any chat interaction, not retry.
#[derive(Debug, Error)]
#[error("failed to load model from `{path}`: {reason}")]
pub struct ModelLoadError {
    /// Path of the model artifact that failed to load.
    pub path: PathBuf,
    /// Human-readable underlying cause.
    pub reason: String,
}

impl ModelLoadError {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ModelLoadError {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A chat completion failed.
///
/// Carries only a human-readable cause; the session surfaces it for the
/// current turn and the conversation continues.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("inference failed: {reason}")]
pub struct InferenceError {
    pub reason: String,
}

impl InferenceError {
    pub fn new(reason: impl Into<String>) -> Self {
        InferenceError {
            reason: reason.into(),
        }
    }
}
