//! The `ChatEngine` trait — the seam between the conversation session and
//! whatever runs the model.
//!
//! The production implementation lives in `printpal-engine` (llama.cpp on a
//! worker thread); tests substitute an in-memory double.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;
use crate::types::{ChatMessage, CompletionResponse};

/// Sampling and length parameters passed with each completion request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationParams {
    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,
    /// Sampling temperature (0 = greedy).
    pub temperature: f64,
    /// Nucleus sampling cumulative-probability cutoff.
    pub top_p: f64,
    /// Generation halts as soon as any of these sequences appears.
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
            top_p: 0.95,
            stop: vec!["<|end|>".to_string(), "<|user|>".to_string()],
        }
    }
}

/// A loaded, ready-to-query language model.
///
/// Implementations must deliver the whole response in one call — there is no
/// streaming path. Calls are not assumed to be issued concurrently; the
/// session serializes them per conversation.
#[async_trait]
pub trait ChatEngine: Send + Sync {
    /// Run one chat completion over the given message list.
    ///
    /// `messages` is the full request including the system persona; the
    /// engine does not add or reorder anything.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<CompletionResponse, InferenceError>;

    /// Model identifier for display and logging.
    fn model_name(&self) -> &str;
}
