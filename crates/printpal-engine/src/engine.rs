//! The llama.cpp-backed chat engine.
//!
//! The backend and model weights are owned by a single dedicated worker
//! thread, spawned once at load time and kept for the process lifetime.
//! Completions arrive as jobs over an mpsc channel and answer over oneshot
//! channels, so the async side only ever awaits — and inference calls are
//! serialized by construction, which the underlying engine requires.

use std::num::NonZeroU32;
use std::path::Path;

use async_trait::async_trait;
use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel, Special};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use printpal_core::config::ModelConfig;
use printpal_core::engine::{ChatEngine, GenerationParams};
use printpal_core::error::{InferenceError, ModelLoadError};
use printpal_core::types::{ChatMessage, CompletionResponse, UsageInfo};
use printpal_core::utils::expand_home;

use crate::sampler;
use crate::template;

/// One queued completion request for the worker thread.
struct Job {
    messages: Vec<ChatMessage>,
    params: GenerationParams,
    reply: oneshot::Sender<Result<CompletionResponse, InferenceError>>,
}

// ─────────────────────────────────────────────
// LlamaEngine
// ─────────────────────────────────────────────

/// Handle to a loaded model served by a dedicated inference thread.
///
/// Cheap to clone through an `Arc`; dropping every handle closes the job
/// channel and lets the worker thread exit.
pub struct LlamaEngine {
    jobs: mpsc::Sender<Job>,
    model_name: String,
}

impl LlamaEngine {
    /// Load the model and start the inference worker.
    ///
    /// Blocks until the model is fully loaded (or has failed to), so call it
    /// from a blocking-friendly context. The load happens exactly once per
    /// engine; repeated access goes through `EngineLoader`.
    pub fn spawn(config: ModelConfig) -> Result<Self, ModelLoadError> {
        let path = expand_home(&config.path);
        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown-model")
            .to_string();

        let (ready_tx, ready_rx) = std::sync::mpsc::channel();
        let (job_tx, job_rx) = mpsc::channel::<Job>(1);

        std::thread::Builder::new()
            .name("printpal-infer".to_string())
            .spawn(move || worker_main(config, ready_tx, job_rx))
            .map_err(|e| {
                ModelLoadError::new(&path, format!("failed to spawn inference thread: {e}"))
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!(model = %model_name, "model loaded");
                Ok(LlamaEngine {
                    jobs: job_tx,
                    model_name,
                })
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ModelLoadError::new(
                &path,
                "inference thread exited before the model finished loading",
            )),
        }
    }
}

#[async_trait]
impl ChatEngine for LlamaEngine {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<CompletionResponse, InferenceError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job = Job {
            messages: messages.to_vec(),
            params: params.clone(),
            reply: reply_tx,
        };

        self.jobs
            .send(job)
            .await
            .map_err(|_| InferenceError::new("inference worker is no longer running"))?;

        reply_rx
            .await
            .map_err(|_| InferenceError::new("inference worker dropped the request"))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

// ─────────────────────────────────────────────
// Worker thread
// ─────────────────────────────────────────────

/// Thread body: load once, signal readiness, then serve jobs until every
/// engine handle is gone.
fn worker_main(
    config: ModelConfig,
    ready_tx: std::sync::mpsc::Sender<Result<(), ModelLoadError>>,
    mut jobs: mpsc::Receiver<Job>,
) {
    let path = expand_home(&config.path);
    let (backend, model) = match load_model(&path, &config) {
        Ok(loaded) => {
            let _ = ready_tx.send(Ok(()));
            loaded
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    while let Some(job) = jobs.blocking_recv() {
        let result = run_completion(&backend, &model, &config, &job.messages, &job.params);
        if job.reply.send(result).is_err() {
            warn!("completion finished but the requester went away");
        }
    }
    debug!("inference worker shutting down");
}

/// Initialize the backend and load the GGUF artifact.
fn load_model(
    path: &Path,
    config: &ModelConfig,
) -> Result<(LlamaBackend, LlamaModel), ModelLoadError> {
    if !path.is_file() {
        return Err(ModelLoadError::new(path, "model file not found"));
    }

    let mut backend = LlamaBackend::init()
        .map_err(|e| ModelLoadError::new(path, format!("backend init failed: {e}")))?;
    // llama.cpp is chatty on stderr by default.
    backend.void_logs();

    let model_params = LlamaModelParams::default().with_n_gpu_layers(config.gpu_layers);

    info!(
        path = %path.display(),
        n_ctx = config.context_window,
        gpu_layers = config.gpu_layers,
        "loading model weights"
    );
    let model = LlamaModel::load_from_file(&backend, path, &model_params)
        .map_err(|e| ModelLoadError::new(path, e.to_string()))?;

    Ok((backend, model))
}

/// Run one whole-response completion.
fn run_completion(
    backend: &LlamaBackend,
    model: &LlamaModel,
    config: &ModelConfig,
    messages: &[ChatMessage],
    params: &GenerationParams,
) -> Result<CompletionResponse, InferenceError> {
    let prompt = template::render_prompt(messages);
    let tokens = model
        .str_to_token(&prompt, AddBos::Always)
        .map_err(|e| InferenceError::new(format!("tokenization failed: {e}")))?;

    let n_ctx = config.context_window as usize;
    if tokens.len() + params.max_tokens as usize > n_ctx {
        return Err(InferenceError::new(format!(
            "conversation no longer fits the context window \
             ({} prompt tokens + {} output > {})",
            tokens.len(),
            params.max_tokens,
            n_ctx
        )));
    }

    // Fresh context per request: the KV cache starts empty and the full
    // history is replayed from the prompt.
    let ctx_params =
        LlamaContextParams::default().with_n_ctx(NonZeroU32::new(config.context_window));
    let mut ctx = model
        .new_context(backend, ctx_params)
        .map_err(|e| InferenceError::new(format!("context creation failed: {e}")))?;

    let mut batch = LlamaBatch::new(n_ctx, 1);
    let last_index = tokens.len() as i32 - 1;
    for (i, token) in (0_i32..).zip(tokens.iter().copied()) {
        batch
            .add(token, i, &[0], i == last_index)
            .map_err(|e| InferenceError::new(format!("batch build failed: {e}")))?;
    }
    ctx.decode(&mut batch)
        .map_err(|e| InferenceError::new(format!("prompt decode failed: {e}")))?;

    debug!(
        prompt_tokens = tokens.len(),
        max_tokens = params.max_tokens,
        "prompt decoded, generating"
    );

    let mut rng = rand::thread_rng();
    let mut decoder = encoding_rs::UTF_8.new_decoder();
    let mut text = String::new();
    let mut n_cur = batch.n_tokens();
    let mut generated: u32 = 0;
    let mut finish_reason = "length";

    while generated < params.max_tokens {
        let candidates: Vec<_> = ctx.candidates().collect();
        let logits: Vec<f32> = candidates.iter().map(|d| d.logit()).collect();
        let chosen = sampler::sample_index(
            &logits,
            params.temperature as f32,
            params.top_p as f32,
            &mut rng,
        );
        let token = candidates[chosen].id();

        if model.is_eog_token(token) {
            finish_reason = "stop";
            break;
        }

        let bytes = model
            .token_to_bytes(token, Special::Tokenize)
            .map_err(|e| InferenceError::new(format!("detokenization failed: {e}")))?;
        let mut piece = String::with_capacity(32);
        let _ = decoder.decode_to_string(&bytes, &mut piece, false);
        text.push_str(&piece);
        generated += 1;

        if let Some(pos) = find_stop(&text, &params.stop) {
            text.truncate(pos);
            finish_reason = "stop";
            break;
        }

        batch.clear();
        batch
            .add(token, n_cur, &[0], true)
            .map_err(|e| InferenceError::new(format!("batch build failed: {e}")))?;
        n_cur += 1;
        ctx.decode(&mut batch)
            .map_err(|e| InferenceError::new(format!("decode failed: {e}")))?;
    }

    Ok(CompletionResponse::single(text, finish_reason)
        .with_usage(UsageInfo::new(tokens.len() as u32, generated)))
}

/// Position of the earliest stop-sequence occurrence, if any.
fn find_stop(text: &str, stops: &[String]) -> Option<usize> {
    stops.iter().filter_map(|s| text.find(s.as_str())).min()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<String> {
        vec!["<|end|>".to_string(), "<|user|>".to_string()]
    }

    #[test]
    fn test_find_stop_none() {
        assert_eq!(find_stop("plain text reply", &stops()), None);
    }

    #[test]
    fn test_find_stop_single() {
        assert_eq!(find_stop("answer<|end|> trailing", &stops()), Some(6));
    }

    #[test]
    fn test_find_stop_earliest_wins() {
        // Both markers present; truncation point is the earlier one.
        let text = "short<|user|>...<|end|>";
        assert_eq!(find_stop(text, &stops()), Some(5));
    }

    #[test]
    fn test_find_stop_truncation() {
        let mut text = "Use PLA at 200°C<|end|>garbage".to_string();
        let pos = find_stop(&text, &stops()).unwrap();
        text.truncate(pos);
        assert_eq!(text, "Use PLA at 200°C");
    }

    #[test]
    fn test_find_stop_empty_stop_list() {
        assert_eq!(find_stop("anything<|end|>", &[]), None);
    }
}
