//! Engine loader — load the model once per process, hand out the same
//! handle forever after.
//!
//! The loader is an explicit value (constructed in `main`, passed around),
//! not global state; the once-only behavior lives in a `OnceCell` inside it.
//! A failed load leaves the cell empty and surfaces `ModelLoadError` to the
//! caller, which is expected to halt instead of retrying.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use printpal_core::config::ModelConfig;
use printpal_core::engine::ChatEngine;
use printpal_core::error::ModelLoadError;

use crate::engine::LlamaEngine;

/// Loads the configured model on first use and caches the engine handle.
pub struct EngineLoader {
    config: ModelConfig,
    cell: OnceCell<Arc<dyn ChatEngine>>,
}

impl EngineLoader {
    pub fn new(config: ModelConfig) -> Self {
        EngineLoader {
            config,
            cell: OnceCell::new(),
        }
    }

    /// Get the engine, loading the model if this is the first call.
    ///
    /// Idempotent: every successful call returns a clone of the same `Arc`.
    /// The load itself is CPU- and memory-heavy, so it runs on a blocking
    /// task; that cost is paid exactly once.
    pub async fn acquire(&self) -> Result<Arc<dyn ChatEngine>, ModelLoadError> {
        self.acquire_with(|| async {
            let config = self.config.clone();
            info!(path = %config.path, "acquiring engine (first use loads the model)");
            let engine = tokio::task::spawn_blocking(move || LlamaEngine::spawn(config))
                .await
                .map_err(|e| {
                    ModelLoadError::new(&self.config.path, format!("load task failed: {e}"))
                })??;
            Ok(Arc::new(engine) as Arc<dyn ChatEngine>)
        })
        .await
    }

    /// Cache-or-init plumbing, separated so tests can count real loads.
    async fn acquire_with<F, Fut>(&self, init: F) -> Result<Arc<dyn ChatEngine>, ModelLoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn ChatEngine>, ModelLoadError>>,
    {
        self.cell.get_or_try_init(init).await.cloned()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use printpal_core::engine::GenerationParams;
    use printpal_core::error::InferenceError;
    use printpal_core::types::{ChatMessage, CompletionResponse};

    struct StaticEngine;

    #[async_trait]
    impl ChatEngine for StaticEngine {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _params: &GenerationParams,
        ) -> Result<CompletionResponse, InferenceError> {
            Ok(CompletionResponse::single("ok", "stop"))
        }

        fn model_name(&self) -> &str {
            "static"
        }
    }

    #[tokio::test]
    async fn test_acquire_loads_once_and_returns_the_same_handle() {
        let loader = EngineLoader::new(ModelConfig::default());
        let loads = AtomicUsize::new(0);

        let init = || async {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StaticEngine) as Arc<dyn ChatEngine>)
        };

        let first = loader.acquire_with(init).await.unwrap();
        let second = loader
            .acquire_with(|| async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(StaticEngine) as Arc<dyn ChatEngine>)
            })
            .await
            .unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 1, "model must load exactly once");
        assert!(Arc::ptr_eq(&first, &second), "both calls share one handle");
    }

    #[tokio::test]
    async fn test_acquire_propagates_load_failure() {
        let loader = EngineLoader::new(ModelConfig::default());

        let err = loader
            .acquire_with(|| async {
                Err(ModelLoadError::new("/m/phi3.gguf", "corrupt artifact"))
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("corrupt artifact"));
    }

    #[tokio::test]
    async fn test_acquire_missing_artifact_fails() {
        let loader = EngineLoader::new(ModelConfig {
            path: "/definitely/not/here.gguf".to_string(),
            ..Default::default()
        });

        let err = loader.acquire().await.unwrap_err();
        assert!(err.to_string().contains("model file not found"));
    }
}
