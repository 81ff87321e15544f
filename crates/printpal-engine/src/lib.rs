//! llama.cpp-backed engine for Printpal.
//!
//! # Architecture
//!
//! - [`loader::EngineLoader`] — loads the model once, caches the handle
//! - [`engine::LlamaEngine`] — a dedicated worker thread owning the backend
//!   and weights, serving completions over channels
//! - [`template`] — Phi-3 chat template rendering
//! - [`sampler`] — temperature + top-p sampling over raw logits

pub mod engine;
pub mod loader;
pub mod sampler;
pub mod template;

pub use engine::LlamaEngine;
pub use loader::EngineLoader;
