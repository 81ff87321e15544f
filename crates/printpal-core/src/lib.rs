//! Core library for Printpal — a local-model chat assistant for 3D-printing
//! questions.
//!
//! This crate holds everything that is independent of the actual inference
//! backend:
//!
//! - [`types`] — conversation turns and the completion response shape
//! - [`engine`] — the [`engine::ChatEngine`] trait seam + generation params
//! - [`session`] — [`session::ChatSession`], the transcript-owning
//!   conversation state machine
//! - [`error`] — the two failure kinds: fatal load, per-turn inference
//! - [`config`] — JSON config with defaults and env overrides
//! - [`persona`] — the built-in assistant persona
//!
//! The llama.cpp-backed engine lives in the `printpal-engine` crate.

pub mod config;
pub mod engine;
pub mod error;
pub mod persona;
pub mod session;
pub mod types;
pub mod utils;

pub use engine::{ChatEngine, GenerationParams};
pub use error::{InferenceError, ModelLoadError};
pub use session::{ChatSession, FailurePolicy, Transcript};
pub use types::{ChatMessage, CompletionResponse, Role};
