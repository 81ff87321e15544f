//! Conversation session — owns the transcript and drives one completion per
//! user turn.
//!
//! The transcript is append-only and replayed verbatim to the engine on
//! every turn, behind the fixed persona. Nothing is persisted across
//! process restarts, and a session is never shared: one `ChatSession`, one
//! conversation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::engine::{ChatEngine, GenerationParams};
use crate::error::InferenceError;
use crate::types::{ChatMessage, Role};
use crate::utils::truncate_string;

// ─────────────────────────────────────────────
// Transcript
// ─────────────────────────────────────────────

/// Ordered history of user/assistant turns for one conversation.
///
/// Append-only from the outside: earlier turns are never mutated or
/// reordered. The system persona is deliberately not part of it — it is
/// recombined at request-build time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    turns: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript { turns: Vec::new() }
    }

    /// Append a turn.
    pub fn push(&mut self, turn: ChatMessage) {
        self.turns.push(turn);
    }

    /// Drop the most recent turn (failure rollback only).
    pub(crate) fn pop(&mut self) -> Option<ChatMessage> {
        self.turns.pop()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[ChatMessage] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.turns.iter()
    }

    fn clear(&mut self) {
        self.turns.clear();
    }
}

// ─────────────────────────────────────────────
// Failure policy
// ─────────────────────────────────────────────

/// What happens to the just-appended user turn when the engine call fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Leave the user turn in the transcript (no assistant turn follows).
    #[default]
    KeepUserTurn,
    /// Remove the user turn, restoring the pre-submit transcript.
    RollBackUserTurn,
}

// ─────────────────────────────────────────────
// ChatSession
// ─────────────────────────────────────────────

/// One conversation against a loaded engine.
///
/// Holds no state between turns other than the transcript. At most one
/// `submit` is expected in flight at a time; callers serialize turns.
pub struct ChatSession {
    engine: Arc<dyn ChatEngine>,
    persona: String,
    params: GenerationParams,
    failure_policy: FailurePolicy,
    transcript: Transcript,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create an empty session with default generation parameters.
    pub fn new(engine: Arc<dyn ChatEngine>, persona: impl Into<String>) -> Self {
        let now = Utc::now();
        ChatSession {
            engine,
            persona: persona.into(),
            params: GenerationParams::default(),
            failure_policy: FailurePolicy::default(),
            transcript: Transcript::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Override the generation parameters (builder style).
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Override the failure policy (builder style).
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Read access to the conversation history, for display.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reset the conversation, keeping the engine and settings.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.updated_at = Utc::now();
    }

    /// Submit one user message and return the assistant's reply.
    ///
    /// Empty (or whitespace-only) input is treated as no submission:
    /// `Ok(None)`, transcript untouched.
    ///
    /// On success the transcript gains exactly two turns — the user message,
    /// then the assistant reply (surrounding whitespace trimmed). On engine
    /// failure the error is returned and the user turn is kept or rolled
    /// back according to the session's [`FailurePolicy`].
    pub async fn submit(&mut self, user_text: &str) -> Result<Option<String>, InferenceError> {
        if user_text.trim().is_empty() {
            return Ok(None);
        }

        self.transcript.push(ChatMessage::user(user_text));
        self.updated_at = Utc::now();

        let request = self.build_request();
        debug!(
            turns = self.transcript.len(),
            input = %truncate_string(user_text, 80),
            "submitting turn"
        );

        match self.engine.complete(&request, &self.params).await {
            Ok(response) => {
                let reply = match response.primary_text() {
                    Some(text) => text.trim().to_string(),
                    None => {
                        return self
                            .fail_turn(InferenceError::new("engine returned no completion choices"))
                    }
                };
                self.transcript.push(ChatMessage::assistant(reply.clone()));
                self.updated_at = Utc::now();
                Ok(Some(reply))
            }
            Err(e) => self.fail_turn(e),
        }
    }

    /// Full request for the engine: persona first, then every transcript
    /// turn in original order.
    fn build_request(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.transcript.len() + 1);
        messages.push(ChatMessage::system(&self.persona));
        messages.extend(self.transcript.iter().cloned());
        messages
    }

    /// Apply the failure policy and propagate the error.
    fn fail_turn(&mut self, error: InferenceError) -> Result<Option<String>, InferenceError> {
        warn!(error = %error, policy = ?self.failure_policy, "turn failed");
        if self.failure_policy == FailurePolicy::RollBackUserTurn {
            // The last turn is always the user message appended by this submit.
            debug_assert_eq!(
                self.transcript.turns().last().map(|t| t.role),
                Some(Role::User)
            );
            self.transcript.pop();
        }
        self.updated_at = Utc::now();
        Err(error)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
