//! Core chat types — the conversation turns exchanged with the engine and
//! the completion response shape it hands back.
//!
//! Messages follow the chat-completions convention (`role` + `content`), and
//! the response carries a list of choices of which only the first is used.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// Speaker role of a conversation turn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One conversation turn. Immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Completion response
// ─────────────────────────────────────────────

/// Response from the engine for one chat completion.
///
/// The engine returns one or more choices; callers use the first.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageInfo>,
}

impl CompletionResponse {
    /// Build a single-choice response (the common case).
    pub fn single(content: impl Into<String>, finish_reason: impl Into<String>) -> Self {
        CompletionResponse {
            choices: vec![Choice {
                message: AssistantReply {
                    content: content.into(),
                },
                finish_reason: Some(finish_reason.into()),
            }],
            usage: None,
        }
    }

    /// Attach token usage counts.
    pub fn with_usage(mut self, usage: UsageInfo) -> Self {
        self.usage = Some(usage);
        self
    }

    /// The text of the top completion, if the response has one.
    pub fn primary_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// A single completion choice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub message: AssistantReply,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The assistant message within a completion choice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AssistantReply {
    pub content: String,
}

/// Token usage statistics for one completion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl UsageInfo {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        UsageInfo {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_message_serialization() {
        let msg = ChatMessage::system("You are a helpful assistant.");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are a helpful assistant.");
    }

    #[test]
    fn test_user_message_serialization() {
        let msg = ChatMessage::user("How do I stop stringing?");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "How do I stop stringing?");
    }

    #[test]
    fn test_assistant_message_serialization() {
        let msg = ChatMessage::assistant("Lower the nozzle temperature.");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Lower the nozzle temperature.");
    }

    #[test]
    fn test_message_deserialization() {
        let json = json!({"role": "user", "content": "Hi there"});
        let msg: ChatMessage = serde_json::from_value(json).unwrap();

        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn test_message_round_trip() {
        let messages = vec![
            ChatMessage::system("You are Printpal."),
            ChatMessage::user("What is warping?"),
            ChatMessage::assistant("The print lifting off the bed as it cools."),
        ];

        let json_str = serde_json::to_string(&messages).unwrap();
        let deserialized: Vec<ChatMessage> = serde_json::from_str(&json_str).unwrap();

        assert_eq!(messages, deserialized);
    }

    #[test]
    fn test_response_shape() {
        let json = json!({
            "choices": [{
                "message": { "content": "Use PLA at 200°C" },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 42,
                "completion_tokens": 7,
                "total_tokens": 49
            }
        });

        let resp: CompletionResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.primary_text(), Some("Use PLA at 200°C"));
        assert_eq!(resp.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.as_ref().unwrap().total_tokens, 49);
    }

    #[test]
    fn test_primary_text_uses_first_choice() {
        let mut resp = CompletionResponse::single("first", "stop");
        resp.choices.push(Choice {
            message: AssistantReply {
                content: "second".to_string(),
            },
            finish_reason: None,
        });

        assert_eq!(resp.primary_text(), Some("first"));
    }

    #[test]
    fn test_primary_text_empty_choices() {
        let resp = CompletionResponse {
            choices: vec![],
            usage: None,
        };
        assert!(resp.primary_text().is_none());
    }

    #[test]
    fn test_usage_totals() {
        let usage = UsageInfo::new(100, 25);
        assert_eq!(usage.total_tokens, 125);
    }
}
