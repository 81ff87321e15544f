//! Chat template rendering for Phi-3-style instruct models.
//!
//! Each message becomes `<|role|>\n{content}<|end|>\n`, and the prompt ends
//! with an open `<|assistant|>` header so generation continues as the
//! assistant. The `<|end|>` / `<|user|>` markers double as the fixed stop
//! sequences during generation.

use printpal_core::types::{ChatMessage, Role};

/// Render a message list into a single model prompt.
pub fn render_prompt(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();
    for message in messages {
        let tag = match message.role {
            Role::System => "<|system|>",
            Role::User => "<|user|>",
            Role::Assistant => "<|assistant|>",
        };
        prompt.push_str(tag);
        prompt.push('\n');
        prompt.push_str(&message.content);
        prompt.push_str("<|end|>\n");
    }
    prompt.push_str("<|assistant|>\n");
    prompt
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_turn_prompt() {
        let messages = vec![
            ChatMessage::system("You are a 3D printing expert."),
            ChatMessage::user("What causes stringing?"),
        ];

        let prompt = render_prompt(&messages);
        assert_eq!(
            prompt,
            "<|system|>\nYou are a 3D printing expert.<|end|>\n\
             <|user|>\nWhat causes stringing?<|end|>\n\
             <|assistant|>\n"
        );
    }

    #[test]
    fn test_history_is_rendered_in_order() {
        let messages = vec![
            ChatMessage::system("persona"),
            ChatMessage::user("q1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("q2"),
        ];

        let prompt = render_prompt(&messages);
        let sys = prompt.find("persona").unwrap();
        let q1 = prompt.find("q1").unwrap();
        let a1 = prompt.find("a1").unwrap();
        let q2 = prompt.find("q2").unwrap();
        assert!(sys < q1 && q1 < a1 && a1 < q2);
    }

    #[test]
    fn test_prompt_ends_with_open_assistant_header() {
        let prompt = render_prompt(&[ChatMessage::user("hi")]);
        assert!(prompt.ends_with("<|assistant|>\n"));
        // The open header has no terminator after it.
        assert!(!prompt.ends_with("<|assistant|>\n<|end|>\n"));
    }

    #[test]
    fn test_every_message_is_terminated() {
        let messages = vec![
            ChatMessage::system("s"),
            ChatMessage::user("u"),
            ChatMessage::assistant("a"),
        ];
        let prompt = render_prompt(&messages);
        assert_eq!(prompt.matches("<|end|>").count(), 3);
    }
}
