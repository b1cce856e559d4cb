use async_trait::async_trait;
use scrivener_core::ChatMessage;
use thiserror::Error;

/// Failure reported by the surface's input contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// No input or submit affordance is present. May be transient UI state.
    #[error("chat input unavailable")]
    InputUnavailable,
}

/// The external chat UI being driven.
///
/// The host gives no completion callback of any kind; callers infer progress
/// by polling `list_messages` and `is_generating`. Implementations adapt the
/// actual UI toolkit, or stand in as test doubles.
#[async_trait]
pub trait ChatSurface: Send + Sync {
    /// All messages in the conversation, oldest first.
    async fn list_messages(&self) -> Vec<ChatMessage>;

    /// Whether the surface currently shows an in-flight generation.
    async fn is_generating(&self) -> bool;

    /// Types `text` into the input affordance and submits it.
    async fn submit_prompt(&self, text: &str) -> Result<(), SurfaceError>;
}

/// Point-in-time view of the AI-authored tail of the conversation.
/// Recomputed on every poll, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSnapshot {
    /// Number of AI-authored messages observed.
    pub message_count: usize,
    /// Trimmed text of the newest AI message, empty when there is none.
    pub last_text: String,
    /// Character count of `last_text`.
    pub last_length: usize,
}

impl ResponseSnapshot {
    pub fn of_ai_messages(messages: &[ChatMessage]) -> Self {
        let mut message_count = 0;
        let mut last = None;
        for message in messages {
            if !message.is_user {
                message_count += 1;
                last = Some(message);
            }
        }
        let last_text = last.map(|m| m.text.trim().to_string()).unwrap_or_default();
        let last_length = last_text.chars().count();
        Self {
            message_count,
            last_text,
            last_length,
        }
    }
}
