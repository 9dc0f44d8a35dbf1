pub mod gemini;
pub mod ollama;

use async_trait::async_trait;

/// Bounded timeout for extraction calls. A timeout is an extraction failure
/// for that turn, never a distinct state.
pub const LLM_TIMEOUT_SECS: u64 = 30;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// One-shot completion. The extraction layer carries all conversational
    /// context inside `user_message`; providers see a single exchange.
    async fn chat(&self, system_prompt: &str, user_message: &str) -> anyhow::Result<String>;
}
