use serde::{Deserialize, Serialize};

/// Prompt submitted to `/api/chat`
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Non-empty prompt text
    pub prompt: String,
}

/// Generated text, passed through from the engine verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
