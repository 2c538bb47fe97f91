//! OpenAI API data models for request/response handling.
//!
//! Domain types live in `askgate-core`; this module only describes the
//! JSON the gateway puts on the wire.

use serde::{Deserialize, Serialize};

/// Placeholder completion id. Every response carries the same value.
pub const COMPLETION_ID: &str = "chatcmpl-xyz";

/// `object` field of completion responses and chunks.
pub const COMPLETION_OBJECT: &str = "chat.completion";

/// Finish reason sent once the answer is complete.
pub const FINISH_STOP: &str = "stop";

// =============================================================================
// Chat Completion Response Types
// =============================================================================

/// Response from /v1/chat/completions endpoint (non-streaming).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
}

/// A single chat completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

/// The assistant's reply in a non-streaming response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

/// Streaming chunk from /v1/chat/completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChunkChoice>,
}

/// A single streaming choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChunkChoice {
    pub index: u32,
    pub delta: ChatDelta,
    pub finish_reason: Option<String>,
}

/// Delta content in streaming response. Empty on the terminal chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// =============================================================================
// Single-shot Ask Types
// =============================================================================

/// Response from the /ask endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskAnswer {
    pub answer: String,
}

// =============================================================================
// Lifecycle Types
// =============================================================================

/// Response from /health.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn running() -> Self {
        Self {
            status: "running".to_string(),
        }
    }
}

/// Response from /kill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KillResponse {
    pub message: String,
}

impl KillResponse {
    pub fn shut_down() -> Self {
        Self {
            message: "Server has been shut down.".to_string(),
        }
    }
}

// =============================================================================
// Error Response Types
// =============================================================================

/// Error body used by every failing route: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_delta_serializes_as_empty_object() {
        let choice = ChatChunkChoice {
            index: 0,
            delta: ChatDelta::default(),
            finish_reason: Some(FINISH_STOP.to_string()),
        };
        let json = serde_json::to_value(&choice).unwrap();
        assert_eq!(json["delta"], serde_json::json!({}));
        assert_eq!(json["finish_reason"], "stop");
    }

    #[test]
    fn test_lifecycle_bodies() {
        assert_eq!(
            serde_json::to_string(&HealthResponse::running()).unwrap(),
            r#"{"status":"running"}"#
        );
        assert_eq!(
            serde_json::to_string(&KillResponse::shut_down()).unwrap(),
            r#"{"message":"Server has been shut down."}"#
        );
    }
}
