//! OpenAI chat-completions JSON ⇄ single-prompt ask calls.
//!
//! Requests are read from a loose `serde_json::Value` rather than a typed
//! struct so every shape problem maps to one of the documented messages
//! instead of a generic deserializer error.

use serde_json::Value;

use askgate_core::{AskRequest, CoreError};

use crate::models::{
    AssistantMessage, COMPLETION_ID, COMPLETION_OBJECT, ChatChoice, ChatChunkChoice,
    ChatCompletionChunk, ChatCompletionResponse, ChatDelta, FINISH_STOP,
};

pub const MISSING_MESSAGES: &str = "Missing or invalid 'messages' in request body";
pub const MISSING_CONTENT: &str = "Missing 'content' in the last message";
pub const MISSING_PROMPT: &str = "Missing 'prompt' in request body";

/// A validated chat-completions request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// Requested model, or the configured default.
    pub model: String,
    /// Content of the last message. The only text forwarded.
    pub prompt: String,
    pub stream: bool,
    /// Number of earlier turns that were accepted and dropped.
    pub prior_turns: usize,
}

impl ChatRequest {
    /// Validate a parsed request body.
    pub fn from_json(body: &Value, default_model: &str) -> Result<Self, CoreError> {
        let messages = body
            .get("messages")
            .and_then(Value::as_array)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| CoreError::Validation(MISSING_MESSAGES.to_string()))?;

        let prompt = messages
            .last()
            .and_then(|m| m.get("content"))
            .and_then(flatten_content)
            .ok_or_else(|| CoreError::Validation(MISSING_CONTENT.to_string()))?;

        let model = body
            .get("model")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(default_model)
            .to_string();

        let stream = body.get("stream").and_then(Value::as_bool).unwrap_or(false);

        Ok(Self {
            model,
            prompt,
            stream,
            prior_turns: messages.len() - 1,
        })
    }

    pub fn ask_request(&self) -> AskRequest {
        AskRequest::new(self.prompt.clone()).with_model(self.model.clone())
    }
}

/// Text of a message `content`, or `None` when it is falsy.
///
/// Accepts a plain string or an array of `{"type":"text","text":...}`
/// parts; non-text parts are ignored.
fn flatten_content(content: &Value) -> Option<String> {
    let text = match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter(|p| p.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect(),
        _ => return None,
    };

    (!text.is_empty()).then_some(text)
}

/// Extract the prompt of an `/ask` body.
pub fn parse_ask_prompt(body: &Value) -> Result<String, CoreError> {
    body.get("prompt")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CoreError::Validation(MISSING_PROMPT.to_string()))
}

/// Shared fields of every response object built for one request.
#[derive(Debug, Clone)]
pub struct CompletionEnvelope {
    pub model: String,
    pub created: i64,
}

impl CompletionEnvelope {
    /// Stamp an envelope with the current wall-clock time.
    pub fn now(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            created: chrono::Utc::now().timestamp(),
        }
    }

    /// Non-streaming response carrying the whole answer.
    pub fn full(&self, content: String) -> ChatCompletionResponse {
        ChatCompletionResponse {
            id: COMPLETION_ID.to_string(),
            object: COMPLETION_OBJECT.to_string(),
            created: self.created,
            model: self.model.clone(),
            choices: vec![ChatChoice {
                index: 0,
                message: AssistantMessage {
                    role: "assistant".to_string(),
                    content,
                },
                finish_reason: Some(FINISH_STOP.to_string()),
            }],
        }
    }

    /// Streaming chunk carrying one fragment.
    pub fn chunk(&self, fragment: String) -> ChatCompletionChunk {
        let delta = ChatDelta {
            content: Some(fragment),
        };
        self.chunk_with(delta, None)
    }

    /// Terminal chunk: empty delta, `finish_reason: "stop"`.
    pub fn final_chunk(&self) -> ChatCompletionChunk {
        self.chunk_with(ChatDelta::default(), Some(FINISH_STOP.to_string()))
    }

    fn chunk_with(&self, delta: ChatDelta, finish_reason: Option<String>) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: COMPLETION_ID.to_string(),
            object: COMPLETION_OBJECT.to_string(),
            created: self.created,
            model: self.model.clone(),
            choices: vec![ChatChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        }
    }
}
