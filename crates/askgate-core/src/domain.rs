//! Domain types shared between the gateway and its AI capability.

use serde::{Deserialize, Serialize};

/// A single prompt submitted to the AI capability.
///
/// Only one prompt is carried; earlier chat turns are not threaded
/// through to the capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    /// The prompt text. Never empty once built by the gateway.
    pub prompt: String,
    /// Model the caller asked for, if any.
    pub model: Option<String>,
}

impl AskRequest {
    /// Create a request without a model hint.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
        }
    }

    /// Attach a model hint.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// A model the AI capability advertises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Identifier clients send back in the `model` field.
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Descriptor whose display name is its id.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }
}
