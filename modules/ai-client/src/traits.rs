use async_trait::async_trait;

use crate::error::Result;
use crate::request::GenerationRequest;

// =============================================================================
// Message Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// =============================================================================
// GenerationBackend Trait
// =============================================================================

/// A model server that turns a [`GenerationRequest`] into content.
///
/// When the request carries an output schema the returned string is JSON text
/// the provider was asked to conform to; otherwise it is free text. Providers
/// report a missing or empty completion as [`crate::AiError::EmptyResponse`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    async fn complete(&self, request: &GenerationRequest) -> Result<String>;
}
