mod client;
pub(crate) mod types;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::request::GenerationRequest;
use crate::traits::GenerationBackend;

use client::{OllamaClient, OLLAMA_URL};

// Local models can take minutes on a cold load.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// =============================================================================
// Ollama Backend
// =============================================================================

/// A local Ollama server. Structured requests pass the JSON schema through
/// Ollama's `format` field so decoding is constrained server-side.
#[derive(Clone)]
pub struct Ollama {
    base_url: String,
    timeout: Duration,
}

impl Ollama {
    pub fn new() -> Self {
        Self {
            base_url: OLLAMA_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> Result<OllamaClient> {
        OllamaClient::new(&self.base_url, self.timeout)
    }
}

impl Default for Ollama {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for Ollama {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let messages = request.messages();

        let mut chat = types::ChatRequest::new(&request.model)
            .messages(messages.iter())
            .temperature(request.temperature);

        if let Some(schema) = &request.output_schema {
            chat = chat.format(schema.clone());
        }

        self.client()?.chat(&chat).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AiError;

    #[test]
    fn test_ollama_defaults() {
        let ollama = Ollama::default();
        assert_eq!(ollama.base_url(), "http://localhost:11434");
        assert_eq!(ollama.name(), "ollama");
    }

    #[test]
    fn test_unreachable_server_is_network_error() {
        let ollama = Ollama::new()
            .with_base_url("http://127.0.0.1:9/")
            .with_timeout(Duration::from_secs(2));
        let request = GenerationRequest::new("openhermes", "hello").temperature(0.1);

        let err = tokio_test::block_on(ollama.complete(&request)).unwrap_err();
        assert!(matches!(err, AiError::Network(_)), "got {err:?}");
    }
}
