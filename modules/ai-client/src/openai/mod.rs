mod client;
pub(crate) mod schema;
pub(crate) mod types;

pub use schema::strict_schema;

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AiError, Result};
use crate::request::GenerationRequest;
use crate::traits::GenerationBackend;

use client::{OpenAiClient, OPENAI_API_URL};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// =============================================================================
// OpenAI-compatible Backend
// =============================================================================

/// Any server speaking the `/v1/chat/completions` dialect: OpenAI itself,
/// LM Studio, vLLM, llama.cpp's server.
#[derive(Clone)]
pub struct OpenAiCompatible {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl OpenAiCompatible {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: OPENAI_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AiError::Config("OPENAI_API_KEY environment variable not set".into()))?;
        Ok(Self::new(Some(api_key)))
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

    pub(crate) fn client(&self) -> Result<OpenAiClient> {
        OpenAiClient::new(self.api_key.as_deref(), &self.base_url, self.timeout)
    }
}

#[async_trait]
impl GenerationBackend for OpenAiCompatible {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let messages = request.messages();
        let temperature = request
            .temperature
            .filter(|_| types::accepts_temperature(&request.model));

        let mut chat = types::ChatRequest::new(&request.model)
            .messages(messages.iter())
            .temperature(temperature);

        if let Some(schema) = &request.output_schema {
            debug!(model = %request.model, "Requesting strict JSON schema output");
            chat = chat.json_schema("structured_response", strict_schema(schema));
        }

        self.client()?.chat(&chat).await
    }
}
