//! Configuration for the builder and explorer, passed explicitly to each.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use ai_client::{GenerationBackend, Ollama, OpenAiCompatible};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::history::DEFAULT_HISTORY_LENGTH;

pub const DEFAULT_MODEL: &str = "openhermes";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Which model server to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Ollama,
    /// Anything speaking `/v1/chat/completions`
    #[serde(alias = "openai-compatible")]
    OpenAi,
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "openai" | "openai-compatible" => Ok(Provider::OpenAi),
            other => bail!("Unknown provider '{other}', expected 'ollama' or 'openai'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub provider: Provider,
    /// Overrides the provider's default endpoint.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    /// Sampling temperature in [0, 1].
    pub temperature: f32,
    /// Log full prompts and raw responses.
    pub debug_mode: bool,
    /// Turns an explorer remembers.
    pub history_length: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Ollama,
            base_url: None,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            debug_mode: false,
            history_length: DEFAULT_HISTORY_LENGTH,
        }
    }
}

impl WorldConfig {
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature (clamped to 0-1).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = if temperature.is_nan() {
            DEFAULT_TEMPERATURE
        } else {
            temperature.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    pub fn with_history_length(mut self, history_length: usize) -> Self {
        self.history_length = history_length;
        self
    }

    /// Reject values the builder methods would have clamped.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            bail!(
                "temperature must be between 0 and 1, got {}",
                self.temperature
            );
        }
        if self.model.trim().is_empty() {
            bail!("model must not be empty");
        }
        Ok(())
    }

    /// Load from `WORLDBUILDER_*` environment variables (and `.env`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(provider) = lookup("WORLDBUILDER_PROVIDER") {
            config.provider = provider.parse()?;
        }
        config.base_url = lookup("WORLDBUILDER_BASE_URL").filter(|s| !s.is_empty());
        config.api_key = lookup("WORLDBUILDER_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|s| !s.is_empty());
        if let Some(model) = lookup("WORLDBUILDER_MODEL").filter(|s| !s.is_empty()) {
            config.model = model;
        }
        if let Some(temperature) = lookup("WORLDBUILDER_TEMPERATURE") {
            config.temperature = temperature
                .trim()
                .parse()
                .with_context(|| format!("WORLDBUILDER_TEMPERATURE is not a number: {temperature}"))?;
        }
        if let Some(debug) = lookup("WORLDBUILDER_DEBUG") {
            config.debug_mode = matches!(
                debug.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(length) = lookup("WORLDBUILDER_HISTORY_LENGTH") {
            config.history_length = length
                .trim()
                .parse()
                .with_context(|| format!("WORLDBUILDER_HISTORY_LENGTH is not a count: {length}"))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Build the generation backend this config points at.
    pub fn backend(&self) -> Arc<dyn GenerationBackend> {
        match self.provider {
            Provider::Ollama => {
                let mut ollama = Ollama::new();
                if let Some(ref url) = self.base_url {
                    ollama = ollama.with_base_url(url);
                }
                Arc::new(ollama)
            }
            Provider::OpenAi => {
                let mut openai = OpenAiCompatible::new(self.api_key.clone());
                if let Some(ref url) = self.base_url {
                    openai = openai.with_base_url(url);
                }
                Arc::new(openai)
            }
        }
    }

    pub fn log_redacted(&self) {
        fn preview(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => {
                    let n: usize = v.chars().take(5).map(char::len_utf8).sum();
                    format!("{}...({} chars)", &v[..n], v.len())
                }
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!(
            provider = ?self.provider,
            base_url = self.base_url.as_deref().unwrap_or("<default>"),
            api_key = %preview(&self.api_key),
            model = %self.model,
            temperature = self.temperature,
            debug_mode = self.debug_mode,
            history_length = self.history_length,
            "Config loaded"
        );
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<WorldConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: WorldConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}
