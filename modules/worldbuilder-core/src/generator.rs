use std::sync::Arc;

use ai_client::{truncate_to_char_boundary, GenerationBackend, GenerationRequest};
use tracing::{debug, info, warn};

use crate::config::WorldConfig;
use crate::error::GenerationResult;
use crate::prompts::{BUILDER_DESCRIPTION, BUILDER_INSTRUCTIONS, DEFAULT_BRIEF};
use crate::schema::WorldSchema;
use crate::world::World;

/// Produces one schema-validated [`World`] per call.
///
/// There is no retry: a backend failure or a response that fails validation
/// is returned to the caller as is.
pub struct WorldGenerator {
    backend: Arc<dyn GenerationBackend>,
    config: WorldConfig,
}

impl WorldGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: WorldConfig) -> Self {
        Self { backend, config }
    }

    /// Generator wired to the backend the config names.
    pub fn from_config(config: WorldConfig) -> Self {
        Self::new(config.backend(), config)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub async fn generate(&self) -> GenerationResult<World> {
        self.generate_from(DEFAULT_BRIEF).await
    }

    /// Generate a world steered by a free-text brief ("a drowned desert world").
    pub async fn generate_from(&self, brief: &str) -> GenerationResult<World> {
        let brief = match brief.trim() {
            "" => DEFAULT_BRIEF,
            trimmed => trimmed,
        };
        let request = self.request(brief);

        info!(
            backend = self.backend.name(),
            model = %self.config.model,
            temperature = self.config.temperature,
            "Generating world"
        );
        if self.config.debug_mode {
            info!(system_prompt = %request.system_prompt(), brief, "World builder request");
        }

        let raw = self.backend.complete(&request).await?;

        if self.config.debug_mode {
            info!(response = %raw, "World builder raw response");
        } else {
            debug!(
                response = truncate_to_char_boundary(&raw, 200),
                "World builder response"
            );
        }

        let world = WorldSchema::parse(&raw).inspect_err(|e| {
            warn!(error = %e, field = e.schema_field(), "Generated world rejected");
        })?;

        info!(
            planet = world.planet(),
            population = world.population(),
            cities = world.cities().len(),
            "World generated"
        );
        Ok(world)
    }

    fn request(&self, brief: &str) -> GenerationRequest {
        GenerationRequest::new(&self.config.model, brief)
            .description(BUILDER_DESCRIPTION)
            .instructions(BUILDER_INSTRUCTIONS.iter().copied())
            .output_schema(WorldSchema::json_schema())
            .temperature(self.config.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_world_json, ScriptedBackend};

    #[tokio::test]
    async fn request_carries_persona_schema_and_settings() {
        let backend = Arc::new(ScriptedBackend::new().respond(sample_world_json().to_string()));
        let generator = WorldGenerator::new(
            backend.clone(),
            WorldConfig::default().with_model("mythomax").with_temperature(0.3),
        );

        generator.generate().await.unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "mythomax");
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.input, DEFAULT_BRIEF);
        assert_eq!(request.description.as_deref(), Some(BUILDER_DESCRIPTION));
        assert_eq!(request.instructions.len(), BUILDER_INSTRUCTIONS.len());
        assert_eq!(request.output_schema, Some(WorldSchema::json_schema()));
        assert!(request.history.is_empty());
        assert!(request.context.is_none());
    }

    #[tokio::test]
    async fn blank_brief_falls_back_to_default() {
        let backend = Arc::new(ScriptedBackend::new().respond(sample_world_json().to_string()));
        let generator = WorldGenerator::new(backend.clone(), WorldConfig::default());

        generator.generate_from("   ").await.unwrap();
        assert_eq!(backend.requests()[0].input, DEFAULT_BRIEF);
    }

    #[tokio::test]
    async fn debug_mode_still_returns_world() {
        let backend = Arc::new(ScriptedBackend::new().respond(sample_world_json().to_string()));
        let generator =
            WorldGenerator::new(backend, WorldConfig::default().with_debug_mode(true));

        let world = generator.generate_from("a tidal world").await.unwrap();
        assert_eq!(world.planet(), "Vel'Thurin");
    }
}
