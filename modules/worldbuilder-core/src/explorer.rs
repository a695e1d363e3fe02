use std::sync::{Arc, Mutex, MutexGuard};

use ai_client::{truncate_to_char_boundary, GenerationBackend, GenerationRequest};
use tracing::{debug, info};

use crate::config::WorldConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::history::{ConversationTurn, SessionHistory};
use crate::prompts::{EXPLORER_DESCRIPTION, EXPLORER_INSTRUCTIONS};
use crate::world::World;

/// Answers questions about one fixed [`World`].
///
/// The world is shared read-only; the only state that changes between calls
/// is the bounded session history. `ask` takes `&self`, so an explorer can be
/// put behind an `Arc` and asked from several tasks. The history lock is held
/// only to take a snapshot before the backend call and to record the turn
/// after it, never across the await.
pub struct WorldExplorer {
    world: Arc<World>,
    context: String,
    backend: Arc<dyn GenerationBackend>,
    config: WorldConfig,
    history: Mutex<SessionHistory>,
}

impl WorldExplorer {
    pub fn new(world: Arc<World>, backend: Arc<dyn GenerationBackend>, config: WorldConfig) -> Self {
        let context = world.to_context();
        let history = Mutex::new(SessionHistory::new(config.history_length));
        Self {
            world,
            context,
            backend,
            config,
            history,
        }
    }

    /// `None` when there is no world to explore.
    pub fn create(
        world: Option<Arc<World>>,
        backend: Arc<dyn GenerationBackend>,
        config: WorldConfig,
    ) -> Option<Self> {
        world.map(|world| Self::new(world, backend, config))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Stored turns, oldest first.
    pub fn history(&self) -> Vec<ConversationTurn> {
        self.lock_history().to_vec()
    }

    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    pub async fn ask(&self, question: &str) -> GenerationResult<String> {
        let past = self.lock_history().to_messages();

        let request = GenerationRequest::new(&self.config.model, question)
            .description(EXPLORER_DESCRIPTION)
            .instructions(EXPLORER_INSTRUCTIONS.iter().copied())
            .context(self.context.as_str())
            .history(past)
            .temperature(self.config.temperature);

        debug!(
            planet = self.world.planet(),
            backend = self.backend.name(),
            history_messages = request.history.len(),
            "Asking world explorer"
        );
        if self.config.debug_mode {
            info!(system_prompt = %request.system_prompt(), question, "World explorer request");
        }

        let answer = self.backend.complete(&request).await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        if self.config.debug_mode {
            info!(answer, "World explorer raw response");
        } else {
            debug!(
                answer = truncate_to_char_boundary(answer, 200),
                "World explorer response"
            );
        }

        self.lock_history().push(ConversationTurn::new(question, answer));

        Ok(answer.to_string())
    }

    // `push` keeps the deque consistent at every step, so a poisoned lock is still usable.
    fn lock_history(&self) -> MutexGuard<'_, SessionHistory> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_world, ScriptedBackend};
    use ai_client::{AiError, MessageRole};

    fn explorer(backend: Arc<ScriptedBackend>, history_length: usize) -> WorldExplorer {
        WorldExplorer::new(
            Arc::new(sample_world()),
            backend,
            WorldConfig::default().with_history_length(history_length),
        )
    }

    #[test]
    fn create_without_world_is_none() {
        let backend = Arc::new(ScriptedBackend::new());
        assert!(WorldExplorer::create(None, backend.clone(), WorldConfig::default()).is_none());

        let explorer = WorldExplorer::create(
            Some(Arc::new(sample_world())),
            backend,
            WorldConfig::default(),
        );
        assert!(explorer.is_some());
    }

    #[tokio::test]
    async fn request_embeds_world_and_persona() {
        let backend = Arc::new(ScriptedBackend::new().respond("The tides rule all."));
        let explorer = explorer(backend.clone(), 8);

        let answer = explorer.ask("Who rules Vel'Thurin?").await.unwrap();
        assert_eq!(answer, "The tides rule all.");

        let request = &backend.requests()[0];
        assert_eq!(request.input, "Who rules Vel'Thurin?");
        assert_eq!(request.description.as_deref(), Some(EXPLORER_DESCRIPTION));
        assert_eq!(request.instructions.len(), EXPLORER_INSTRUCTIONS.len());
        assert!(request.output_schema.is_none());
        assert_eq!(request.context.as_deref(), Some(sample_world().to_context().as_str()));
        assert!(request.history.is_empty());
    }

    #[tokio::test]
    async fn history_is_sent_on_the_next_turn() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .respond("Salt and silver.")
                .respond("Since the third tide."),
        );
        let explorer = explorer(backend.clone(), 8);

        explorer.ask("What do they trade?").await.unwrap();
        explorer.ask("Since when?").await.unwrap();

        let second = &backend.requests()[1];
        let roles: Vec<MessageRole> = second.history.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
        assert_eq!(second.history[0].content, "What do they trade?");
        assert_eq!(second.history[1].content, "Salt and silver.");
    }

    #[tokio::test]
    async fn history_bound_evicts_oldest() {
        let backend = Arc::new(ScriptedBackend::new().respond("a").respond("b").respond("c"));
        let explorer = explorer(backend, 2);

        explorer.ask("A").await.unwrap();
        explorer.ask("B").await.unwrap();
        explorer.ask("C").await.unwrap();

        let history = explorer.history();
        assert_eq!(
            history,
            vec![ConversationTurn::new("B", "b"), ConversationTurn::new("C", "c")]
        );
    }

    #[tokio::test]
    async fn failures_leave_history_untouched() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .respond("first")
                .fail(AiError::Network("connection refused".into()))
                .respond("   "),
        );
        let explorer = explorer(backend, 8);

        explorer.ask("one").await.unwrap();
        assert!(matches!(
            explorer.ask("two").await,
            Err(GenerationError::Backend(AiError::Network(_)))
        ));
        assert!(matches!(
            explorer.ask("three").await,
            Err(GenerationError::EmptyResponse)
        ));
        assert_eq!(explorer.history(), vec![ConversationTurn::new("one", "first")]);
    }

    #[tokio::test]
    async fn clear_history_forgets_turns() {
        let backend = Arc::new(ScriptedBackend::new().respond("x"));
        let explorer = explorer(backend, 8);
        explorer.ask("q").await.unwrap();
        explorer.clear_history();
        assert!(explorer.history().is_empty());
    }
}
