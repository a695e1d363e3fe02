//! Schema-constrained world generation.
//!
//! [`WorldGenerator`] asks a generation backend for one [`World`] shaped by
//! [`WorldSchema`]; [`WorldExplorer`] answers follow-up questions about that
//! world while keeping a bounded [`SessionHistory`].

pub mod config;
pub mod error;
pub mod explorer;
pub mod generator;
pub mod history;
pub mod prompts;
pub mod schema;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod world;

pub use config::{load_config, Provider, WorldConfig};
pub use error::{GenerationError, SchemaValidationError};
pub use explorer::WorldExplorer;
pub use generator::WorldGenerator;
pub use history::{ConversationTurn, SessionHistory};
pub use schema::{FieldDescriptor, FieldKind, WorldSchema, WORLD_FIELDS};
pub use world::World;
