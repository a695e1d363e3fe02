pub mod error;
pub mod ollama;
pub mod openai;
pub mod request;
pub mod traits;
pub mod util;

pub use error::{AiError, Result};
pub use ollama::Ollama;
pub use openai::{strict_schema, OpenAiCompatible};
pub use request::GenerationRequest;
pub use traits::{GenerationBackend, Message, MessageRole};
pub use util::{extract_json_object, strip_code_blocks, truncate_to_char_boundary};
