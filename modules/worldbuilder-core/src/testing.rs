// Test support: a scripted generation backend and a known-good world.

use std::collections::VecDeque;
use std::sync::Mutex;

use ai_client::{AiError, GenerationBackend, GenerationRequest};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::schema::WorldSchema;
use crate::world::World;

// ---------------------------------------------------------------------------
// ScriptedBackend
// ---------------------------------------------------------------------------

/// Plays back queued outcomes in order and records every request it sees.
/// Builder pattern: `.respond()`, `.fail()`. Running out of script is an error.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, content: impl Into<String>) -> Self {
        self.push(Ok(content.into()));
        self
    }

    pub fn fail(self, error: AiError) -> Self {
        self.push(Err(error));
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, outcome: Result<String, AiError>) {
        self.script.lock().unwrap().push_back(outcome);
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &GenerationRequest) -> ai_client::Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::Config("ScriptedBackend: script exhausted".into())))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A complete, valid world as the backend would return it.
pub fn sample_world_json() -> Value {
    json!({
        "planet": "Vel'Thurin",
        "population": 4_200_000_000u64,
        "characteristics": ["Tidal-locked", "Bioluminescent", "Wartorn"],
        "religions": ["The Church of the Drowned Sun", "Moon-Tithe Ascetics"],
        "scandals": ["The High Tide-Priest secretly married a smuggler queen"],
        "wars": ["The Salt War", "The Hundred-Year Drought Rebellion"],
        "drugs": [],
        "climate": "Eternal dusk monsoon belt between a burning and a frozen hemisphere",
        "cities": ["Ossmere", "Kharavell", "Lantern Deep"],
        "languages": ["Tidespeak", "Old Vellic"],
        "history": "Over 120,000 years the twilight belt rose from scattered reef clans to a single tide-bound theocracy.",
        "technology": "Coral-grown circuitry powered by tidal turbines.",
        "economy": "Salt, silver and pearl-credit flow through the canal guilds.",
        "timeline": "Reef Era, First Tide, Salt War, Drowned Concord, present day.",
        "power_structure": "A council of tide-priests answers to the Drowned Queen."
    })
}

pub fn sample_world() -> World {
    WorldSchema::validate(&sample_world_json()).expect("sample world is valid")
}
