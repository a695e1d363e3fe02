//! WorldGenerator against a scripted backend: every outcome is either a fully
//! valid world or a typed error, never a partial world.

use std::sync::Arc;

use ai_client::AiError;
use serde_json::json;
use worldbuilder_core::testing::{sample_world_json, ScriptedBackend};
use worldbuilder_core::{GenerationError, WorldConfig, WorldGenerator, WORLD_FIELDS};

fn generator(backend: &Arc<ScriptedBackend>) -> WorldGenerator {
    WorldGenerator::new(backend.clone(), WorldConfig::default())
}

#[tokio::test]
async fn valid_response_yields_populated_world() {
    let backend = Arc::new(ScriptedBackend::new().respond(sample_world_json().to_string()));

    let world = generator(&backend).generate().await.unwrap();

    assert!(!world.planet().is_empty());
    assert!(!world.characteristics().is_empty());
    assert!(!world.cities().is_empty());
    assert!(!world.languages().is_empty());
    for text in [
        world.climate(),
        world.history(),
        world.technology(),
        world.economy(),
        world.timeline(),
        world.power_structure(),
    ] {
        assert!(!text.trim().is_empty());
    }
}

#[tokio::test]
async fn each_missing_field_surfaces_by_name() {
    for field in WORLD_FIELDS {
        let mut body = sample_world_json();
        body.as_object_mut().unwrap().remove(field.name);
        let backend = Arc::new(ScriptedBackend::new().respond(body.to_string()));

        let err = generator(&backend).generate().await.unwrap_err();
        assert!(matches!(err, GenerationError::Schema(_)), "{err:?}");
        assert_eq!(err.schema_field(), Some(field.name));
    }
}

#[tokio::test]
async fn fenced_json_from_chatty_models_is_accepted() {
    let body = format!("```json\n{}\n```", sample_world_json());
    let backend = Arc::new(ScriptedBackend::new().respond(body));

    assert!(generator(&backend).generate().await.is_ok());
}

#[tokio::test]
async fn backend_failure_is_propagated_without_retry() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .fail(AiError::Api {
                status: 500,
                message: "model crashed".into(),
            })
            .respond(sample_world_json().to_string()),
    );

    let err = generator(&backend).generate().await.unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Backend(AiError::Api { status: 500, .. })
    ));
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn prose_without_json_is_malformed() {
    let backend = Arc::new(ScriptedBackend::new().respond("I would love to build a world for you!"));

    let err = generator(&backend).generate().await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedJson(_)));
}

#[tokio::test]
async fn repeated_generation_validates_each_result() {
    let mut second = sample_world_json();
    second["planet"] = json!("Quorrah Minor");
    second["cities"] = json!(["Hollowspire"]);

    let backend = Arc::new(
        ScriptedBackend::new()
            .respond(sample_world_json().to_string())
            .respond(second.to_string()),
    );
    let generator = generator(&backend);

    let first = generator.generate().await.unwrap();
    let second = generator.generate().await.unwrap();

    assert_ne!(first, second);
    assert_eq!(second.planet(), "Quorrah Minor");
    assert_eq!(backend.requests().len(), 2);
    assert_eq!(
        backend.requests()[0].output_schema,
        backend.requests()[1].output_schema
    );
}

#[tokio::test]
async fn generic_planet_is_rejected() {
    let mut body = sample_world_json();
    body["planet"] = json!("Earth");
    let backend = Arc::new(ScriptedBackend::new().respond(body.to_string()));

    let err = generator(&backend).generate().await.unwrap_err();
    assert_eq!(err.schema_field(), Some("planet"));
}
