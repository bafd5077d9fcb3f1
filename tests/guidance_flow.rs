//! End-to-end guidance flow against a file-backed store.

use std::sync::Arc;

use model_guidance::db::Database;
use model_guidance::{DetectionState, GuidanceAction, ModelGuidanceService, StaticCatalog};

const SNAPSHOT: &str = r#"{
    "providers": [
        {
            "id": "openai",
            "name": "OpenAI",
            "enabled": true,
            "models": [{ "id": "gpt-4o" }, { "id": "gpt-4o-mini" }]
        },
        {
            "id": "anthropic",
            "name": "Anthropic",
            "enabled": false,
            "models": [{ "id": "claude", "enabled": true }]
        }
    ]
}"#;

const T0: i64 = 1_760_000_000_000;

#[test]
fn guidance_timing_survives_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("session.db");

    {
        let db = Arc::new(Database::open(&db_path).unwrap());
        let catalog = StaticCatalog::from_json_str(SNAPSHOT).unwrap();
        let service = ModelGuidanceService::new(catalog, db).unwrap();

        let (result, message) = service.take_pending_guidance(T0).unwrap().unwrap();
        assert_eq!(result.state, DetectionState::AllModelsDisabled);
        assert_eq!(result.enabled_models_count, 0);
        assert_eq!(result.provider_details.len(), 2);
        assert_eq!(result.provider_details[1].provider_id, "anthropic");
        assert_eq!(result.provider_details[1].enabled_models_count, 0);
        assert_eq!(
            message.actions,
            vec![GuidanceAction::OpenModelSettings, GuidanceAction::EnableAllModels]
        );
    }

    let db = Arc::new(Database::open(&db_path).unwrap());
    let catalog = StaticCatalog::from_json_str(SNAPSHOT).unwrap();
    let mut service = ModelGuidanceService::new(catalog, db).unwrap();

    assert_eq!(service.session().last_dialog_shown_at().unwrap(), Some(T0));
    assert!(!service.should_show_dialog(T0 + 5_000).unwrap());
    assert!(service.should_show_dialog(T0 + 31_000).unwrap());

    service
        .catalog_mut()
        .set_model_enabled("openai", "gpt-4o", true)
        .unwrap();
    let result = service.detect(T0 + 31_000).unwrap();
    assert_eq!(result.state, DetectionState::HasEnabledModels);
    assert!(!service.should_show_dialog(T0 + 31_000).unwrap());
}

#[test]
fn empty_provider_waits_out_refresh_then_stays_quiet_on_first_setup() {
    let snapshot = r#"{ "providers": [{ "id": "ollama", "name": "Ollama", "enabled": true }] }"#;
    let db = Arc::new(Database::open_in_memory().unwrap());
    let service =
        ModelGuidanceService::new(StaticCatalog::from_json_str(snapshot).unwrap(), db).unwrap();

    service.record_model_refresh("ollama", T0).unwrap();
    let during = service.detect(T0 + 1_000).unwrap();
    assert_eq!(during.state, DetectionState::EmptyModelList);
    assert!(!during.should_show_guidance);
    assert!(during.suggested_actions.is_empty());

    let after = service.detect(T0 + 60_000).unwrap();
    assert!(after.should_show_guidance);
    assert_eq!(after.suggested_actions.len(), 2);

    assert!(!service.should_show_dialog(T0 + 60_000).unwrap());
}
