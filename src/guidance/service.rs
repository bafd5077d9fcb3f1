//! Model guidance service.
//!
//! Composes the catalog, the persisted timing state and the pure detection
//! functions into the calls a UI layer makes: "should I show the setup
//! dialog now?" and "I just showed it".

use std::sync::Arc;

use crate::db::Database;
use crate::detection::{
    classify_with_grace, format_message, should_skip_dialog, GuidanceMessage,
    ModelDetectionResult,
};
use crate::guidance::session::GuidanceSession;
use crate::guidance::settings::{load_detection_settings, DetectionSettings};
use crate::model::ModelCatalog;
use crate::GuidanceError;

pub struct ModelGuidanceService<C: ModelCatalog> {
    catalog: C,
    session: GuidanceSession,
    settings: DetectionSettings,
}

impl<C: ModelCatalog> ModelGuidanceService<C> {
    /// Build a service using the settings stored in `db`.
    pub fn new(catalog: C, db: Arc<Database>) -> Result<Self, GuidanceError> {
        let settings = load_detection_settings(&db)?;
        Ok(Self::with_settings(catalog, db, settings))
    }

    pub fn with_settings(catalog: C, db: Arc<Database>, settings: DetectionSettings) -> Self {
        Self {
            catalog,
            session: GuidanceSession::new(db),
            settings,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }

    pub fn session(&self) -> &GuidanceSession {
        &self.session
    }

    /// Classify the current catalog against the recorded refresh times.
    pub fn detect(&self, now_ms: i64) -> Result<ModelDetectionResult, GuidanceError> {
        let providers = self.catalog.providers()?;
        let refreshed = self.session.refresh_timestamps()?;
        let refreshed = (!refreshed.is_empty()).then_some(&refreshed);
        classify_with_grace(
            &providers,
            &self.catalog,
            refreshed,
            now_ms,
            self.settings.refresh_grace_ms,
        )
    }

    pub fn should_show_dialog(&self, now_ms: i64) -> Result<bool, GuidanceError> {
        Ok(self.pending_guidance(now_ms)?.is_some())
    }

    /// The dialog to show right now, if any. Does not record it as shown.
    pub fn pending_guidance(
        &self,
        now_ms: i64,
    ) -> Result<Option<(ModelDetectionResult, GuidanceMessage)>, GuidanceError> {
        if !self.settings.guidance_enabled {
            return Ok(None);
        }

        let result = self.detect(now_ms)?;
        let last_shown = self.session.last_dialog_shown_at()?;
        if should_skip_dialog(
            &result,
            last_shown,
            self.settings.min_dialog_interval_ms,
            now_ms,
        ) {
            tracing::debug!(state = %result.state, ?last_shown, "guidance dialog suppressed");
            return Ok(None);
        }

        let message = format_message(&result);
        tracing::info!(state = %result.state, title = %message.title, "guidance dialog due");
        Ok(Some((result, message)))
    }

    /// Like [`pending_guidance`](Self::pending_guidance), and records the dialog as shown.
    pub fn take_pending_guidance(
        &self,
        now_ms: i64,
    ) -> Result<Option<(ModelDetectionResult, GuidanceMessage)>, GuidanceError> {
        let pending = self.pending_guidance(now_ms)?;
        if pending.is_some() {
            self.record_dialog_shown(now_ms)?;
        }
        Ok(pending)
    }

    pub fn record_dialog_shown(&self, now_ms: i64) -> Result<(), GuidanceError> {
        self.session.set_last_dialog_shown_at(now_ms)
    }

    pub fn record_model_refresh(&self, provider_id: &str, now_ms: i64) -> Result<(), GuidanceError> {
        tracing::debug!(provider_id, "model list refreshed");
        self.session.record_refresh(provider_id, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectionState, GuidanceAction};
    use crate::testing::{catalog, provider, NOW};
    use pretty_assertions::assert_eq;

    fn service_with(
        providers: Vec<crate::model::ProviderSnapshot>,
    ) -> ModelGuidanceService<crate::model::StaticCatalog> {
        let db = Arc::new(Database::open_in_memory().unwrap());
        ModelGuidanceService::with_settings(catalog(providers), db, DetectionSettings::default())
    }

    #[test]
    fn test_dialog_shown_once_then_rate_limited() {
        let service = service_with(vec![provider("a", true, &[("m", false)], &[])]);

        let (result, message) = service.take_pending_guidance(NOW).unwrap().unwrap();
        assert_eq!(result.state, DetectionState::AllModelsDisabled);
        assert_eq!(message.actions[0], GuidanceAction::OpenModelSettings);
        assert_eq!(service.session().last_dialog_shown_at().unwrap(), Some(NOW));

        assert!(!service.should_show_dialog(NOW + 10_000).unwrap());
        assert!(service.should_show_dialog(NOW + 30_000).unwrap());
    }

    #[test]
    fn test_pending_guidance_does_not_record() {
        let service = service_with(vec![provider("a", false, &[], &[])]);

        assert!(service.pending_guidance(NOW).unwrap().is_some());
        assert!(service.pending_guidance(NOW).unwrap().is_some());
        assert_eq!(service.session().last_dialog_shown_at().unwrap(), None);
    }

    #[test]
    fn test_healthy_catalog_never_shows_dialog() {
        let service = service_with(vec![provider("a", true, &[("m", true)], &[])]);
        assert!(!service.should_show_dialog(NOW).unwrap());
        assert_eq!(service.detect(NOW).unwrap().enabled_models_count, 1);
    }

    #[test]
    fn test_recent_refresh_holds_empty_list_guidance() {
        let service = service_with(vec![
            provider("populated", true, &[("m", false)], &[]),
            provider("empty", true, &[], &[]),
        ]);

        service.record_model_refresh("populated", NOW - 1_000).unwrap();
        let result = service.detect(NOW).unwrap();
        assert_eq!(result.state, DetectionState::EmptyModelList);
        assert!(!result.should_show_guidance);

        let later = service.detect(NOW + 10_000).unwrap();
        assert!(later.should_show_guidance);
    }

    #[test]
    fn test_toggling_a_model_resolves_guidance() {
        let mut service = service_with(vec![provider("a", true, &[("m", false)], &[])]);
        assert!(service.should_show_dialog(NOW).unwrap());

        service.catalog_mut().set_model_enabled("a", "m", true).unwrap();
        assert!(!service.should_show_dialog(NOW).unwrap());
    }

    #[test]
    fn test_disabled_guidance_setting() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let settings = DetectionSettings {
            guidance_enabled: false,
            ..DetectionSettings::default()
        };
        let service = ModelGuidanceService::with_settings(catalog(Vec::new()), db, settings);

        assert_eq!(service.detect(NOW).unwrap().state, DetectionState::NoEnabledModels);
        assert!(!service.should_show_dialog(NOW).unwrap());
    }

    #[test]
    fn test_new_loads_stored_settings() {
        let _guard = crate::testing::ENV_MUTEX
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let db = Arc::new(Database::open_in_memory().unwrap());
        let stored = DetectionSettings {
            refresh_grace_ms: 1_000,
            min_dialog_interval_ms: 5_000,
            guidance_enabled: true,
        };
        crate::guidance::save_detection_settings(&db, &stored).unwrap();

        let service = ModelGuidanceService::new(catalog(Vec::new()), db).unwrap();
        assert_eq!(service.settings().min_dialog_interval_ms, 5_000);
    }
}
