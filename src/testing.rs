//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::model::{Model, ModelCatalog, Provider, ProviderSnapshot, StaticCatalog};
use crate::GuidanceError;

/// Serializes tests that read or write `MODEL_GUIDANCE_*` environment variables.
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Fixed clock for deterministic tests.
pub const NOW: i64 = 1_760_000_000_000;

pub fn models(specs: &[(&str, bool)]) -> Vec<Model> {
    specs.iter().map(|(id, enabled)| Model::new(*id, *enabled)).collect()
}

pub fn provider(
    id: &str,
    enabled: bool,
    standard: &[(&str, bool)],
    custom: &[(&str, bool)],
) -> ProviderSnapshot {
    ProviderSnapshot::new(id, id.to_ascii_uppercase(), enabled)
        .with_models(models(standard))
        .with_custom_models(models(custom))
}

pub fn catalog(providers: Vec<ProviderSnapshot>) -> StaticCatalog {
    StaticCatalog::from_providers(providers).expect("valid fixture catalog")
}

pub fn providers_of(catalog: &StaticCatalog) -> Vec<Provider> {
    catalog.providers().expect("static catalog never fails")
}

/// Wraps a catalog and counts `is_model_enabled` probes per call.
pub struct ProbeCountingCatalog {
    pub inner: StaticCatalog,
    pub probes: AtomicUsize,
}

impl ProbeCountingCatalog {
    pub fn new(inner: StaticCatalog) -> Self {
        Self {
            inner,
            probes: AtomicUsize::new(0),
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl ModelCatalog for ProbeCountingCatalog {
    fn providers(&self) -> Result<Vec<Provider>, GuidanceError> {
        self.inner.providers()
    }

    fn standard_models(&self, provider_id: &str) -> Result<Vec<Model>, GuidanceError> {
        self.inner.standard_models(provider_id)
    }

    fn custom_models(&self, provider_id: &str) -> Result<Vec<Model>, GuidanceError> {
        self.inner.custom_models(provider_id)
    }

    fn is_model_enabled(&self, provider_id: &str, model_id: &str) -> Result<bool, GuidanceError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.inner.is_model_enabled(provider_id, model_id)
    }
}

/// Catalog whose custom-model accessor always fails.
pub struct FailingCatalog;

impl ModelCatalog for FailingCatalog {
    fn providers(&self) -> Result<Vec<Provider>, GuidanceError> {
        Ok(vec![Provider::new("broken", "Broken", true)])
    }

    fn standard_models(&self, _provider_id: &str) -> Result<Vec<Model>, GuidanceError> {
        Ok(vec![Model::new("m1", true)])
    }

    fn custom_models(&self, provider_id: &str) -> Result<Vec<Model>, GuidanceError> {
        Err(GuidanceError::Catalog(format!(
            "custom model store unavailable for {provider_id}"
        )))
    }

    fn is_model_enabled(&self, _provider_id: &str, _model_id: &str) -> Result<bool, GuidanceError> {
        Ok(true)
    }
}
