//! In-memory model catalog.
//!
//! Hosts that keep their provider configuration in another store implement
//! [`ModelCatalog`] directly; everything else (tests, the CLI, hosts that
//! already hold a JSON dump of their settings) can use [`StaticCatalog`].

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::traits::ModelCatalog;
use crate::model::types::{Model, Provider};
use crate::GuidanceError;

/// Provider entry with its models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub custom_models: Vec<Model>,
}

impl ProviderSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled,
            models: Vec::new(),
            custom_models: Vec::new(),
        }
    }

    pub fn with_models(mut self, models: Vec<Model>) -> Self {
        self.models = models;
        self
    }

    pub fn with_custom_models(mut self, models: Vec<Model>) -> Self {
        self.custom_models = models;
        self
    }

    fn all_models_mut(&mut self) -> impl Iterator<Item = &mut Model> {
        self.models.iter_mut().chain(self.custom_models.iter_mut())
    }
}

/// Full provider/model configuration at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub providers: Vec<ProviderSnapshot>,
}

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    snapshot: CatalogSnapshot,
}

impl StaticCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Result<Self, GuidanceError> {
        validate_snapshot(&snapshot)?;
        Ok(Self { snapshot })
    }

    pub fn from_providers(providers: Vec<ProviderSnapshot>) -> Result<Self, GuidanceError> {
        Self::new(CatalogSnapshot { providers })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, GuidanceError> {
        let snapshot: CatalogSnapshot = serde_json::from_str(raw)
            .map_err(|e| GuidanceError::Snapshot(format!("failed to parse snapshot: {e}")))?;
        Self::new(snapshot)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GuidanceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GuidanceError::Snapshot(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn set_provider_enabled(
        &mut self,
        provider_id: &str,
        enabled: bool,
    ) -> Result<(), GuidanceError> {
        let provider = self.provider_mut(provider_id)?;
        provider.enabled = enabled;
        Ok(())
    }

    /// Toggle every entry with `model_id` (standard and custom) under the provider.
    /// Returns the number of entries changed.
    pub fn set_model_enabled(
        &mut self,
        provider_id: &str,
        model_id: &str,
        enabled: bool,
    ) -> Result<usize, GuidanceError> {
        let provider = self.provider_mut(provider_id)?;
        let mut matched = 0;
        for model in provider.all_models_mut().filter(|m| m.id == model_id) {
            model.enabled = enabled;
            matched += 1;
        }
        if matched == 0 {
            return Err(GuidanceError::Catalog(format!(
                "unknown model {model_id} for provider {provider_id}"
            )));
        }
        Ok(matched)
    }

    fn provider(&self, provider_id: &str) -> Option<&ProviderSnapshot> {
        self.snapshot.providers.iter().find(|p| p.id == provider_id)
    }

    fn provider_mut(&mut self, provider_id: &str) -> Result<&mut ProviderSnapshot, GuidanceError> {
        self.snapshot
            .providers
            .iter_mut()
            .find(|p| p.id == provider_id)
            .ok_or_else(|| GuidanceError::Catalog(format!("unknown provider: {provider_id}")))
    }
}

impl ModelCatalog for StaticCatalog {
    fn providers(&self) -> Result<Vec<Provider>, GuidanceError> {
        Ok(self
            .snapshot
            .providers
            .iter()
            .map(|p| Provider::new(p.id.clone(), p.name.clone(), p.enabled))
            .collect())
    }

    fn standard_models(&self, provider_id: &str) -> Result<Vec<Model>, GuidanceError> {
        Ok(self
            .provider(provider_id)
            .map(|p| p.models.clone())
            .unwrap_or_default())
    }

    fn custom_models(&self, provider_id: &str) -> Result<Vec<Model>, GuidanceError> {
        Ok(self
            .provider(provider_id)
            .map(|p| p.custom_models.clone())
            .unwrap_or_default())
    }

    fn is_model_enabled(&self, provider_id: &str, model_id: &str) -> Result<bool, GuidanceError> {
        let Some(provider) = self.provider(provider_id) else {
            return Ok(false);
        };
        Ok(provider
            .models
            .iter()
            .chain(provider.custom_models.iter())
            .find(|m| m.id == model_id)
            .map(|m| m.enabled)
            .unwrap_or(false))
    }
}

fn validate_snapshot(snapshot: &CatalogSnapshot) -> Result<(), GuidanceError> {
    let mut seen = HashSet::new();
    for provider in &snapshot.providers {
        if provider.id.trim().is_empty() {
            return Err(GuidanceError::Snapshot(
                "provider id cannot be empty".to_string(),
            ));
        }
        if !seen.insert(provider.id.as_str()) {
            return Err(GuidanceError::Snapshot(format!(
                "duplicate provider id: {}",
                provider.id
            )));
        }
    }
    Ok(())
}
