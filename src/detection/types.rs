//! Detection result types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Last model-list refresh per provider id, in epoch milliseconds.
pub type RefreshTimestamps = HashMap<String, i64>;

/// Global model availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionState {
    /// No provider is enabled.
    NoEnabledModels,
    /// Enabled providers exist but no models have been listed for them.
    EmptyModelList,
    /// Models exist but every one of them is switched off.
    AllModelsDisabled,
    HasEnabledModels,
}

impl DetectionState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DetectionState::NoEnabledModels => "NO_ENABLED_MODELS",
            DetectionState::EmptyModelList => "EMPTY_MODEL_LIST",
            DetectionState::AllModelsDisabled => "ALL_MODELS_DISABLED",
            DetectionState::HasEnabledModels => "HAS_ENABLED_MODELS",
        }
    }
}

impl fmt::Display for DetectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Corrective step the classifier recommends.
///
/// Identifiers are stable and safe to dispatch on; `label()` is display text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    EnableProvider,
    VerifyApiConfig,
    WaitForModelList,
    EnableModel,
    ManageModelSettings,
}

impl SuggestedAction {
    pub const fn id(&self) -> &'static str {
        match self {
            SuggestedAction::EnableProvider => "enable_provider",
            SuggestedAction::VerifyApiConfig => "verify_api_config",
            SuggestedAction::WaitForModelList => "wait_for_model_list",
            SuggestedAction::EnableModel => "enable_model",
            SuggestedAction::ManageModelSettings => "manage_model_settings",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            SuggestedAction::EnableProvider => "enable at least one AI provider",
            SuggestedAction::VerifyApiConfig => "verify API configuration",
            SuggestedAction::WaitForModelList => "wait for model list to finish loading",
            SuggestedAction::EnableModel => "enable at least one model",
            SuggestedAction::ManageModelSettings => "manage model enablement in settings",
        }
    }
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Model counts for a single provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderModelDetectionResult {
    pub has_enabled_models: bool,
    pub total_models: usize,
    pub enabled_models: usize,
    /// Enabled provider with no models listed yet. Always false for disabled providers.
    pub is_first_time_setup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDetail {
    pub provider_id: String,
    pub provider_name: String,
    pub is_enabled: bool,
    pub total_models_count: usize,
    pub enabled_models_count: usize,
    pub has_models: bool,
    pub is_first_time_setup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDetectionResult {
    pub state: DetectionState,
    pub enabled_providers_count: usize,
    /// Sum over enabled providers only.
    pub enabled_models_count: usize,
    /// Enabled providers first, then disabled ones, each in input order.
    pub provider_details: Vec<ProviderDetail>,
    pub should_show_guidance: bool,
    pub suggested_actions: Vec<SuggestedAction>,
}

impl ModelDetectionResult {
    pub fn has_first_time_setup(&self) -> bool {
        self.provider_details.iter().any(|d| d.is_first_time_setup)
    }

    /// Display labels of the suggested actions, in order.
    pub fn suggested_action_labels(&self) -> Vec<&'static str> {
        self.suggested_actions.iter().map(|a| a.label()).collect()
    }
}
