//! Guidance dialog text.

use serde::{Deserialize, Serialize};

use crate::detection::types::{DetectionState, ModelDetectionResult};

/// Button shown in the guidance dialog. The host maps each one to a route or command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceAction {
    OpenProviderSettings,
    EnableRecommendedProvider,
    RefreshModelList,
    CheckApiSettings,
    OpenModelSettings,
    EnableAllModels,
}

impl GuidanceAction {
    pub const fn label(&self) -> &'static str {
        match self {
            GuidanceAction::OpenProviderSettings => "Go to settings",
            GuidanceAction::EnableRecommendedProvider => "Enable recommended provider",
            GuidanceAction::RefreshModelList => "Refresh model list",
            GuidanceAction::CheckApiSettings => "Check API settings",
            GuidanceAction::OpenModelSettings => "Manage models",
            GuidanceAction::EnableAllModels => "Enable all models",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceMessage {
    pub title: String,
    pub message: String,
    pub actions: Vec<GuidanceAction>,
}

impl GuidanceMessage {
    pub fn action_labels(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.label()).collect()
    }
}

pub fn format_message(result: &ModelDetectionResult) -> GuidanceMessage {
    match result.state {
        DetectionState::NoEnabledModels => GuidanceMessage {
            title: "No AI provider enabled".to_string(),
            message: "Enable at least one AI provider in settings before starting a chat."
                .to_string(),
            actions: vec![
                GuidanceAction::OpenProviderSettings,
                GuidanceAction::EnableRecommendedProvider,
            ],
        },
        DetectionState::EmptyModelList => GuidanceMessage {
            title: "No models available".to_string(),
            message: "The enabled providers have not returned any models yet. \
                      Check the API key and endpoint, or wait for the model list to finish loading."
                .to_string(),
            actions: vec![
                GuidanceAction::RefreshModelList,
                GuidanceAction::CheckApiSettings,
            ],
        },
        DetectionState::AllModelsDisabled => GuidanceMessage {
            title: "All models are disabled".to_string(),
            message: "Every model of the enabled providers is switched off. \
                      Enable at least one model to start chatting."
                .to_string(),
            actions: vec![
                GuidanceAction::OpenModelSettings,
                GuidanceAction::EnableAllModels,
            ],
        },
        DetectionState::HasEnabledModels => GuidanceMessage {
            title: "Models ready".to_string(),
            message: format!("{} models available", result.enabled_models_count),
            actions: Vec::new(),
        },
    }
}
