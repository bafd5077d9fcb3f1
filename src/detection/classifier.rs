//! Global model availability classifier.

use crate::detection::provider::detect_provider;
use crate::detection::types::{
    DetectionState, ModelDetectionResult, ProviderDetail, RefreshTimestamps, SuggestedAction,
};
use crate::model::{ModelCatalog, Provider};
use crate::GuidanceError;

/// Window after a model-list refresh during which an empty list is treated
/// as still loading (5 seconds).
pub const REFRESH_GRACE_MS: u64 = 5_000;

/// Classify the providers using the default refresh grace window.
pub fn classify<C: ModelCatalog + ?Sized>(
    providers: &[Provider],
    catalog: &C,
    refresh_timestamps: Option<&RefreshTimestamps>,
    now_ms: i64,
) -> Result<ModelDetectionResult, GuidanceError> {
    classify_with_grace(providers, catalog, refresh_timestamps, now_ms, REFRESH_GRACE_MS)
}

pub fn classify_with_grace<C: ModelCatalog + ?Sized>(
    providers: &[Provider],
    catalog: &C,
    refresh_timestamps: Option<&RefreshTimestamps>,
    now_ms: i64,
    refresh_grace_ms: u64,
) -> Result<ModelDetectionResult, GuidanceError> {
    let (enabled_providers, disabled_providers): (Vec<&Provider>, Vec<&Provider>) =
        providers.iter().partition(|p| p.enabled);

    let mut total_enabled_models = 0;
    let mut has_any_models = false;
    let mut has_first_time_setup_providers = false;
    let mut provider_details = Vec::with_capacity(providers.len());

    for provider in &enabled_providers {
        let detection = detect_provider(&provider.id, providers, catalog)?;
        total_enabled_models += detection.enabled_models;
        has_any_models |= detection.total_models > 0;
        has_first_time_setup_providers |= detection.is_first_time_setup;

        provider_details.push(ProviderDetail {
            provider_id: provider.id.clone(),
            provider_name: provider.name.clone(),
            is_enabled: true,
            total_models_count: detection.total_models,
            enabled_models_count: detection.enabled_models,
            has_models: detection.total_models > 0,
            is_first_time_setup: detection.is_first_time_setup,
        });
    }

    for provider in &disabled_providers {
        let total_models = catalog.standard_models(&provider.id)?.len()
            + catalog.custom_models(&provider.id)?.len();

        provider_details.push(ProviderDetail {
            provider_id: provider.id.clone(),
            provider_name: provider.name.clone(),
            is_enabled: false,
            total_models_count: total_models,
            enabled_models_count: 0,
            has_models: total_models > 0,
            is_first_time_setup: false,
        });
    }

    let (state, should_show_guidance, suggested_actions) = if enabled_providers.is_empty() {
        (
            DetectionState::NoEnabledModels,
            true,
            vec![SuggestedAction::EnableProvider],
        )
    } else if total_enabled_models > 0 {
        (DetectionState::HasEnabledModels, false, Vec::new())
    } else if !has_any_models || has_first_time_setup_providers {
        let recent = is_recent_refresh(refresh_timestamps, now_ms, refresh_grace_ms);
        let actions = if recent {
            Vec::new()
        } else {
            vec![
                SuggestedAction::VerifyApiConfig,
                SuggestedAction::WaitForModelList,
            ]
        };
        (DetectionState::EmptyModelList, !recent, actions)
    } else {
        (
            DetectionState::AllModelsDisabled,
            true,
            vec![
                SuggestedAction::EnableModel,
                SuggestedAction::ManageModelSettings,
            ],
        )
    };

    tracing::debug!(
        state = %state,
        enabled_providers = enabled_providers.len(),
        enabled_models = total_enabled_models,
        should_show_guidance,
        "classified model availability"
    );

    Ok(ModelDetectionResult {
        state,
        enabled_providers_count: enabled_providers.len(),
        enabled_models_count: total_enabled_models,
        provider_details,
        should_show_guidance,
        suggested_actions,
    })
}

/// True if any provider's model list was refreshed within the grace window.
fn is_recent_refresh(
    refresh_timestamps: Option<&RefreshTimestamps>,
    now_ms: i64,
    refresh_grace_ms: u64,
) -> bool {
    let Some(timestamps) = refresh_timestamps else {
        return false;
    };
    let grace = i64::try_from(refresh_grace_ms).unwrap_or(i64::MAX);
    timestamps
        .values()
        .any(|&ts| now_ms.saturating_sub(ts) < grace)
}
