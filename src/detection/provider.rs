//! Per-provider model detection.

use crate::detection::types::ProviderModelDetectionResult;
use crate::model::{ModelCatalog, Provider};
use crate::GuidanceError;

/// Count the models of `provider_id` and how many of them are enabled.
///
/// An absent or disabled provider reports zero models without probing the
/// catalog. Standard and custom models are concatenated as-is, so an id that
/// appears in both lists is counted twice.
pub fn detect_provider<C: ModelCatalog + ?Sized>(
    provider_id: &str,
    providers: &[Provider],
    catalog: &C,
) -> Result<ProviderModelDetectionResult, GuidanceError> {
    let Some(provider) = providers.iter().find(|p| p.id == provider_id) else {
        return Ok(ProviderModelDetectionResult::default());
    };
    if !provider.enabled {
        return Ok(ProviderModelDetectionResult::default());
    }

    let mut models = catalog.standard_models(provider_id)?;
    models.extend(catalog.custom_models(provider_id)?);

    let mut enabled_models = 0;
    for model in &models {
        if catalog.is_model_enabled(provider_id, &model.id)? {
            enabled_models += 1;
        }
    }

    Ok(ProviderModelDetectionResult {
        has_enabled_models: enabled_models > 0,
        total_models: models.len(),
        enabled_models,
        is_first_time_setup: models.is_empty(),
    })
}
