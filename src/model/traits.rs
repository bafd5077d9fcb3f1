//! Traits for provider/model configuration sources.

use crate::model::types::{Model, Provider};
use crate::GuidanceError;

/// Read-only view of the provider/model configuration.
///
/// Implemented by the host's configuration store. Errors are propagated to
/// the caller of the classifier as-is.
pub trait ModelCatalog: Send + Sync {
    /// Providers in display order.
    fn providers(&self) -> Result<Vec<Provider>, GuidanceError>;

    fn standard_models(&self, provider_id: &str) -> Result<Vec<Model>, GuidanceError>;

    fn custom_models(&self, provider_id: &str) -> Result<Vec<Model>, GuidanceError>;

    fn is_model_enabled(&self, provider_id: &str, model_id: &str) -> Result<bool, GuidanceError>;
}

impl<T: ModelCatalog + ?Sized> ModelCatalog for &T {
    fn providers(&self) -> Result<Vec<Provider>, GuidanceError> {
        (**self).providers()
    }

    fn standard_models(&self, provider_id: &str) -> Result<Vec<Model>, GuidanceError> {
        (**self).standard_models(provider_id)
    }

    fn custom_models(&self, provider_id: &str) -> Result<Vec<Model>, GuidanceError> {
        (**self).custom_models(provider_id)
    }

    fn is_model_enabled(&self, provider_id: &str, model_id: &str) -> Result<bool, GuidanceError> {
        (**self).is_model_enabled(provider_id, model_id)
    }
}
