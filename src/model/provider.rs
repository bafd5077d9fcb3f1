//! Model reference parsing utilities.

/// Parse a model reference in `<provider>/<model>` format.
///
/// Only the first `/` separates provider from model, so model ids that
/// themselves contain slashes (`org/model-name`) survive intact.
/// Returns `None` when either side is empty.
pub fn parse_model_ref(value: &str) -> Option<(String, String)> {
    let (provider, model) = value.trim().split_once('/')?;
    let provider = provider.trim();
    let model = model.trim();
    if provider.is_empty() || model.is_empty() {
        return None;
    }
    Some((provider.to_string(), model.to_string()))
}
