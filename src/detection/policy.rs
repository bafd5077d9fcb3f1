//! Guidance dialog suppression.

use crate::detection::types::{DetectionState, ModelDetectionResult};

/// Minimum time between two guidance dialogs (30 seconds).
pub const DEFAULT_MIN_DIALOG_INTERVAL_MS: u64 = 30_000;

/// Decide whether the guidance dialog should be held back.
///
/// `last_shown_at` is owned by the caller and should only be updated when
/// the dialog is actually displayed. First-time setup of an empty model list
/// is always skipped, whatever the interval.
pub fn should_skip_dialog(
    result: &ModelDetectionResult,
    last_shown_at: Option<i64>,
    min_interval_ms: u64,
    now_ms: i64,
) -> bool {
    if result.state == DetectionState::HasEnabledModels {
        return true;
    }
    if !result.should_show_guidance {
        return true;
    }
    if result.state == DetectionState::EmptyModelList && result.has_first_time_setup() {
        return true;
    }
    if let Some(last_shown_at) = last_shown_at {
        let interval = i64::try_from(min_interval_ms).unwrap_or(i64::MAX);
        if now_ms.saturating_sub(last_shown_at) < interval {
            return true;
        }
    }
    false
}
