//! Timing state that survives between detection calls.
//!
//! The classifier and suppression policy are pure; the timestamps they need
//! live here, in the `settings` table, under the `model_guidance:` prefix.

use std::sync::Arc;

use chrono::Utc;

use crate::db::{queries, Database};
use crate::detection::RefreshTimestamps;
use crate::GuidanceError;

const KEY_PREFIX: &str = "model_guidance:";
const LAST_DIALOG_SHOWN_KEY: &str = "model_guidance:last_dialog_shown_at";
const REFRESH_KEY_PREFIX: &str = "model_guidance:refresh:";

#[derive(Clone)]
pub struct GuidanceSession {
    db: Arc<Database>,
}

impl GuidanceSession {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn last_dialog_shown_at(&self) -> Result<Option<i64>, GuidanceError> {
        read_timestamp(&self.db, LAST_DIALOG_SHOWN_KEY)
    }

    pub fn set_last_dialog_shown_at(&self, at_ms: i64) -> Result<(), GuidanceError> {
        write_timestamp(&self.db, LAST_DIALOG_SHOWN_KEY, at_ms)
    }

    /// Record that `provider_id`'s model list was (re)fetched at `at_ms`.
    pub fn record_refresh(&self, provider_id: &str, at_ms: i64) -> Result<(), GuidanceError> {
        write_timestamp(&self.db, &refresh_key(provider_id), at_ms)
    }

    pub fn clear_refresh(&self, provider_id: &str) -> Result<bool, GuidanceError> {
        Ok(queries::delete_setting(&self.db, &refresh_key(provider_id))?)
    }

    /// Every recorded refresh, keyed by provider id.
    pub fn refresh_timestamps(&self) -> Result<RefreshTimestamps, GuidanceError> {
        let mut timestamps = RefreshTimestamps::new();
        for (key, raw) in queries::list_settings_with_prefix(&self.db, REFRESH_KEY_PREFIX)? {
            let Some(provider_id) = key.strip_prefix(REFRESH_KEY_PREFIX) else {
                continue;
            };
            timestamps.insert(provider_id.to_string(), parse_timestamp(&key, &raw)?);
        }
        Ok(timestamps)
    }

    /// Forget all timing state.
    pub fn reset(&self) -> Result<(), GuidanceError> {
        let removed = queries::delete_settings_with_prefix(&self.db, KEY_PREFIX)?;
        tracing::debug!(removed, "reset guidance session");
        Ok(())
    }
}

fn refresh_key(provider_id: &str) -> String {
    format!("{REFRESH_KEY_PREFIX}{provider_id}")
}

fn read_timestamp(db: &Database, key: &str) -> Result<Option<i64>, GuidanceError> {
    queries::get_setting(db, key)?
        .map(|raw| parse_timestamp(key, &raw))
        .transpose()
}

fn write_timestamp(db: &Database, key: &str, at_ms: i64) -> Result<(), GuidanceError> {
    queries::upsert_setting(db, key, &at_ms.to_string(), &Utc::now().to_rfc3339())?;
    Ok(())
}

fn parse_timestamp(key: &str, raw: &str) -> Result<i64, GuidanceError> {
    serde_json::from_str::<i64>(raw)
        .map_err(|e| GuidanceError::Config(format!("invalid timestamp stored under {key}: {e}")))
}
