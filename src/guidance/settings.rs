//! Detection settings for controlling guidance timing.

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::{queries, Database};
use crate::detection::{DEFAULT_MIN_DIALOG_INTERVAL_MS, REFRESH_GRACE_MS};
use crate::GuidanceError;

pub const DETECTION_SETTINGS_KEY: &str = "model_detection_settings";

/// Longest accepted refresh grace window (one hour).
const MAX_REFRESH_GRACE_MS: u64 = 60 * 60 * 1000;

/// Longest accepted dialog interval (one day).
const MAX_DIALOG_INTERVAL_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// How long after a model-list refresh an empty list counts as loading.
    #[serde(default = "default_refresh_grace_ms")]
    pub refresh_grace_ms: u64,
    /// Minimum time between two guidance dialogs. Zero disables rate limiting.
    #[serde(default = "default_min_dialog_interval_ms")]
    pub min_dialog_interval_ms: u64,
    #[serde(default = "default_guidance_enabled")]
    pub guidance_enabled: bool,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            refresh_grace_ms: default_refresh_grace_ms(),
            min_dialog_interval_ms: default_min_dialog_interval_ms(),
            guidance_enabled: default_guidance_enabled(),
        }
    }
}

impl DetectionSettings {
    pub fn apply_env_overrides(&mut self) {
        if let Some(value) = env_u64("MODEL_GUIDANCE_REFRESH_GRACE_MS") {
            self.refresh_grace_ms = value;
        }
        if let Some(value) = env_u64("MODEL_GUIDANCE_MIN_INTERVAL_MS") {
            self.min_dialog_interval_ms = value;
        }
        if let Ok(value) = std::env::var("MODEL_GUIDANCE_DISABLED") {
            if is_truthy(&value) {
                self.guidance_enabled = false;
            }
        }
    }

    pub fn validate(&self) -> Result<(), GuidanceError> {
        if self.refresh_grace_ms > MAX_REFRESH_GRACE_MS {
            return Err(GuidanceError::Config(format!(
                "refresh grace must be at most {MAX_REFRESH_GRACE_MS} ms, got {}",
                self.refresh_grace_ms
            )));
        }
        if self.min_dialog_interval_ms > MAX_DIALOG_INTERVAL_MS {
            return Err(GuidanceError::Config(format!(
                "dialog interval must be at most {MAX_DIALOG_INTERVAL_MS} ms, got {}",
                self.min_dialog_interval_ms
            )));
        }
        Ok(())
    }
}

/// Load detection settings from the database (or defaults), then apply env overrides.
pub fn load_detection_settings(db: &Database) -> Result<DetectionSettings, GuidanceError> {
    let mut settings = match queries::get_setting(db, DETECTION_SETTINGS_KEY)? {
        Some(raw) => serde_json::from_str::<DetectionSettings>(&raw).map_err(|e| {
            GuidanceError::Config(format!("invalid detection settings in store: {e}"))
        })?,
        None => DetectionSettings::default(),
    };
    settings.apply_env_overrides();
    settings.validate()?;
    Ok(settings)
}

pub fn save_detection_settings(
    db: &Database,
    settings: &DetectionSettings,
) -> Result<(), GuidanceError> {
    settings.validate()?;
    let value = serde_json::to_string(settings)
        .map_err(|e| GuidanceError::Config(format!("failed to serialize settings: {e}")))?;
    queries::upsert_setting(db, DETECTION_SETTINGS_KEY, &value, &Utc::now().to_rfc3339())?;
    Ok(())
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match u64::from_str(raw.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("ignoring {name}={raw}: {e}");
            None
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn default_refresh_grace_ms() -> u64 {
    REFRESH_GRACE_MS
}

fn default_min_dialog_interval_ms() -> u64 {
    DEFAULT_MIN_DIALOG_INTERVAL_MS
}

fn default_guidance_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ENV_MUTEX;
    use pretty_assertions::assert_eq;

    const ENV_VARS: [&str; 3] = [
        "MODEL_GUIDANCE_REFRESH_GRACE_MS",
        "MODEL_GUIDANCE_MIN_INTERVAL_MS",
        "MODEL_GUIDANCE_DISABLED",
    ];

    #[test]
    fn test_defaults_when_nothing_stored() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let db = Database::open_in_memory().unwrap();
        let settings = load_detection_settings(&db).unwrap();
        assert_eq!(settings.refresh_grace_ms, 5_000);
        assert_eq!(settings.min_dialog_interval_ms, 30_000);
        assert!(settings.guidance_enabled);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let settings = DetectionSettings {
            refresh_grace_ms: 2_500,
            min_dialog_interval_ms: 0,
            guidance_enabled: false,
        };
        save_detection_settings(&db, &settings).unwrap();

        let stored = queries::get_setting(&db, DETECTION_SETTINGS_KEY).unwrap().unwrap();
        let parsed: DetectionSettings = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_partial_json_uses_field_defaults() {
        let parsed: DetectionSettings =
            serde_json::from_str(r#"{ "min_dialog_interval_ms": 1000 }"#).unwrap();
        assert_eq!(parsed.min_dialog_interval_ms, 1_000);
        assert_eq!(parsed.refresh_grace_ms, REFRESH_GRACE_MS);
        assert!(parsed.guidance_enabled);
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let db = Database::open_in_memory().unwrap();
        let settings = DetectionSettings {
            refresh_grace_ms: MAX_REFRESH_GRACE_MS + 1,
            ..DetectionSettings::default()
        };
        assert!(matches!(
            save_detection_settings(&db, &settings),
            Err(GuidanceError::Config(_))
        ));

        let settings = DetectionSettings {
            min_dialog_interval_ms: MAX_DIALOG_INTERVAL_MS + 1,
            ..DetectionSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_corrupt_stored_settings_is_config_error() {
        let db = Database::open_in_memory().unwrap();
        queries::upsert_setting(&db, DETECTION_SETTINGS_KEY, "{oops", "now").unwrap();
        assert!(matches!(
            load_detection_settings(&db),
            Err(GuidanceError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        std::env::set_var("MODEL_GUIDANCE_REFRESH_GRACE_MS", "abc");
        std::env::set_var("MODEL_GUIDANCE_MIN_INTERVAL_MS", " 7000 ");
        std::env::set_var("MODEL_GUIDANCE_DISABLED", "yes");
        let mut settings = DetectionSettings::default();
        settings.apply_env_overrides();
        assert_eq!(settings.refresh_grace_ms, REFRESH_GRACE_MS);
        assert_eq!(settings.min_dialog_interval_ms, 7_000);
        assert!(!settings.guidance_enabled);

        std::env::set_var("MODEL_GUIDANCE_REFRESH_GRACE_MS", "1500");
        std::env::set_var("MODEL_GUIDANCE_DISABLED", "no");
        let db = Database::open_in_memory().unwrap();
        let loaded = load_detection_settings(&db).unwrap();
        assert_eq!(loaded.refresh_grace_ms, 1_500);
        assert_eq!(loaded.min_dialog_interval_ms, 7_000);
        assert!(loaded.guidance_enabled);

        std::env::set_var("MODEL_GUIDANCE_MIN_INTERVAL_MS", "999999999999");
        assert!(matches!(
            load_detection_settings(&db),
            Err(GuidanceError::Config(_))
        ));

        for name in ENV_VARS {
            std::env::remove_var(name);
        }
        assert_eq!(load_detection_settings(&db).unwrap(), DetectionSettings::default());
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy(" TRUE "));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }
}
