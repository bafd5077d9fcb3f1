//! Model availability detection for the chat front-end.
//!
//! Given the configured providers and their models, this crate decides
//! whether the user can chat at all and, if not, whether a setup guidance
//! dialog should be surfaced right now. It handles:
//! - Per-provider model counting
//! - Global state classification and suggested actions
//! - Dialog suppression (rate limiting and grace windows)
//! - Guidance text for the dialog
//! - Persisted timing state and settings
//!
//! # Architecture
//!
//! - `model`: provider/model types and the catalog collaborator trait
//! - `detection`: the pure classifier, suppression policy and formatter
//! - `guidance`: settings, session store and the composing service
//! - `db`: SQLite settings storage

pub mod db;
pub mod detection;
pub mod guidance;
pub mod model;

use serde::Serialize;

pub use detection::{
    classify, detect_provider, format_message, should_skip_dialog, DetectionState,
    GuidanceAction, GuidanceMessage, ModelDetectionResult, ProviderDetail,
    ProviderModelDetectionResult, SuggestedAction,
};
pub use guidance::{DetectionSettings, GuidanceSession, ModelGuidanceService};
pub use model::{CatalogSnapshot, Model, ModelCatalog, Provider, StaticCatalog};

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    #[error("{0}")]
    Db(#[from] db::DbError),
    #[error("config error: {0}")]
    Config(String),
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("invalid snapshot: {0}")]
    Snapshot(String),
}

impl Serialize for GuidanceError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

// ---------------------------------------------------------------------------
// Shared helper functions
// ---------------------------------------------------------------------------

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod testing;
