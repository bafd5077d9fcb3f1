//! Model availability classification.
//!
//! Everything in this module is a pure function of its inputs: the catalog
//! snapshot, caller-owned timestamps and `now`. Nothing here reads the
//! clock or keeps state between calls.
//!
//! ## Structure
//!
//! - `types`: Detection states, per-provider results and suggested actions
//! - `provider`: Per-provider detector
//! - `classifier`: Global state classifier
//! - `policy`: Dialog suppression
//! - `message`: Dialog text

pub mod classifier;
pub mod message;
pub mod policy;
pub mod provider;
pub mod types;


pub use classifier::{classify, classify_with_grace, REFRESH_GRACE_MS};
pub use message::{format_message, GuidanceAction, GuidanceMessage};
pub use policy::{should_skip_dialog, DEFAULT_MIN_DIALOG_INTERVAL_MS};
pub use provider::detect_provider;
pub use types::{
    DetectionState, ModelDetectionResult, ProviderDetail, ProviderModelDetectionResult,
    RefreshTimestamps, SuggestedAction,
};
