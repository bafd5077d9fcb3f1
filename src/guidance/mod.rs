//! Host-facing guidance plumbing: settings, timing state and the service
//! that composes them with the classifier.

pub mod service;
pub mod session;
pub mod settings;

pub use service::ModelGuidanceService;
pub use session::GuidanceSession;
pub use settings::{load_detection_settings, save_detection_settings, DetectionSettings};
