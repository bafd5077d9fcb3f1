//! Provider and model inputs for detection.
//!
//! ## Structure
//!
//! - `types`: Provider and model records
//! - `traits`: The catalog collaborator trait (ModelCatalog)
//! - `provider`: `<provider>/<model>` reference parsing
//! - `catalog`: In-memory catalog built from a JSON snapshot

pub mod catalog;
pub mod provider;
pub mod traits;
pub mod types;

pub use catalog::{CatalogSnapshot, ProviderSnapshot, StaticCatalog};
pub use provider::parse_model_ref;
pub use traits::ModelCatalog;
pub use types::{Model, Provider};
