//! Search source module
//!
//! Defines the searchable sources (document systems and file shares) and
//! provides a registry built from configuration at startup.

mod loader;
mod registry;
mod types;

pub use loader::SourceLoader;
pub use registry::{RegistryError, SourceRegistry};
pub use types::*;
