//! Portal Search: multi-source search for the internal project portal
//!
//! Resolves the user's source filter into backend indexes, sends search
//! requests to the portal API and keeps result pages, pagination and errors
//! in one explicit state value.

pub mod config;
pub mod filter;
pub mod logging;
pub mod metrics;
pub mod network;
pub mod results;
pub mod search;
pub mod sources;

pub use config::Settings;
pub use filter::{resolve_indexes, FilterState};
pub use results::{ErrorKind, ResultItem, SearchError, SearchResultPage, ValidationError};
pub use search::{SearchSession, SearchState, SearchStatus};
pub use sources::{SearchSource, SourceKind, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
