//! Result types and error taxonomy for search responses
//!
//! Defines the result structures returned by the search API, the response
//! schema (with its legacy fallback) and the categorised search errors.

mod error;
mod types;

pub use error::*;
pub use types::*;
