//! Search orchestration module
//!
//! Owns query text, filter and page, turns them into backend requests,
//! and keeps the visible results in step with the most recent request.

mod backend;
mod models;
mod pagination;
mod session;
mod state;

pub use backend::{HttpSearchBackend, SearchBackend};
pub use models::*;
pub use pagination::Pagination;
pub use session::SearchSession;
pub use state::{reduce, Action, Transition};
