//! Search query, request and state models

use super::pagination::Pagination;
use crate::config::SearchSettings;
use crate::filter::FilterState;
use crate::results::{SearchError, SearchResultPage};
use serde::{Deserialize, Serialize};

/// Query text plus paging for one search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// The search text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Results per page
    pub page_size: u32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            text: text.into(),
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Offset of the first hit on this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Check if query is empty
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Body of `POST /search/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Backend indexes to search
    pub indexes: Vec<String>,
    /// Query text
    pub query: String,
    /// Field to match against
    pub field: String,
    /// Page size
    pub size: u32,
    /// Offset of the first hit
    pub from: u64,
}

impl SearchRequest {
    pub fn new(query: &SearchQuery, indexes: Vec<String>, field: impl Into<String>) -> Self {
        Self {
            indexes,
            query: query.text.clone(),
            field: field.into(),
            size: query.page_size,
            from: query.offset(),
        }
    }
}

/// A request tagged with the generation that issued it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub generation: u64,
    pub request: SearchRequest,
}

/// Fixed options for building requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Results per page
    pub page_size: u32,
    /// Field the backend matches against
    pub field: String,
    /// Width of the page link window
    pub page_window: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchSettings::default())
    }
}

impl From<&SearchSettings> for SearchOptions {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            page_size: settings.page_size.max(1),
            field: settings.field.clone(),
            page_window: settings.page_window,
        }
    }
}

/// Lifecycle of the current search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Success,
    Failed,
}

/// Everything the presentation layer reads about a search
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub status: SearchStatus,
    /// Last query issued (or rejected for lack of sources)
    pub query: Option<SearchQuery>,
    /// Active filter
    pub filter: FilterState,
    /// Last successful page
    pub results: Option<SearchResultPage>,
    /// Error of the last failed attempt
    pub error: Option<SearchError>,
    /// Generation of the most recently issued request
    pub generation: u64,
    /// Set once the session is torn down
    pub disposed: bool,
}

impl SearchState {
    pub fn new(filter: FilterState) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn is_searching(&self) -> bool {
        self.status == SearchStatus::Searching
    }

    /// Query text, if a non-empty query is active
    pub fn active_text(&self) -> Option<&str> {
        self.query
            .as_ref()
            .filter(|q| !q.is_empty())
            .map(|q| q.text.as_str())
    }

    /// Pages available for the last successful result page
    pub fn total_pages(&self, page_size: u32) -> u32 {
        self.results
            .as_ref()
            .map(|r| r.total_pages(page_size))
            .unwrap_or(0)
    }

    /// Pagination info for the last successful result page
    pub fn pagination(&self, page_size: u32) -> Option<Pagination> {
        self.results
            .as_ref()
            .map(|r| Pagination::new(r.page, page_size, r.total_count))
    }

    /// User-facing error message, if the last attempt failed
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.user_message())
    }
}
