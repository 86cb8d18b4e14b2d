//! Search state transitions
//!
//! Every change to a [`SearchState`] goes through [`reduce`], a pure function
//! of the current state and an [`Action`]. It returns the next state and, when
//! the action needs the backend, the request to send. Requests carry the
//! generation that issued them; completions for any older generation are
//! dropped so the visible results always belong to the latest request.

use super::models::{
    PendingRequest, SearchOptions, SearchQuery, SearchRequest, SearchState, SearchStatus,
};
use crate::filter::{resolve_indexes, FilterState};
use crate::results::{SearchError, SearchResponse, SearchResultPage, ValidationError};
use crate::sources::SourceRegistry;

/// Something that can happen to a search
#[derive(Debug, Clone)]
pub enum Action {
    /// Run `text` at `page` with `filter`
    Search {
        text: String,
        page: u32,
        filter: FilterState,
    },
    /// Replace the filter, re-running the active query from page 1
    ChangeFilter(FilterState),
    /// Move the active query to another page
    ChangePage(u32),
    /// A backend request finished
    Completed {
        generation: u64,
        outcome: Result<SearchResponse, SearchError>,
    },
    /// Back to idle, keeping the filter
    Reset,
    /// Tear down; every later action is ignored
    Dispose,
}

/// Result of applying an action
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: SearchState,
    /// Request to send, if the action started a search
    pub request: Option<PendingRequest>,
    /// True when a completion was dropped as stale
    pub discarded: bool,
}

impl Transition {
    fn unchanged(state: SearchState) -> Self {
        Self {
            state,
            request: None,
            discarded: false,
        }
    }

    fn discard(state: SearchState) -> Self {
        Self {
            state,
            request: None,
            discarded: true,
        }
    }
}

/// Apply `action` to `state`
pub fn reduce(
    state: SearchState,
    action: Action,
    registry: &SourceRegistry,
    options: &SearchOptions,
) -> Transition {
    if state.disposed {
        return match action {
            Action::Completed { .. } => Transition::discard(state),
            _ => Transition::unchanged(state),
        };
    }

    match action {
        Action::Search { text, page, filter } => {
            let mut state = state;
            state.filter = filter;
            start_search(state, &text, page, registry, options)
        }
        Action::ChangeFilter(filter) => {
            let mut state = state;
            state.filter = filter;
            match state.active_text().map(str::to_string) {
                Some(text) => start_search(state, &text, 1, registry, options),
                None => Transition::unchanged(state),
            }
        }
        Action::ChangePage(page) => {
            let total_pages = state.total_pages(options.page_size);
            match state.active_text().map(str::to_string) {
                Some(text) if page >= 1 && page <= total_pages => {
                    start_search(state, &text, page, registry, options)
                }
                _ => Transition::unchanged(state),
            }
        }
        Action::Completed {
            generation,
            outcome,
        } => complete(state, generation, outcome),
        Action::Reset => Transition::unchanged(SearchState {
            generation: state.generation,
            ..SearchState::new(state.filter)
        }),
        Action::Dispose => Transition::unchanged(SearchState {
            disposed: true,
            ..state
        }),
    }
}

fn start_search(
    mut state: SearchState,
    text: &str,
    page: u32,
    registry: &SourceRegistry,
    options: &SearchOptions,
) -> Transition {
    let text = text.trim();
    if text.is_empty() {
        return Transition::unchanged(state);
    }

    let query = SearchQuery::new(text, page, options.page_size);
    let indexes = resolve_indexes(&state.filter, registry);

    // Any request still in flight is superseded either way
    state.generation += 1;
    state.query = Some(query.clone());

    if indexes.is_empty() {
        state.status = SearchStatus::Failed;
        state.results = None;
        state.error = Some(ValidationError::NoSourceSelected.into());
        return Transition::unchanged(state);
    }

    state.status = SearchStatus::Searching;
    state.error = None;

    let request = PendingRequest {
        generation: state.generation,
        request: SearchRequest::new(&query, indexes, options.field.as_str()),
    };

    Transition {
        state,
        request: Some(request),
        discarded: false,
    }
}

fn complete(
    mut state: SearchState,
    generation: u64,
    outcome: Result<SearchResponse, SearchError>,
) -> Transition {
    if generation != state.generation || !state.is_searching() {
        return Transition::discard(state);
    }

    match outcome {
        Ok(response) => {
            let page = state.query.as_ref().map(|q| q.page).unwrap_or(1);
            state.status = SearchStatus::Success;
            state.error = None;
            state.results = Some(SearchResultPage {
                items: response.results,
                total_count: response.total,
                page,
            });
        }
        Err(error) => {
            state.status = SearchStatus::Failed;
            state.results = None;
            state.error = Some(error);
        }
    }

    Transition::unchanged(state)
}
