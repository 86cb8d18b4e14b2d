//! Search session driving the state machine against a backend

use super::backend::{HttpSearchBackend, SearchBackend};
use super::models::{PendingRequest, SearchOptions, SearchState};
use super::state::{reduce, Action, Transition};
use crate::config::Settings;
use crate::filter::FilterState;
use crate::metrics::Metrics;
use crate::results::{SearchError, SearchResponse};
use crate::sources::{SourceLoader, SourceRegistry};
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

/// State shared between the session and its request tasks
struct Shared {
    state: Mutex<SearchState>,
    tasks: Mutex<Vec<AbortHandle>>,
    state_tx: watch::Sender<SearchState>,
    registry: Arc<SourceRegistry>,
    options: SearchOptions,
    metrics: Arc<Metrics>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<AbortHandle>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one action through the reducer and publish the new state.
    ///
    /// Publishing happens under the state lock so subscribers see states in
    /// the order they were stored.
    fn apply(&self, action: Action) -> Transition {
        let mut state = self.lock_state();
        let current = std::mem::take(&mut *state);
        let transition = reduce(current, action, &self.registry, &self.options);
        *state = transition.state.clone();

        if !transition.discarded {
            self.state_tx.send_replace(transition.state.clone());
        }
        transition
    }

    fn complete(&self, generation: u64, outcome: Result<SearchResponse, SearchError>) {
        let transition = self.apply(Action::Completed {
            generation,
            outcome,
        });
        if transition.discarded {
            debug!("Discarded stale response for generation {}", generation);
            self.metrics.record_discarded();
            return;
        }

        match transition.state.error {
            Some(ref error) => self.metrics.record_failure(error.kind()),
            None => self.metrics.record_success(),
        }
    }
}

/// One user's search: query, filter, page and results.
///
/// Each search runs as its own task. Responses are applied in request order:
/// a response for a superseded request is dropped when it arrives. Dropping
/// the session (or calling [`SearchSession::dispose`]) aborts every request
/// still in flight.
pub struct SearchSession {
    shared: Arc<Shared>,
    backend: Arc<dyn SearchBackend>,
}

impl SearchSession {
    /// Create a new session
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        registry: Arc<SourceRegistry>,
        options: SearchOptions,
    ) -> Self {
        Self::with_metrics(backend, registry, options, Arc::new(Metrics::new()))
    }

    /// Create a new session reporting into a shared metrics collector
    pub fn with_metrics(
        backend: Arc<dyn SearchBackend>,
        registry: Arc<SourceRegistry>,
        options: SearchOptions,
        metrics: Arc<Metrics>,
    ) -> Self {
        let state = SearchState::default();
        let (state_tx, _) = watch::channel(state.clone());

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                tasks: Mutex::new(Vec::new()),
                state_tx,
                registry,
                options,
                metrics,
            }),
            backend,
        }
    }

    /// Build a session talking to the configured portal API
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        settings.validate()?;
        let registry = Arc::new(SourceLoader::load(settings)?);
        let backend = Arc::new(HttpSearchBackend::from_settings(settings)?);
        info!(
            "Search session ready for {} ({} sources)",
            settings.general.instance_name,
            registry.len()
        );

        Ok(Self::new(backend, registry, SearchOptions::from(&settings.search)))
    }

    /// Search `text` at `page` using `filter`.
    ///
    /// Returns the request task, or `None` when nothing was sent (empty
    /// text, no source selected, or a disposed session). Must be called
    /// from within a Tokio runtime.
    pub fn search(&self, text: &str, page: u32, filter: FilterState) -> Option<JoinHandle<()>> {
        self.dispatch(Action::Search {
            text: text.to_string(),
            page,
            filter,
        })
    }

    /// Search `text` from the first page with the current filter
    pub fn submit(&self, text: &str) -> Option<JoinHandle<()>> {
        let filter = self.shared.lock_state().filter.clone();
        self.search(text, 1, filter)
    }

    /// Replace the filter; an active query is re-run from page 1
    pub fn change_filter(&self, filter: FilterState) -> Option<JoinHandle<()>> {
        self.dispatch(Action::ChangeFilter(filter))
    }

    /// Move to another page of the active query
    pub fn change_page(&self, page: u32) -> Option<JoinHandle<()>> {
        self.dispatch(Action::ChangePage(page))
    }

    /// Clear query and results, keeping the filter
    pub fn reset(&self) {
        self.dispatch(Action::Reset);
    }

    /// Abort in-flight requests and ignore anything that arrives later
    pub fn dispose(&self) {
        self.shared.apply(Action::Dispose);
        let tasks = std::mem::take(&mut *self.shared.lock_tasks());
        for task in &tasks {
            task.abort();
        }
        if !tasks.is_empty() {
            debug!("Aborted {} in-flight search requests", tasks.len());
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SearchState {
        self.shared.lock_state().clone()
    }

    /// Receive every published state change
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state_tx.subscribe()
    }

    /// Page numbers to link from the current result page
    pub fn page_links(&self) -> Option<RangeInclusive<u32>> {
        let options = &self.shared.options;
        self.shared
            .lock_state()
            .pagination(options.page_size)
            .map(|p| p.window(options.page_window))
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.shared.registry
    }

    pub fn options(&self) -> &SearchOptions {
        &self.shared.options
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.shared.metrics
    }

    fn dispatch(&self, action: Action) -> Option<JoinHandle<()>> {
        let transition = self.shared.apply(action);

        if let Some(ref error) = transition.state.error {
            if transition.request.is_none() && error.is_validation() {
                info!("Search not sent: {}", error.user_message());
            }
        }

        transition.request.map(|pending| self.spawn(pending))
    }

    fn spawn(&self, pending: PendingRequest) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let backend = Arc::clone(&self.backend);
        shared.metrics.inc_search();

        debug!(
            "Issuing search generation {} for '{}'",
            pending.generation, pending.request.query
        );

        let handle = tokio::spawn(async move {
            let start = Instant::now();
            let outcome = backend.search(&pending.request).await;
            let elapsed = start.elapsed();

            shared.metrics.record_response_time(elapsed.as_millis() as u64);
            if let Err(ref e) = outcome {
                warn!("Search '{}' failed: {}", pending.request.query, e);
            }

            shared.complete(pending.generation, outcome);
        });

        let mut tasks = self.shared.lock_tasks();
        tasks.retain(|t| !t.is_finished());
        tasks.push(handle.abort_handle());
        handle
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
