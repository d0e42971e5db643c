//! Page/sort state for one server-backed list view.
//!
//! A [`RemoteCollectionController`] owns the list state of a single view
//! (current page, page count, sort column and direction, loaded items) and
//! allows at most one outstanding read against its [`CollectionSource`].
//! Calls made while a read is outstanding are dropped, so a slow response can
//! never overwrite the state produced by a later one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::protocol::{CollectionQuery, PartialQuery};
use tracing::{debug, warn};

use crate::source::{CollectionSource, ErrorSink};

/// Snapshot of a controller's list state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState<T> {
    pub request_in_flight: bool,
    pub current_page: u32,
    pub total_pages: u32,
    pub sort_field: Option<String>,
    pub ascending: Option<bool>,
    /// `None` until the first successful fetch.
    pub items: Option<Vec<T>>,
}

impl<T> Default for ControllerState<T> {
    fn default() -> Self {
        Self {
            request_in_flight: false,
            current_page: 0,
            total_pages: 0,
            sort_field: None,
            ascending: None,
            items: None,
        }
    }
}

impl<T> ControllerState<T> {
    pub fn is_loaded(&self) -> bool {
        self.items.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Asc,
    Desc,
    None,
}

impl SortIndicator {
    pub fn for_field(field: &str, sort_field: Option<&str>, ascending: Option<bool>) -> Self {
        if sort_field != Some(field) {
            Self::None
        } else if ascending == Some(true) {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::None => "none",
        }
    }
}

/// How a single `fetch` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded,
    /// Another fetch was in flight; nothing was requested.
    Skipped,
    /// The read failed and the error sink was notified.
    Failed,
}

/// Fills the omitted parts of `partial` from `state`.
///
/// An omitted page always means page 0, never the current page.
pub fn resolve_query<T>(partial: PartialQuery, state: &ControllerState<T>) -> CollectionQuery {
    CollectionQuery {
        page: partial.page.unwrap_or(0),
        sort_field: partial.sort_field.or_else(|| state.sort_field.clone()),
        ascending: partial.ascending.or(state.ascending),
    }
}

pub struct RemoteCollectionController<T, S> {
    source: S,
    on_error: Arc<dyn ErrorSink>,
    state: Mutex<ControllerState<T>>,
}

impl<T, S> RemoteCollectionController<T, S>
where
    S: CollectionSource<T>,
{
    pub fn new(source: S, on_error: Arc<dyn ErrorSink>) -> Self {
        Self {
            source,
            on_error,
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Seeds the page count shown before the first fetch completes.
    pub fn with_total_pages(self, total_pages: u32) -> Self {
        self.lock_state().total_pages = total_pages;
        self
    }

    pub fn snapshot(&self) -> ControllerState<T>
    where
        T: Clone,
    {
        self.lock_state().clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.lock_state().request_in_flight
    }

    pub fn sort_indicator(&self, field: &str) -> SortIndicator {
        let state = self.lock_state();
        SortIndicator::for_field(field, state.sort_field.as_deref(), state.ascending)
    }

    pub async fn fetch(&self, query: PartialQuery) -> FetchOutcome {
        let query = {
            let mut state = self.lock_state();
            if state.request_in_flight {
                debug!(page = ?query.page, "collection fetch already in flight; skipping");
                return FetchOutcome::Skipped;
            }
            state.request_in_flight = true;
            resolve_query(query, &*state)
        };
        let flight = InFlight::new(&self.state);

        debug!(
            page = query.page,
            sort_field = ?query.sort_field,
            ascending = ?query.ascending,
            "fetching collection page"
        );
        let result = self.source.fetch_page(&query).await;

        let failure = {
            let mut state = self.lock_state();
            state.request_in_flight = false;
            flight.disarm();
            match result {
                Ok(page) => {
                    state.items = Some(page.items);
                    state.total_pages = page.total_pages;
                    None
                }
                Err(err) => Some(err),
            }
        };

        match failure {
            None => FetchOutcome::Loaded,
            Some(err) => {
                warn!(page = query.page, error = %err, "collection fetch failed");
                self.on_error.on_error(&err.user_message());
                FetchOutcome::Failed
            }
        }
    }

    /// Sorts by `field`, flipping direction when it is already the sort
    /// column, and reloads from the first page.
    pub async fn toggle_sort(&self, field: &str) -> FetchOutcome {
        let query = {
            let mut state = self.lock_state();
            let ascending = if state.sort_field.as_deref() == Some(field) {
                state.ascending != Some(true)
            } else {
                true
            };
            state.sort_field = Some(field.to_string());
            state.ascending = Some(ascending);
            state.current_page = 0;
            PartialQuery::page(0).with_sort(field, ascending)
        };
        self.fetch(query).await
    }

    /// Moves to `page` keeping the current sort. The page is not checked
    /// against `total_pages`.
    pub async fn go_to_page(&self, page: u32) -> FetchOutcome {
        let query = {
            let mut state = self.lock_state();
            state.current_page = page;
            PartialQuery {
                page: Some(page),
                sort_field: state.sort_field.clone(),
                ascending: state.ascending,
            }
        };
        self.fetch(query).await
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState<T>> {
        lock(&self.state)
    }
}

fn lock<T>(state: &Mutex<ControllerState<T>>) -> MutexGuard<'_, ControllerState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight flag if a fetch future is dropped before completing.
struct InFlight<'a, T> {
    state: Option<&'a Mutex<ControllerState<T>>>,
}

impl<'a, T> InFlight<'a, T> {
    fn new(state: &'a Mutex<ControllerState<T>>) -> Self {
        Self { state: Some(state) }
    }

    fn disarm(mut self) {
        self.state = None;
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            lock(state).request_in_flight = false;
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
