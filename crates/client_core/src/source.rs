//! Where a controller gets its pages from.

use std::future::Future;

use async_trait::async_trait;
use shared::protocol::{CollectionPage, CollectionQuery};

use crate::error::FetchError;

/// A remote, paginated, sortable read endpoint.
#[async_trait]
pub trait CollectionSource<T>: Send + Sync {
    async fn fetch_page(&self, query: &CollectionQuery) -> Result<CollectionPage<T>, FetchError>;
}

/// Adapts an async closure into a [`CollectionSource`].
pub struct FnSource<F>(F);

pub fn source_fn<F>(fetch_page: F) -> FnSource<F> {
    FnSource(fetch_page)
}

#[async_trait]
impl<T, F, Fut> CollectionSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn(CollectionQuery) -> Fut + Send + Sync,
    Fut: Future<Output = Result<CollectionPage<T>, FetchError>> + Send + 'static,
{
    async fn fetch_page(&self, query: &CollectionQuery) -> Result<CollectionPage<T>, FetchError> {
        (self.0)(query.clone()).await
    }
}

/// Receives user-facing failure messages from a controller.
pub trait ErrorSink: Send + Sync {
    fn on_error(&self, message: &str);
}

impl<F> ErrorSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_error(&self, message: &str) {
        self(message)
    }
}
