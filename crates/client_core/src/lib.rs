use std::{marker::PhantomData, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{AestheticSummary, InvitedUser, TeamMember, UpdateSummary},
    error::{ApiErrorBody, ApiException},
    protocol::{CollectionPage, CollectionQuery},
};
use tracing::debug;
use url::Url;

pub mod controller;
pub mod error;
pub mod pagination;
pub mod source;
pub mod toast;

pub use controller::{
    resolve_query, ControllerState, FetchOutcome, RemoteCollectionController, SortIndicator,
};
pub use error::{ClientError, FetchError};
pub use pagination::page_window;
pub use source::{source_fn, CollectionSource, ErrorSink, FnSource};
pub use toast::{Toast, ToastIntent, ToastQueue};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Name of the query parameter carrying sort direction.
///
/// Older catalog endpoints take `asc`, newer ones `ascending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionParam {
    #[default]
    Asc,
    Ascending,
}

impl DirectionParam {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Ascending => "ascending",
        }
    }
}

/// Entry point to the catalog REST API.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    server_url: Url,
}

impl CatalogClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(server_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let server_url = parse_server_url(server_url)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, server_url })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    pub fn collection<T>(
        &self,
        path: &str,
        direction: DirectionParam,
    ) -> Result<HttpCollection<T>, ClientError> {
        let endpoint = self
            .server_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{path}", self.server_url),
                source,
            })?;
        Ok(HttpCollection {
            http: self.http.clone(),
            endpoint,
            direction,
            filters: Vec::new(),
            _item: PhantomData,
        })
    }

    pub fn aesthetics(&self) -> Result<HttpCollection<AestheticSummary>, ClientError> {
        self.collection("aesthetics", DirectionParam::Asc)
    }

    pub fn updates(&self) -> Result<HttpCollection<UpdateSummary>, ClientError> {
        self.collection("updates", DirectionParam::Asc)
    }

    pub fn team(&self) -> Result<HttpCollection<TeamMember>, ClientError> {
        self.collection("team", DirectionParam::Ascending)
    }

    pub fn invited_users(&self) -> Result<HttpCollection<InvitedUser>, ClientError> {
        self.collection("users/invited", DirectionParam::Ascending)
    }
}

/// Parses a base URL, making sure relative endpoint paths nest under it.
pub fn parse_server_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|source| ClientError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::UnsupportedScheme(url.scheme().to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// A collection endpoint read over HTTP GET.
pub struct HttpCollection<T> {
    http: Client,
    endpoint: Url,
    direction: DirectionParam,
    filters: Vec<(String, String)>,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpCollection<T> {
    /// Adds an endpoint-specific query parameter sent with every page.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn query_params(&self, query: &CollectionQuery) -> Vec<(String, String)> {
        let mut params = self.filters.clone();
        params.push(("page".into(), query.page.to_string()));
        if let Some(field) = &query.sort_field {
            params.push(("sortField".into(), field.clone()));
        }
        if let Some(ascending) = query.ascending {
            params.push((self.direction.as_str().into(), ascending.to_string()));
        }
        params
    }
}

#[async_trait]
impl<T> CollectionSource<T> for HttpCollection<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, query: &CollectionQuery) -> Result<CollectionPage<T>, FetchError> {
        debug!(endpoint = %self.endpoint, page = query.page, "GET collection page");
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(
                        endpoint = %self.endpoint,
                        %status,
                        error = %err,
                        "failed to read error body"
                    );
                    Default::default()
                }
            };
            return Err(ApiException::new(status.as_u16(), ApiErrorBody::from_bytes(&body)).into());
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
