//! Backends that execute search requests

use super::models::SearchRequest;
use crate::config::Settings;
use crate::network::HttpClient;
use crate::results::{SearchError, SearchResponse};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Anything that can answer a [`SearchRequest`]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute one search
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;
}

/// Backend calling the portal's `POST /search/search` endpoint
#[derive(Clone)]
pub struct HttpSearchBackend {
    client: HttpClient,
    endpoint: String,
}

impl HttpSearchBackend {
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Build a client and backend from settings
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        Ok(Self::new(client, settings.search.endpoint.clone()))
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let url = self
            .client
            .url(&self.endpoint)
            .map_err(|e| SearchError::unknown(format!("invalid search endpoint: {}", e)))?;

        debug!(
            "POST {} query='{}' indexes={:?} from={} size={}",
            url, request.query, request.indexes, request.from, request.size
        );

        let response = self.client.post_json(url, request).await.map_err(|e| {
            warn!("Search request failed: {}", e);
            SearchError::from(e)
        })?;

        if !response.is_success() {
            let error = SearchError::from_response(response.status, &response.text);
            warn!("Search returned HTTP {}: {}", response.status, error.user_message());
            return Err(error);
        }

        SearchResponse::parse(&response.text).map_err(|e| {
            warn!("{}", e);
            SearchError::unknown(e.to_string())
        })
    }
}
