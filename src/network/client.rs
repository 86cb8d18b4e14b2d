//! HTTP client for talking to the portal API

use crate::config::OutgoingSettings;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Raw HTTP response from the portal API
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl ApiResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client wrapper configured from the outgoing settings
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid base URL: {}", settings.base_url))?;

        let timeout = Duration::try_from_secs_f64(settings.request_timeout)
            .with_context(|| format!("Invalid request timeout: {}", settings.request_timeout))?;

        let mut builder = Client::builder()
            .timeout(timeout)
            .default_headers(Self::default_headers(settings)?)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn default_headers(settings: &OutgoingSettings) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("portal-search/{}", crate::VERSION))?,
        );

        if let Some(ref token) = settings.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Auth token contains invalid header characters")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        for (key, value) in &settings.extra_headers {
            headers.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .with_context(|| format!("Invalid header name: {}", key))?,
                HeaderValue::from_str(value)
                    .with_context(|| format!("Invalid value for header {}", key))?,
            );
        }

        Ok(headers)
    }

    /// Resolve an endpoint path against the base URL
    pub fn url(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{}/{}", base, path))
    }

    /// POST a JSON body
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> std::result::Result<ApiResponse, reqwest::Error> {
        let response = self.client.post(url).json(body).send().await?;
        Self::parse_response(response).await
    }

    async fn parse_response(response: Response) -> std::result::Result<ApiResponse, reqwest::Error> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok(ApiResponse { status, text })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
