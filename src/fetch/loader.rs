use super::source::{DataSource, FetchRequest};
use crate::core::config::FetchOptions;
use crate::data::formats::Payload;
use crate::{MapError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Shared async HTTP client for backend requests
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("busmap/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Fetches payloads from the backend's bounding-box JSON endpoint
pub struct HttpDataSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDataSource {
    /// Uses the shared client and its default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
            base_url: base_url.into(),
        }
    }

    /// Builds a dedicated client honouring the configured timeout
    pub fn from_options(options: &FetchOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("busmap/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(options.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: options.base_url.clone(),
        })
    }

    /// Uses a caller-built client, e.g. one with proxies disabled
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Payload> {
        let url = request.url(&self.base_url)?;
        log::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let payload = Payload::from_json_slice(&bytes)?;
        log::debug!(
            "{} returned {} stops, {} pairs",
            url,
            payload.stops.len(),
            payload.pairs.len()
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options_keeps_base_url() {
        let options = FetchOptions {
            base_url: "http://example.test/json/".to_string(),
            ..FetchOptions::default()
        };
        let source = HttpDataSource::from_options(&options).unwrap();
        assert_eq!(source.base_url(), "http://example.test/json/");
    }

    #[tokio::test]
    async fn test_invalid_base_url_fails_before_sending() {
        let source = HttpDataSource::new("::not a url::");
        let request = FetchRequest {
            lat: 51.5,
            lng: 0.7,
            width: 0.1,
            height: 0.1,
            min_freq: 1,
        };
        assert!(matches!(
            source.fetch(&request).await,
            Err(MapError::ParseError(_))
        ));
    }
}
