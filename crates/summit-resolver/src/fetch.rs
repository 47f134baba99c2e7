use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use summit_core::ResolveError;

/// Image payload returned by a successful candidate fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchedImage {
    pub bytes: Bytes,
    pub content_type: String,
}

/// The single seam between the resolvers and the network. Strategies build
/// URLs and header lists; this trait performs the actual request.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET a JSON body. Non-2xx statuses and undecodable bodies are errors.
    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<serde_json::Value, ResolveError>;

    /// GET raw bytes plus their content type.
    async fn get_bytes(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<FetchedImage, ResolveError>;
}

/// Production fetcher backed by reqwest. Every request carries an explicit
/// timeout so a hung upstream cannot stall a fallback chain.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<reqwest::Response, ResolveError> {
        let mut request = self.client.get(url).timeout(self.timeout);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ResolveError::Timeout(self.timeout)
            } else {
                ResolveError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<serde_json::Value, ResolveError> {
        let response = self.get(url, headers).await?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ResolveError::MalformedBody {
                url: url.to_string(),
                detail: e.to_string(),
            })
    }

    async fn get_bytes(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<FetchedImage, ResolveError> {
        let response = self.get(url, headers).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ResolveError::Transport(e.to_string()))?;
        Ok(FetchedImage { bytes, content_type })
    }
}
