use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use summit_core::ResolveError;

use crate::fetch::{FetchedImage, Fetcher};

/// Pre-programmed reply for deterministic testing without network calls.
#[derive(Clone, Debug)]
pub enum MockReply {
    Json(serde_json::Value),
    Bytes { data: Vec<u8>, content_type: String },
    Error(ResolveError),
}

impl MockReply {
    pub fn jpeg(data: &[u8]) -> Self {
        Self::Bytes {
            data: data.to_vec(),
            content_type: "image/jpeg".to_string(),
        }
    }

    pub fn transport_error() -> Self {
        Self::Error(ResolveError::Transport("connection refused".to_string()))
    }

    pub fn status(status: u16) -> Self {
        Self::Error(ResolveError::Status {
            status,
            url: "mock".to_string(),
        })
    }
}

/// One recorded request.
#[derive(Clone, Debug)]
pub struct MockCall {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// Fetcher that answers from URL-pattern rules and records every call, so
/// tests can assert both outcomes and attempt order. URLs with no matching
/// rule fail with a transport error, which is what an unreachable upstream
/// looks like to the chain.
#[derive(Default)]
pub struct MockFetcher {
    rules: Vec<(String, MockReply)>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reply for any URL containing `pattern`. First match wins.
    pub fn on(mut self, pattern: &str, reply: MockReply) -> Self {
        self.rules.push((pattern.to_string(), reply));
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_urls(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.url.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn reply_for(&self, url: &str, headers: &[(String, String)]) -> MockReply {
        self.calls.lock().push(MockCall {
            url: url.to_string(),
            headers: headers.to_vec(),
        });
        self.rules
            .iter()
            .find(|(pattern, _)| url.contains(pattern))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(MockReply::transport_error)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get_json(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<serde_json::Value, ResolveError> {
        match self.reply_for(url, headers) {
            MockReply::Json(value) => Ok(value),
            MockReply::Error(err) => Err(err),
            MockReply::Bytes { .. } => Err(ResolveError::MalformedBody {
                url: url.to_string(),
                detail: "binary body where JSON was expected".to_string(),
            }),
        }
    }

    async fn get_bytes(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<FetchedImage, ResolveError> {
        match self.reply_for(url, headers) {
            MockReply::Bytes { data, content_type } => Ok(FetchedImage {
                bytes: Bytes::from(data),
                content_type,
            }),
            MockReply::Error(err) => Err(err),
            MockReply::Json(_) => Err(ResolveError::MalformedBody {
                url: url.to_string(),
                detail: "JSON body where bytes were expected".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unmatched_url_fails_like_an_unreachable_upstream() {
        let mock = MockFetcher::new();
        let err = mock.get_json("http://example.com/x", &[]).await.unwrap_err();
        assert!(matches!(err, ResolveError::Transport(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn first_matching_rule_wins() {
        let mock = MockFetcher::new()
            .on("/events", MockReply::Json(serde_json::json!({"first": true})))
            .on("/events/5", MockReply::Json(serde_json::json!({"second": true})));
        let value = mock.get_json("http://x/api/events/5", &[]).await.unwrap();
        assert_eq!(value["first"], true);
    }

    #[tokio::test]
    async fn records_headers_for_assertions() {
        let mock = MockFetcher::new().on("/ok", MockReply::Json(serde_json::json!({})));
        let headers = vec![("Authorization".to_string(), "Bearer t".to_string())];
        mock.get_json("http://x/ok", &headers).await.unwrap();
        assert_eq!(mock.calls()[0].headers, headers);
    }

    #[tokio::test]
    async fn bytes_reply_round_trips() {
        let mock = MockFetcher::new().on("/banner", MockReply::jpeg(&[1, 2, 3]));
        let image = mock.get_bytes("http://x/banner", &[]).await.unwrap();
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.bytes.as_ref(), &[1, 2, 3]);
    }
}
