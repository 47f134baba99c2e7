use std::sync::Arc;

use summit_core::samples::{default_sample_event, sample_event, sample_events};
use summit_core::{Event, EventId, PortalConfig, ResolveError};
use tracing::info;

use crate::chain::{first_success, Attempt};
use crate::fetch::Fetcher;

/// Outcome of a read-path resolution. Read paths never fail: absence of
/// live data is modeled as `Sample`, not as an error, so callers and tests
/// can still tell genuine data from a degraded default.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<T> {
    /// Fetched from the proxy or upstream tier.
    Live(T),
    /// Served from the fixed sample data set.
    Sample(T),
}

impl<T> Resolution<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Sample(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Self::Live(v) | Self::Sample(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Live(v) | Self::Sample(v) => v,
        }
    }
}

/// Retrieves event records through a layered fallback: internal proxy,
/// then direct upstream with auth headers, then the sample data set.
pub struct EventResolver {
    config: Arc<PortalConfig>,
    fetcher: Arc<dyn Fetcher>,
}

impl EventResolver {
    pub fn new(config: Arc<PortalConfig>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// List all events. Always returns a non-empty result when both network
    /// tiers fail, because the sample set is non-empty.
    pub async fn list_events(&self) -> Resolution<Vec<Event>> {
        let attempts = vec![
            Attempt::new("internal_proxy", self.fetch_list(self.config.internal_url("api/events"), false)),
            Attempt::new("direct_upstream", self.fetch_list(self.config.upstream_url("events"), true)),
        ];

        match first_success("event_list", attempts).await {
            Ok(win) => Resolution::Live(win.value),
            Err(err) => {
                info!(kind = err.error_kind(), "serving sample event list");
                Resolution::Sample(sample_events())
            }
        }
    }

    /// Fetch a single event. Never fails and never returns "not found": an
    /// unknown id degrades to the first sample record.
    pub async fn event_by_id(&self, id: &EventId) -> Resolution<Event> {
        // Development short-circuit: skip the network entirely when sample
        // data is preferred and a matching record exists.
        if self.config.prefer_sample_data() {
            if let Some(event) = sample_event(id) {
                return Resolution::Sample(event);
            }
        }

        // Outgoing URLs keep the id's original lexical form.
        let proxy_url = self.config.internal_url(&format!("api/events/{}", id.as_str()));
        let direct_url = self.config.upstream_url(&format!("events/{}", id.as_str()));
        let attempts = vec![
            Attempt::new("internal_proxy", self.fetch_one(proxy_url, false)),
            Attempt::new("direct_upstream", self.fetch_one(direct_url, true)),
        ];

        match first_success("event", attempts).await {
            Ok(win) => Resolution::Live(win.value),
            Err(err) => {
                info!(id = %id, kind = err.error_kind(), "serving sample event");
                match sample_event(id) {
                    Some(event) => Resolution::Sample(event),
                    // Documented degraded behavior, not an error.
                    None => Resolution::Sample(default_sample_event()),
                }
            }
        }
    }

    async fn fetch_list(&self, url: String, with_auth: bool) -> Result<Vec<Event>, ResolveError> {
        let value = self.get_json(&url, with_auth).await?;
        let mut events: Vec<Event> =
            serde_json::from_value(value).map_err(|e| ResolveError::MalformedBody {
                url: url.clone(),
                detail: e.to_string(),
            })?;
        events.retain(Event::is_renderable);
        Ok(events)
    }

    async fn fetch_one(&self, url: String, with_auth: bool) -> Result<Event, ResolveError> {
        let value = self.get_json(&url, with_auth).await?;
        let event: Event =
            serde_json::from_value(value).map_err(|e| ResolveError::MalformedBody {
                url: url.clone(),
                detail: e.to_string(),
            })?;
        if !event.is_renderable() {
            return Err(ResolveError::MalformedBody {
                url,
                detail: "event record missing id or name".to_string(),
            });
        }
        Ok(event)
    }

    async fn get_json(&self, url: &str, with_auth: bool) -> Result<serde_json::Value, ResolveError> {
        let headers = if with_auth {
            self.config.auth_headers()
        } else {
            Vec::new()
        };
        self.fetcher.get_json(url, &headers).await
    }
}
