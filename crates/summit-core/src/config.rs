use std::time::Duration;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};

/// Runtime environment. Anything other than `Production` prefers sample
/// data, so development never hammers the live upstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

/// Static settings for the resolution layer, passed by reference into the
/// resolvers. Read-only at request time; the bearer token is the one field
/// with an explicit refresh method instead of ambient mutation.
pub struct PortalConfig {
    /// Base URL of the external event-management API.
    pub upstream_base_url: String,
    /// Same-origin base for internal proxy calls (the server's own
    /// `/api/...` surface, which attaches credentials server-side).
    pub internal_base_url: String,
    /// Prefer the hardcoded sample data set over live calls.
    pub use_sample_data: bool,
    /// Route image requests straight to the static fallback asset.
    pub use_mock_data: bool,
    pub environment: Environment,
    /// Bound on every individual candidate attempt in a fallback chain.
    pub attempt_timeout: Duration,
    /// Redirect target when image resolution degrades completely.
    pub fallback_asset_path: String,
    bearer_token: RwLock<SecretString>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: "https://api.eventsmanager.example.com/v1".to_string(),
            internal_base_url: "http://127.0.0.1:8788".to_string(),
            use_sample_data: false,
            use_mock_data: false,
            environment: Environment::Development,
            attempt_timeout: Duration::from_secs(10),
            fallback_asset_path: "/static/event-placeholder.png".to_string(),
            bearer_token: RwLock::new(SecretString::from("")),
        }
    }
}

impl PortalConfig {
    /// True whenever the sample-data flag is set or the runtime is not
    /// production. Pure function of the config, no side effects.
    pub fn prefer_sample_data(&self) -> bool {
        self.use_sample_data || self.environment != Environment::Production
    }

    /// Single-entry `Authorization` header map. Never fails.
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.bearer_token.read().expose_secret()),
        )]
    }

    /// Explicit token refresh — the only mutation this config supports.
    pub fn set_bearer_token(&self, token: impl Into<String>) {
        *self.bearer_token.write() = SecretString::from(token.into());
    }

    /// URL of an upstream endpoint relative to the upstream base.
    pub fn upstream_url(&self, path: &str) -> String {
        join_url(&self.upstream_base_url, path)
    }

    /// URL of an internal proxy endpoint relative to the portal's own origin.
    pub fn internal_url(&self, path: &str) -> String {
        join_url(&self.internal_base_url, path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
