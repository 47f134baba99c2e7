use std::time::Duration;

/// Typed error taxonomy for the resolution pipeline.
///
/// Transport failures, non-success statuses and malformed bodies are all
/// "this tier failed" — the chain moves to the next strategy without
/// inspecting them further (a 404 and a 500 are deliberately equivalent).
/// `Exhausted` is the terminal error a chain returns when every strategy
/// failed; orchestrating callers catch it and degrade to static fallbacks.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ResolveError {
    // Tier failures — caught, logged, next strategy attempted
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("non-success status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("malformed body from {url}: {detail}")]
    MalformedBody { url: String, detail: String },
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    // Terminal
    #[error("{what} resolution exhausted after {} failed strategies", failures.len())]
    Exhausted {
        what: String,
        failures: Vec<(&'static str, Box<ResolveError>)>,
    },
    #[error("event {0} has no image filename")]
    MissingImage(String),
}

impl ResolveError {
    /// True for errors that mean "try the next strategy in the chain".
    pub fn is_tier_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::MalformedBody { .. } | Self::Timeout(_)
        )
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::MalformedBody { .. } => "malformed_body",
            Self::Timeout(_) => "timeout",
            Self::Exhausted { .. } => "exhausted",
            Self::MissingImage(_) => "missing_image",
        }
    }
}
