//! First-success-wins evaluation of an ordered list of named resolution
//! strategies. Priority ordering matters more than latency here: a later
//! strategy is only started after the one before it definitively failed.

use futures::future::BoxFuture;
use summit_core::ResolveError;
use tracing::{debug, warn};

/// A named strategy in a fallback chain. The future is lazy — it performs
/// no work until the chain polls it in turn.
pub struct Attempt<'a, T> {
    pub name: &'static str,
    fut: BoxFuture<'a, Result<T, ResolveError>>,
}

impl<'a, T> Attempt<'a, T> {
    pub fn new(
        name: &'static str,
        fut: impl std::future::Future<Output = Result<T, ResolveError>> + Send + 'a,
    ) -> Self {
        Self {
            name,
            fut: Box::pin(fut),
        }
    }
}

/// A successful chain evaluation: which strategy won, and its value.
#[derive(Debug)]
pub struct ChainWin<T> {
    pub strategy: &'static str,
    pub value: T,
}

/// Evaluate strategies strictly sequentially; the first success wins and
/// later strategies are never started. Each failure is logged and the next
/// strategy attempted unconditionally. When every strategy fails the result
/// is [`ResolveError::Exhausted`] carrying each `(strategy, error)` pair.
pub async fn first_success<T>(
    what: &str,
    attempts: Vec<Attempt<'_, T>>,
) -> Result<ChainWin<T>, ResolveError> {
    let mut failures: Vec<(&'static str, Box<ResolveError>)> = Vec::new();

    for attempt in attempts {
        let name = attempt.name;
        match attempt.fut.await {
            Ok(value) => {
                if failures.is_empty() {
                    debug!(what, strategy = name, "resolved");
                } else {
                    debug!(
                        what,
                        strategy = name,
                        skipped = failures.len(),
                        "resolved after earlier strategies failed"
                    );
                }
                return Ok(ChainWin { strategy: name, value });
            }
            Err(err) => {
                warn!(what, strategy = name, kind = err.error_kind(), error = %err,
                    "resolution strategy failed");
                failures.push((name, Box::new(err)));
            }
        }
    }

    Err(ResolveError::Exhausted {
        what: what.to_string(),
        failures,
    })
}
