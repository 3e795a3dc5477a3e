use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{Clock, CredentialExchange, TokenProvider};
use crate::error::AuthError;
use crate::models::Token;
use crate::utils::log_throttle::LogThrottle;

const CACHE_HIT_LOG_WINDOW: StdDuration = StdDuration::from_secs(30);

/// Holds the current bearer token and refreshes it lazily once it expires.
///
/// The slot lock is held for the whole refresh, so concurrent callers that
/// find the token stale wait for a single exchange and then share its result.
pub struct TokenCache {
    exchange: Arc<dyn CredentialExchange>,
    clock: Arc<dyn Clock>,
    safety_margin: Duration,
    slot: Mutex<Option<Token>>,
    hit_log: LogThrottle,
}

impl TokenCache {
    pub fn new(
        exchange: Arc<dyn CredentialExchange>,
        clock: Arc<dyn Clock>,
        safety_margin: Duration,
    ) -> Self {
        Self {
            exchange,
            clock,
            safety_margin,
            slot: Mutex::new(None),
            hit_log: LogThrottle::new(CACHE_HIT_LOG_WINDOW),
        }
    }

    /// Returns a token that is valid now, exchanging credentials if needed.
    ///
    /// A failed exchange is returned to the caller as-is and leaves the cache empty.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        let mut slot = self.slot.lock().await;

        let now = self.clock.now();
        if let Some(token) = slot.as_ref().filter(|t| t.is_valid_at(now)) {
            if let Some(suppressed_count) = self.hit_log.should_emit() {
                debug!(
                    event_name = "auth.token.cache.hit",
                    event_domain = "auth",
                    expires_at = %token.expires_at,
                    suppressed_count,
                    "bearer token served from cache"
                );
            }
            return Ok(token.value.clone());
        }

        debug!(
            event_name = "auth.token.cache.miss",
            event_domain = "auth",
            had_token = slot.is_some(),
            "bearer token missing or expired, exchanging credentials"
        );

        let issued = match self.exchange.exchange().await {
            Ok(issued) => issued,
            Err(e) => {
                *slot = None;
                warn!(
                    event_name = "auth.token.exchange.failed",
                    event_domain = "auth",
                    "Credential exchange failed: {}",
                    e
                );
                return Err(e);
            }
        };

        let refreshed_at = self.clock.now();
        let token = Token::from_issued(issued, refreshed_at, self.safety_margin);
        if !token.is_valid_at(refreshed_at) {
            warn!(
                safety_margin_secs = self.safety_margin.num_seconds(),
                "Issued token lifetime is shorter than the safety margin; it will not be reused"
            );
        } else {
            info!(
                event_name = "auth.token.refreshed",
                event_domain = "auth",
                expires_at = %token.expires_at,
                "bearer token refreshed"
            );
        }

        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    /// Drops the cached token if it is still `rejected`.
    ///
    /// A token already replaced by a newer refresh is left alone.
    pub async fn invalidate(&self, rejected: &str) {
        let mut slot = self.slot.lock().await;
        if slot.as_ref().is_some_and(|t| t.value == rejected) {
            info!(
                event_name = "auth.token.invalidated",
                event_domain = "auth",
                "cached bearer token discarded after upstream rejection"
            );
            *slot = None;
        }
    }
}

#[async_trait::async_trait]
impl TokenProvider for TokenCache {
    async fn token(&self) -> Result<String, AuthError> {
        self.get_token().await
    }

    async fn invalidate(&self, rejected: &str) {
        TokenCache::invalidate(self, rejected).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ManualClock;
    use crate::models::IssuedToken;
    use chrono::{TimeZone, Utc};
    use http::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Hands out "token-1", "token-2", ... and counts calls.
    struct CountingExchange {
        calls: AtomicUsize,
        expires_in: u64,
        fail: bool,
        delay: StdDuration,
    }

    impl CountingExchange {
        fn new(expires_in: u64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                expires_in,
                fail: false,
                delay: StdDuration::ZERO,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CredentialExchange for CountingExchange {
        async fn exchange(&self) -> Result<IssuedToken, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(AuthError::Rejected {
                    status: StatusCode::UNAUTHORIZED,
                    body: "invalid_client".into(),
                });
            }
            Ok(IssuedToken {
                access_token: format!("token-{}", n),
                expires_in: self.expires_in,
                token_type: Some("bearer".into()),
                scope: Some("content".into()),
            })
        }
    }

    fn setup(exchange: CountingExchange) -> (Arc<CountingExchange>, ManualClock, TokenCache) {
        let exchange = Arc::new(exchange);
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
        let cache = TokenCache::new(
            exchange.clone(),
            Arc::new(clock.clone()),
            Duration::seconds(60),
        );
        (exchange, clock, cache)
    }

    #[tokio::test]
    async fn fresh_token_is_reused_without_exchange() {
        let (exchange, clock, cache) = setup(CountingExchange::new(3600));

        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        clock.advance(Duration::seconds(3000));
        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        assert_eq!(cache.get_token().await.unwrap(), "token-1");

        assert_eq!(exchange.calls(), 1);
    }

    #[tokio::test]
    async fn expired_token_triggers_exactly_one_exchange() {
        let (exchange, clock, cache) = setup(CountingExchange::new(3600));

        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        // Inside the safety margin: 3600 - 60 seconds after issue.
        clock.advance(Duration::seconds(3540));

        assert_eq!(cache.get_token().await.unwrap(), "token-2");
        assert_eq!(cache.get_token().await.unwrap(), "token-2");
        assert_eq!(exchange.calls(), 2);
    }

    #[tokio::test]
    async fn failed_exchange_is_not_cached() {
        let mut failing = CountingExchange::new(3600);
        failing.fail = true;
        let (exchange, _clock, cache) = setup(failing);

        assert!(matches!(
            cache.get_token().await,
            Err(AuthError::Rejected { .. })
        ));
        assert!(cache.get_token().await.is_err());
        assert_eq!(exchange.calls(), 2);
    }

    #[tokio::test]
    async fn lifetime_shorter_than_margin_is_returned_but_not_reused() {
        let (exchange, _clock, cache) = setup(CountingExchange::new(30));

        assert_eq!(cache.get_token().await.unwrap(), "token-1");
        assert_eq!(cache.get_token().await.unwrap(), "token-2");
        assert_eq!(exchange.calls(), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let mut slow = CountingExchange::new(3600);
        slow.delay = StdDuration::from_millis(50);
        let (exchange, _clock, cache) = setup(slow);
        let cache = Arc::new(cache);

        let callers = (0..8).map(|_| {
            let cache = cache.clone();
            async move { cache.get_token().await }
        });
        let results = futures::future::join_all(callers).await;

        assert!(results.iter().all(|r| r.as_deref().ok() == Some("token-1")));
        assert_eq!(exchange.calls(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh_only_for_matching_token() {
        let (exchange, _clock, cache) = setup(CountingExchange::new(3600));

        let first = cache.get_token().await.unwrap();
        cache.invalidate("some-older-token").await;
        assert_eq!(cache.get_token().await.unwrap(), first);

        cache.invalidate(&first).await;
        assert_eq!(cache.get_token().await.unwrap(), "token-2");
        assert_eq!(exchange.calls(), 2);
    }
}
