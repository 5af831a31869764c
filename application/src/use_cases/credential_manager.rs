//! Credential Manager use case
//!
//! Owns the process-wide bearer token cache.
//!
//! ```text
//! get_token()
//!   ├─ cached token, now < expires_at ──▶ return (no I/O)
//!   ├─ refresh already in flight ───────▶ await the same refresh
//!   └─ otherwise ───────────────────────▶ start refresh, publish it, await
//! ```
//!
//! A refresh is a single shared future: every caller that misses the cache
//! while it runs waits on it and receives the same token or the same error.
//! The state lock is never held across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anf_domain::AccessToken;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, info, warn};

use crate::ports::{
    clock::Clock,
    identity_provider::{AuthError, IdentityProviderPort},
};

type Refresh = Shared<BoxFuture<'static, Result<AccessToken, AuthError>>>;

#[derive(Default)]
struct CredentialState {
    token: Option<AccessToken>,
    in_flight: Option<Refresh>,
}

/// Cached, single-flight access to bearer tokens
pub struct CredentialManager {
    provider: Arc<dyn IdentityProviderPort>,
    clock: Arc<dyn Clock>,
    state: Mutex<CredentialState>,
}

impl CredentialManager {
    pub fn new(provider: Arc<dyn IdentityProviderPort>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            state: Mutex::new(CredentialState::default()),
        }
    }

    /// Return a usable bearer token, exchanging credentials only when needed.
    ///
    /// On failure the previously cached token (possibly expired) is left in
    /// place and the provider's error is returned.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        let refresh = {
            let mut state = self.lock();
            if let Some(token) = &state.token
                && token.is_valid_at(self.clock.now())
            {
                debug!("Access token cache hit");
                return Ok(token.secret().to_string());
            }

            match state.in_flight.clone() {
                Some(refresh) => {
                    debug!("Joining in-flight token refresh");
                    refresh
                }
                None => {
                    debug!("Access token missing or expired, refreshing");
                    let refresh =
                        exchange(Arc::clone(&self.provider), Arc::clone(&self.clock))
                            .boxed()
                            .shared();
                    state.in_flight = Some(refresh.clone());
                    refresh
                }
            }
        };

        let result = refresh.clone().await;

        {
            let mut state = self.lock();
            // Only the refresh we awaited may be retired. Every caller that
            // joined it gets here; after the first one retires it, `in_flight`
            // is empty or holds a later refresh, so the rest leave state alone.
            if state
                .in_flight
                .as_ref()
                .is_some_and(|current| current.ptr_eq(&refresh))
            {
                state.in_flight = None;
                if let Ok(token) = &result {
                    state.token = Some(token.clone());
                }
            }
        }

        result.map(|token| token.secret().to_string())
    }

    /// Drop the cached token so the next call performs a fresh exchange
    pub fn invalidate(&self) {
        let mut state = self.lock();
        if state.token.take().is_some() {
            info!("Cached access token invalidated");
        }
    }

    /// Expiry of the cached token, if any (already reduced by the safety buffer)
    pub fn cached_expiry(&self) -> Option<DateTime<Utc>> {
        self.lock().token.as_ref().map(AccessToken::expires_at)
    }

    fn lock(&self) -> MutexGuard<'_, CredentialState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn exchange(
    provider: Arc<dyn IdentityProviderPort>,
    clock: Arc<dyn Clock>,
) -> Result<AccessToken, AuthError> {
    let issued_at = clock.now();
    match provider.request_token().await {
        Ok(grant) => {
            let expires_in = grant.expires_in;
            let token = AccessToken::from_grant(grant, issued_at);
            if token.is_valid_at(issued_at) {
                info!("Acquired access token valid until {}", token.expires_at());
            } else {
                // Returned once, then every call exchanges again
                warn!(
                    "Access token lifetime of {}s is within the safety buffer; it will not be reused",
                    expires_in
                );
            }
            Ok(token)
        }
        Err(e) => {
            warn!("Token exchange failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anf_domain::TokenGrant;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Clock that only moves when told to
    pub(crate) struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                now: Mutex::new(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    /// Identity provider that counts exchanges and replays scripted outcomes
    pub(crate) struct CountingProvider {
        calls: AtomicUsize,
        outcomes: Mutex<Vec<Result<TokenGrant, AuthError>>>,
        delay: Option<std::time::Duration>,
    }

    impl CountingProvider {
        /// Always succeeds with `token-<n>` valid for one hour
        pub(crate) fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcomes: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        /// Scripted outcomes first, then falls back to success
        pub(crate) fn scripted(outcomes: Vec<Result<TokenGrant, AuthError>>) -> Self {
            let mut outcomes = outcomes;
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                ..Self::ok()
            }
        }

        pub(crate) fn with_delay(mut self, delay: std::time::Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IdentityProviderPort for CountingProvider {
        async fn request_token(&self) -> Result<TokenGrant, AuthError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.outcomes.lock().unwrap().pop().unwrap_or_else(|| {
                Ok(TokenGrant {
                    access_token: format!("token-{}", n),
                    expires_in: 3600,
                })
            })
        }
    }

    fn manager(provider: &Arc<CountingProvider>, clock: &Arc<ManualClock>) -> CredentialManager {
        CredentialManager::new(provider.clone(), clock.clone())
    }

    #[tokio::test]
    async fn test_back_to_back_calls_exchange_once() {
        let provider = Arc::new(CountingProvider::ok());
        let clock = Arc::new(ManualClock::new());
        let credentials = manager(&provider, &clock);

        assert_eq!(credentials.get_token().await.unwrap(), "token-1");
        assert_eq!(credentials.get_token().await.unwrap(), "token-1");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_token_triggers_exactly_one_refresh() {
        let provider = Arc::new(CountingProvider::ok());
        let clock = Arc::new(ManualClock::new());
        let credentials = manager(&provider, &clock);

        credentials.get_token().await.unwrap();
        let first_expiry = credentials.cached_expiry().unwrap();
        assert_eq!(first_expiry, clock.now() + Duration::seconds(3540));

        clock.advance(Duration::seconds(3540));
        assert_eq!(credentials.get_token().await.unwrap(), "token-2");
        assert_eq!(credentials.get_token().await.unwrap(), "token-2");
        assert_eq!(provider.calls(), 2);

        let second_expiry = credentials.cached_expiry().unwrap();
        assert!(second_expiry > clock.now());
    }

    #[tokio::test]
    async fn test_token_is_reused_until_last_minute() {
        let provider = Arc::new(CountingProvider::ok());
        let clock = Arc::new(ManualClock::new());
        let credentials = manager(&provider, &clock);

        credentials.get_token().await.unwrap();
        clock.advance(Duration::seconds(3539));
        credentials.get_token().await.unwrap();
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let provider = Arc::new(
            CountingProvider::ok().with_delay(std::time::Duration::from_millis(20)),
        );
        let clock = Arc::new(ManualClock::new());
        let credentials = Arc::new(manager(&provider, &clock));

        let tokens = futures::future::join_all((0..16).map(|_| {
            let credentials = Arc::clone(&credentials);
            async move { credentials.get_token().await }
        }))
        .await;

        assert_eq!(provider.calls(), 1);
        assert!(tokens.iter().all(|t| t.as_deref() == Ok("token-1")));
    }

    #[tokio::test]
    async fn test_concurrent_callers_across_tasks_share_one_refresh() {
        let provider = Arc::new(
            CountingProvider::ok().with_delay(std::time::Duration::from_millis(50)),
        );
        let clock = Arc::new(ManualClock::new());
        let credentials = Arc::new(manager(&provider, &clock));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let credentials = Arc::clone(&credentials);
            handles.push(tokio::spawn(async move { credentials.get_token().await }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "token-1");
        }
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_shared_and_leaves_state_untouched() {
        let provider = Arc::new(
            CountingProvider::scripted(vec![
                Ok(TokenGrant {
                    access_token: "first".into(),
                    expires_in: 120,
                }),
                Err(AuthError::Rejected {
                    status: 401,
                    message: "invalid_client".into(),
                }),
            ])
            .with_delay(std::time::Duration::from_millis(10)),
        );
        let clock = Arc::new(ManualClock::new());
        let credentials = Arc::new(manager(&provider, &clock));

        assert_eq!(credentials.get_token().await.unwrap(), "first");
        let stale_expiry = credentials.cached_expiry().unwrap();
        clock.advance(Duration::seconds(120));

        let (a, b) = tokio::join!(credentials.get_token(), credentials.get_token());
        let expected = AuthError::Rejected {
            status: 401,
            message: "invalid_client".into(),
        };
        assert_eq!(a.unwrap_err(), expected);
        assert_eq!(b.unwrap_err(), expected);
        assert_eq!(provider.calls(), 2);
        assert_eq!(credentials.cached_expiry(), Some(stale_expiry));

        // The failed refresh is retired; the next call tries again
        assert_eq!(credentials.get_token().await.unwrap(), "token-3");
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_short_lived_token_is_returned_but_not_reused() {
        let provider = Arc::new(CountingProvider::scripted(vec![Ok(TokenGrant {
            access_token: "brief".into(),
            expires_in: 45,
        })]));
        let clock = Arc::new(ManualClock::new());
        let credentials = manager(&provider, &clock);

        assert_eq!(credentials.get_token().await.unwrap(), "brief");
        assert!(credentials.cached_expiry().unwrap() <= clock.now());

        assert_eq!(credentials.get_token().await.unwrap(), "token-2");
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let provider = Arc::new(CountingProvider::ok());
        let clock = Arc::new(ManualClock::new());
        let credentials = manager(&provider, &clock);

        credentials.get_token().await.unwrap();
        credentials.invalidate();
        assert!(credentials.cached_expiry().is_none());
        assert_eq!(credentials.get_token().await.unwrap(), "token-2");
        assert_eq!(provider.calls(), 2);
    }
}
