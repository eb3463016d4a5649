//! Credential storage and bearer-token lifecycle.

use chrono::{DateTime, Duration, Utc};
use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::{Error, Result};

/// Header carrying the account login name.
const LOGIN_HEADER: &str = "login";
/// Header carrying the account password.
const PASSWORD_HEADER: &str = "password";

/// Async callback invoked to obtain a fresh bearer token.
pub type RefreshFn = Box<dyn Fn() -> BoxFuture<'static, Result<IssuedToken>> + Send + Sync>;

/// A freshly issued bearer token with its expiry, returned by a
/// [`RefreshFn`].
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The bearer token value.
    pub token: SecretString,
    /// When the token stops being usable.
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Create an issued token from a plain string and expiry.
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            expires_at,
        }
    }
}

/// Credentials for the CertForge API.
///
/// Exactly one scheme is active per client: either a static
/// login/password pair sent as request headers, or a bearer token with an
/// expiry and an optional refresh callback. Secrets are held as
/// [`SecretString`] and never appear in `Debug` output.
///
/// # Thread Safety
///
/// `Credentials` is shared across all requests of a client. Token state
/// lives behind a read/write lock, and refreshes are serialized through a
/// dedicated mutex so concurrent near-expiry callers coalesce into a
/// single refresh.
#[derive(Clone)]
pub struct Credentials {
    inner: Arc<CredentialsInner>,
}

struct CredentialsInner {
    state: RwLock<CredentialState>,
    refresh_lock: Mutex<()>,
    refresh: Option<RefreshFn>,
}

struct CredentialState {
    login: Option<LoginCredentials>,
    bearer: Option<BearerToken>,
}

struct LoginCredentials {
    username: String,
    password: SecretString,
}

struct BearerToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

impl Credentials {
    /// Create static login/password credentials.
    ///
    /// These never expire from the client's point of view; no refresh is
    /// ever attempted.
    ///
    /// # Example
    ///
    /// ```
    /// use certforge_rs::Credentials;
    ///
    /// let credentials = Credentials::login("api-user", "api-password");
    /// ```
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::build(
            CredentialState {
                login: Some(LoginCredentials {
                    username: username.into(),
                    password: SecretString::from(password.into()),
                }),
                bearer: None,
            },
            None,
        )
    }

    /// Create static bearer-token credentials.
    ///
    /// The token is used as-is for the client's lifetime, even past
    /// `expires_at`; supply a refresh callback via
    /// [`bearer_with_refresh`](Self::bearer_with_refresh) to renew it.
    pub fn bearer(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self::build(
            CredentialState {
                login: None,
                bearer: Some(BearerToken {
                    token: SecretString::from(token.into()),
                    expires_at,
                }),
            },
            None,
        )
    }

    /// Create bearer-token credentials with a refresh callback.
    ///
    /// When the token's remaining lifetime drops below the client's
    /// refresh threshold, the callback is invoked (once, regardless of how
    /// many requests are waiting) and the token and expiry are replaced
    /// atomically.
    ///
    /// # Example
    ///
    /// ```
    /// use certforge_rs::{Credentials, IssuedToken};
    /// use chrono::{Duration, Utc};
    ///
    /// let credentials = Credentials::bearer_with_refresh(
    ///     "initial-token",
    ///     Utc::now() + Duration::minutes(15),
    ///     || {
    ///         Box::pin(async {
    ///             // exchange a long-lived grant for a fresh token here
    ///             Ok(IssuedToken::new("fresh-token", Utc::now() + Duration::minutes(15)))
    ///         })
    ///     },
    /// );
    /// ```
    pub fn bearer_with_refresh<F>(
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
        refresh: F,
    ) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<IssuedToken>> + Send + Sync + 'static,
    {
        Self::build(
            CredentialState {
                login: None,
                bearer: Some(BearerToken {
                    token: SecretString::from(token.into()),
                    expires_at,
                }),
            },
            Some(Box::new(refresh)),
        )
    }

    fn build(state: CredentialState, refresh: Option<RefreshFn>) -> Self {
        Self {
            inner: Arc::new(CredentialsInner {
                state: RwLock::new(state),
                refresh_lock: Mutex::new(()),
                refresh,
            }),
        }
    }

    /// Check whether the bearer token expires within the given buffer.
    ///
    /// Always `false` for login/password credentials.
    pub async fn expires_within(&self, buffer: Duration) -> bool {
        let state = self.inner.state.read().await;
        match &state.bearer {
            Some(bearer) => Utc::now() + buffer >= bearer.expires_at,
            None => false,
        }
    }

    /// The bearer token's expiry, if a bearer token is active.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner
            .state
            .read()
            .await
            .bearer
            .as_ref()
            .map(|bearer| bearer.expires_at)
    }

    /// Make sure the next request can carry usable credentials.
    ///
    /// A no-op for static credentials and for tokens with more than
    /// `threshold` of lifetime left. Otherwise the refresh callback runs
    /// under a mutex; callers that were waiting on the mutex re-check the
    /// expiry and skip their own refresh. Refresh failures propagate to
    /// the in-flight call and are not retried here.
    pub async fn ensure_valid(&self, threshold: Duration) -> Result<()> {
        let Some(refresh) = &self.inner.refresh else {
            return Ok(());
        };
        if !self.expires_within(threshold).await {
            return Ok(());
        }

        let _guard = self.inner.refresh_lock.lock().await;
        if !self.expires_within(threshold).await {
            // another caller refreshed while we waited on the lock
            return Ok(());
        }

        debug!("bearer token near expiry, invoking refresh callback");
        let issued = refresh().await?;
        let expires_at = issued.expires_at;
        let mut state = self.inner.state.write().await;
        state.bearer = Some(BearerToken {
            token: issued.token,
            expires_at,
        });
        info!(%expires_at, "bearer token refreshed");
        Ok(())
    }

    /// Materialize exactly one authentication scheme into request headers.
    ///
    /// An active bearer token takes priority; otherwise the login and
    /// password headers are set. The `Authorization` and password values
    /// are marked sensitive so they stay out of transport logs.
    pub(crate) async fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        let state = self.inner.state.read().await;

        if let Some(bearer) = &state.bearer {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {}", bearer.token.expose_secret()))
                    .map_err(|_| {
                        Error::InvalidInput(
                            "bearer token contains invalid header characters".to_string(),
                        )
                    })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            return Ok(());
        }

        if let Some(login) = &state.login {
            headers.insert(
                HeaderName::from_static(LOGIN_HEADER),
                HeaderValue::from_str(&login.username).map_err(|_| {
                    Error::InvalidInput("login contains invalid header characters".to_string())
                })?,
            );
            let mut password =
                HeaderValue::from_str(login.password.expose_secret()).map_err(|_| {
                    Error::InvalidInput("password contains invalid header characters".to_string())
                })?;
            password.set_sensitive(true);
            headers.insert(HeaderName::from_static(PASSWORD_HEADER), password);
            return Ok(());
        }

        Err(Error::InvalidConfig("no credentials configured".to_string()))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("refreshable", &self.inner.refresh.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::join_all;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn debug_redacts_secrets() {
        let credentials = Credentials::login("api-user", "super-secret-password");
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("super-secret-password"));
        assert!(rendered.contains("REDACTED"));

        let bearer = Credentials::bearer("super-secret-token", Utc::now());
        let rendered = format!("{bearer:?}");
        assert!(!rendered.contains("super-secret-token"));
    }

    #[tokio::test]
    async fn apply_sets_login_and_password_headers() {
        let credentials = Credentials::login("api-user", "hunter2");
        let mut headers = HeaderMap::new();
        credentials.apply(&mut headers).await.unwrap();

        assert_eq!(headers.get("login").unwrap(), "api-user");
        assert_eq!(headers.get("password").unwrap(), "hunter2");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn apply_prefers_bearer_token() {
        let credentials = Credentials::bearer("tok-123", Utc::now() + Duration::hours(1));
        let mut headers = HeaderMap::new();
        credentials.apply(&mut headers).await.unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok-123");
        assert!(headers.get("login").is_none());
        assert!(headers.get("password").is_none());
    }

    #[tokio::test]
    async fn static_credentials_never_refresh() {
        let credentials = Credentials::bearer("tok", Utc::now() - Duration::hours(1));
        // expired, but no callback configured
        credentials.ensure_valid(Duration::seconds(60)).await.unwrap();
        assert!(credentials.expires_within(Duration::zero()).await);
    }

    #[tokio::test]
    async fn fresh_token_skips_refresh() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let credentials = Credentials::bearer_with_refresh(
            "tok",
            Utc::now() + Duration::hours(2),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Ok(IssuedToken::new("new", Utc::now() + Duration::hours(2))) })
            },
        );

        credentials.ensure_valid(Duration::seconds(60)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_callers_coalesce_into_one_refresh() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let credentials = Credentials::bearer_with_refresh(
            "stale",
            Utc::now() + Duration::seconds(5),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Ok(IssuedToken::new("fresh", Utc::now() + Duration::hours(1))) })
            },
        );

        let waves = (0..8).map(|_| credentials.ensure_valid(Duration::seconds(60)));
        for result in join_all(waves).await {
            result.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let mut headers = HeaderMap::new();
        credentials.apply(&mut headers).await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer fresh");
    }

    #[tokio::test]
    async fn refresh_failure_propagates_and_keeps_old_token() {
        let credentials = Credentials::bearer_with_refresh(
            "stale",
            Utc::now() + Duration::seconds(5),
            || Box::pin(async { Err(Error::InvalidInput("grant revoked".to_string())) }),
        );

        let err = credentials
            .ensure_valid(Duration::seconds(60))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let mut headers = HeaderMap::new();
        credentials.apply(&mut headers).await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer stale");
    }
}
