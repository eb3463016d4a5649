//! Client configuration options.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Hook for customizing the underlying transport before it is built.
///
/// The hook receives the prepared [`reqwest::ClientBuilder`] and returns
/// it, possibly reconfigured (proxies, extra root certificates, connection
/// pool tuning).
pub type TransportHook = Arc<dyn Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync>;

/// Configuration for the CertForge client.
///
/// The base URL and customer URI are mandatory; everything else has a
/// sensible default and can be adjusted with the `with_*` builders.
///
/// # Example
///
/// ```
/// use certforge_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("https://hub.certforge.com/api", "my-customer")
///     .with_timeout(Duration::from_secs(60))
///     .with_concurrency_limit(8)
///     .with_validator_cache(true);
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL for API requests, normalized to exactly one trailing slash.
    pub base_url: String,
    /// Customer identifier sent as the `customerUri` header on every request.
    pub customer_uri: String,
    /// Request timeout applied by the transport.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Retry configuration.
    pub retry: RetryConfig,
    /// Maximum number of simultaneous in-flight requests; unbounded if `None`.
    pub concurrency_limit: Option<usize>,
    /// Whether to track `ETag` validators and send conditional requests.
    pub cache_validators: bool,
    /// Remaining token lifetime (in seconds) below which a refresh is
    /// triggered before the next request.
    pub refresh_threshold_secs: i64,
    /// Optional client TLS certificate presented during the handshake.
    pub identity: Option<reqwest::Identity>,
    /// Optional transport customization hook.
    pub transport_hook: Option<TransportHook>,
}

impl ClientConfig {
    /// Create a configuration for the given API base URL and customer URI.
    ///
    /// The base URL is normalized so that it ends with exactly one slash;
    /// relative request paths are appended directly to it.
    pub fn new(base_url: impl Into<String>, customer_uri: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            customer_uri: customer_uri.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("certforge-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
            concurrency_limit: None,
            cache_validators: false,
            refresh_threshold_secs: 60,
            identity: None,
            transport_hook: None,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Bound the number of simultaneous in-flight requests.
    ///
    /// Values below 1 are treated as 1.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = Some(limit.max(1));
        self
    }

    /// Enable or disable the `ETag` validator cache.
    pub fn with_validator_cache(mut self, enabled: bool) -> Self {
        self.cache_validators = enabled;
        self
    }

    /// Set the remaining-lifetime threshold that triggers a token refresh.
    pub fn with_refresh_threshold(mut self, secs: i64) -> Self {
        self.refresh_threshold_secs = secs;
        self
    }

    /// Present a client TLS certificate during the handshake.
    pub fn with_identity(mut self, identity: reqwest::Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Customize the transport before it is built.
    pub fn with_transport_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync + 'static,
    {
        self.transport_hook = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("customer_uri", &self.customer_uri)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .field("concurrency_limit", &self.concurrency_limit)
            .field("cache_validators", &self.cache_validators)
            .field("refresh_threshold_secs", &self.refresh_threshold_secs)
            .field("identity", &self.identity.is_some())
            .field("transport_hook", &self.transport_hook.is_some())
            .finish()
    }
}

fn normalize_base_url(raw: String) -> String {
    format!("{}/", raw.trim_end_matches('/'))
}

/// Configuration for automatic retries of transient failures.
///
/// A response with status 429, or a 5xx status other than 501, is
/// considered transient and retried with exponential backoff until
/// `max_attempts` requests have been made.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one. Never below 1.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles after each retry.
    pub initial_delay: Duration,
    /// Upper bound on the exponential delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a configuration that makes a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Set the total number of attempts. Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the delay before the first retry.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the upper bound on the exponential delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// The exponential delay for a given zero-based attempt number.
    ///
    /// Produces the sequence `d, 2d, 4d, ...`, capped at `max_delay`.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let initial = self.initial_delay.as_millis() as u64;
        // 2^16 already exceeds any sane cap; avoids overflow for large attempts
        let factor = 1u64 << attempt.min(16);
        let delay = initial.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_delay.as_millis() as u64))
    }
}
