//! HTTP client implementation for the CertForge API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ETAG, IF_NONE_MATCH};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::api::{
    AcmeService, CertificatesService, OrdersService, OrganizationsService, ProfilesService,
};
use crate::auth::{Credentials, IssuedToken};
use crate::{error, Error, Result};

use super::config::ClientConfig;
use super::etag::{Conditional, ValidatorCache};
use super::retry;
use super::throttle::RequestThrottle;

/// Header identifying the customer account on every request.
const CUSTOMER_URI_HEADER: &str = "customeruri";

/// The main client for interacting with the CertForge API.
///
/// This client provides access to all API resources through method calls
/// that return service structs. Every request goes through the same
/// pipeline: credential validation, concurrency throttling, retry with
/// backoff, and error classification.
///
/// Cloning is cheap; clones share the transport, credentials, throttle,
/// and validator cache.
///
/// # Example
///
/// ```no_run
/// use certforge_rs::{CertforgeClient, ClientConfig};
///
/// # async fn example() -> certforge_rs::Result<()> {
/// let config = ClientConfig::new("https://hub.certforge.com/api", "my-customer");
/// let client = CertforgeClient::login(config, "api-user", "api-password")?;
///
/// // Use the profiles service
/// let profiles = client.profiles().list().await?;
///
/// if let Some(profile) = profiles.first() {
///     println!("enrolling against profile {}", profile.id);
/// }
/// # Ok(())
/// # }
/// ```
pub struct CertforgeClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) credentials: Credentials,
    pub(crate) config: ClientConfig,
    pub(crate) throttle: RequestThrottle,
    pub(crate) validators: ValidatorCache,
    pub(crate) closed: AtomicBool,
}

impl CertforgeClient {
    /// Create a new client with login/password authentication.
    ///
    /// The credentials are sent as `login` and `password` headers on every
    /// request.
    pub fn login(
        config: ClientConfig,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::with_credentials(Credentials::login(username, password), config)
    }

    /// Create a new client with a static bearer token.
    ///
    /// The token is never refreshed; use
    /// [`with_refreshing_token`](Self::with_refreshing_token) for tokens
    /// that should be renewed near expiry.
    pub fn with_token(
        config: ClientConfig,
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self> {
        Self::with_credentials(Credentials::bearer(token, expires_at), config)
    }

    /// Create a new client with a bearer token and a refresh callback.
    ///
    /// When the token's remaining lifetime drops below
    /// [`ClientConfig::refresh_threshold_secs`], the callback runs before
    /// the next request goes out. Concurrent near-expiry requests share a
    /// single refresh.
    pub fn with_refreshing_token<F>(
        config: ClientConfig,
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
        refresh: F,
    ) -> Result<Self>
    where
        F: Fn() -> BoxFuture<'static, Result<IssuedToken>> + Send + Sync + 'static,
    {
        Self::with_credentials(
            Credentials::bearer_with_refresh(token, expires_at, refresh),
            config,
        )
    }

    /// Create a new client with pre-built credentials and configuration.
    pub fn with_credentials(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            CUSTOMER_URI_HEADER,
            HeaderValue::from_str(&config.customer_uri).map_err(|_| {
                Error::InvalidConfig("customer URI is not a valid header value".to_string())
            })?,
        );

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(default_headers);
        if let Some(identity) = config.identity.clone() {
            builder = builder.identity(identity);
        }
        if let Some(hook) = &config.transport_hook {
            builder = hook(builder);
        }
        let http = builder.build()?;

        let throttle = RequestThrottle::new(config.concurrency_limit);
        let validators = ValidatorCache::new(config.cache_validators);

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                credentials,
                config,
                throttle,
                validators,
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Get the certificates service.
    pub fn certificates(&self) -> CertificatesService {
        CertificatesService::new(self.inner.clone())
    }

    /// Get the orders service.
    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.inner.clone())
    }

    /// Get the organizations service.
    pub fn organizations(&self) -> OrganizationsService {
        OrganizationsService::new(self.inner.clone())
    }

    /// Get the certificate profiles service.
    pub fn profiles(&self) -> ProfilesService {
        ProfilesService::new(self.inner.clone())
    }

    /// Get the ACME accounts service.
    pub fn acme(&self) -> AcmeService {
        AcmeService::new(self.inner.clone())
    }

    /// Send a request through the full pipeline without a typed response.
    ///
    /// `path` is relative to the configured base URL. GET requests
    /// participate in the validator cache when it is enabled, which is why
    /// the response comes wrapped in [`Conditional`]; other methods always
    /// return [`Conditional::Fresh`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Conditional<reqwest::Response>> {
        let conditional = method == Method::GET;
        let mut builder = self.inner.http.request(method, self.inner.endpoint(path));
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let request = builder.build()?;
        self.inner.run(request, conditional).await
    }

    /// Close the client.
    ///
    /// Requests already past the throttle finish normally; everything else
    /// fails fast with [`Error::ClientClosed`] before reaching the
    /// network. Closing twice is a no-op.
    pub fn close(&self) {
        self.inner.close();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Get a reference to the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    /// Resolve a relative path against the configured base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::ClientClosed);
        }
        Ok(())
    }

    pub(crate) fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.throttle.close();
            debug!("client closed");
        }
    }

    /// Run a request through the full pipeline.
    ///
    /// Order matters: the closed check and token refresh happen before a
    /// throttle slot is taken, so a slow refresh never starves other
    /// requests of slots. The slot is held across all retry attempts and
    /// released when this call returns.
    pub(crate) async fn run(
        &self,
        mut request: reqwest::Request,
        conditional: bool,
    ) -> Result<Conditional<reqwest::Response>> {
        self.ensure_open()?;
        self.credentials
            .ensure_valid(Duration::seconds(self.config.refresh_threshold_secs))
            .await?;

        let _permit = self.throttle.acquire().await?;

        self.credentials.apply(request.headers_mut()).await?;

        let url = request.url().to_string();
        let conditional = conditional && self.validators.enabled();
        if conditional {
            if let Some(validator) = self.validators.get(&url) {
                let value = HeaderValue::from_str(&validator).map_err(|_| {
                    Error::InvalidInput("stored validator is not a valid header value".to_string())
                })?;
                request.headers_mut().insert(IF_NONE_MATCH, value);
            }
        }

        debug!(method = %request.method(), %url, "dispatching request");

        let response = retry::execute(&self.config.retry, || {
            let attempt_request = request.try_clone();
            async move {
                let request = attempt_request.ok_or_else(|| {
                    Error::InvalidInput(
                        "request body cannot be replayed across attempts".to_string(),
                    )
                })?;
                Ok(self.http.execute(request).await?)
            }
        })
        .await?;

        if conditional && response.status() == StatusCode::NOT_MODIFIED {
            return Ok(Conditional::NotModified);
        }

        let response = error::classify(response).await?;

        if self.validators.enabled() {
            if let Some(validator) = response.headers().get(ETAG).and_then(|v| v.to_str().ok()) {
                self.validators.store(&url, validator);
            }
        }

        Ok(Conditional::Fresh(response))
    }

    /// Run a request that must produce a fresh response.
    async fn execute_fresh(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        match self.run(request, false).await? {
            Conditional::Fresh(response) => Ok(response),
            Conditional::NotModified => Err(Error::Api {
                status: 304,
                code: 304,
                message: "unexpected 304 response to an unconditional request".to_string(),
            }),
        }
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.get(self.endpoint(path)).build()?;
        let response = self.execute_fresh(request).await?;
        Ok(response.json().await?)
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let request = self.http.get(self.endpoint(path)).query(query).build()?;
        let response = self.execute_fresh(request).await?;
        Ok(response.json().await?)
    }

    /// Make a conditional GET request using the validator cache.
    pub(crate) async fn get_conditional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Conditional<T>> {
        let request = self.http.get(self.endpoint(path)).build()?;
        match self.run(request, true).await? {
            Conditional::Fresh(response) => Ok(Conditional::Fresh(response.json().await?)),
            Conditional::NotModified => Ok(Conditional::NotModified),
        }
    }

    /// Make a POST request.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.http.post(self.endpoint(path)).json(body).build()?;
        let response = self.execute_fresh(request).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request without a body.
    pub(crate) async fn post_without_body<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.post(self.endpoint(path)).build()?;
        let response = self.execute_fresh(request).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request whose success response has no useful body.
    pub(crate) async fn post_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let request = self.http.post(self.endpoint(path)).json(body).build()?;
        self.execute_fresh(request).await?;
        Ok(())
    }

    /// Make a PUT request.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.http.put(self.endpoint(path)).json(body).build()?;
        let response = self.execute_fresh(request).await?;
        Ok(response.json().await?)
    }

    /// Make a DELETE request whose success response has no useful body.
    pub(crate) async fn delete_no_content(&self, path: &str) -> Result<()> {
        let request = self.http.delete(self.endpoint(path)).build()?;
        self.execute_fresh(request).await?;
        Ok(())
    }
}

impl Clone for CertforgeClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for CertforgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertforgeClient")
            .field("config", &self.inner.config)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CertforgeClient {
        let config = ClientConfig::new("https://api.test/base", "test-customer");
        CertforgeClient::login(config, "user", "secret-password").unwrap()
    }

    #[test]
    fn endpoint_joins_with_single_slash() {
        let client = test_client();
        assert_eq!(
            client.inner.endpoint("ssl/v1"),
            "https://api.test/base/ssl/v1"
        );
        assert_eq!(
            client.inner.endpoint("/ssl/v1"),
            "https://api.test/base/ssl/v1"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ClientConfig::new("not a url", "test-customer");
        let err = CertforgeClient::login(config, "user", "pw").unwrap_err();
        assert!(matches!(err, Error::UrlParse(_)));
    }

    #[tokio::test]
    async fn closed_client_fails_before_dispatch() {
        let client = test_client();
        client.close();
        client.close(); // closing twice is fine

        let err = client
            .send(Method::GET, "ssl/v1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ClientClosed));
        assert!(client.is_closed());
    }

    #[test]
    fn debug_output_omits_secrets() {
        let client = test_client();
        let output = format!("{client:?}");
        assert!(output.contains("CertforgeClient"));
        assert!(!output.contains("secret-password"));
    }
}
