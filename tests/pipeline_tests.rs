//! Integration tests for the request pipeline.
//!
//! Every test runs against a local wiremock server, so the suite needs no
//! credentials and no network access. Coverage concentrates on the
//! pipeline itself: authentication headers, token refresh coalescing,
//! retry behavior, throttling, the validator cache, error classification,
//! and pagination.
//!
//! Run with: cargo test --test pipeline_tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::future::join_all;
use futures_util::TryStreamExt;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use certforge_rs::api::{CertificatesQueryStream, OrdersQueryStream};
use certforge_rs::prelude::*;

static INIT: Once = Once::new();

/// Initialize logging for tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Config pointed at the mock server, with fast retries.
fn base_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri(), "test-customer")
        .with_retry(RetryConfig::default().with_initial_delay(Duration::from_millis(10)))
}

/// Client authenticated with login/password headers.
fn login_client(server: &MockServer) -> CertforgeClient {
    init_logging();
    CertforgeClient::login(base_config(server), "api-user", "api-password")
        .expect("client should build")
}

fn profile_json() -> serde_json::Value {
    json!({
        "id": 12,
        "name": "TLS Server",
        "termMonths": [12, 24],
        "keyTypes": ["RSA-2048", "EC-P256"],
        "enabled": true
    })
}

fn certificate_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "status": "ISSUED",
        "commonName": format!("host-{id}.example.com")
    })
}

fn order_json(number: i64) -> serde_json::Value {
    json!({ "orderNumber": number, "status": "PENDING" })
}

// ============================================================================
// AUTHENTICATION
// ============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_login_headers_reach_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .and(header("login", "api-user"))
            .and(header("password", "api-password"))
            .and(header("customeruri", "test-customer"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let profiles = client.profiles().list().await.unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([profile_json()])))
            .expect(1)
            .mount(&server)
            .await;

        init_logging();
        let client = CertforgeClient::with_token(
            base_config(&server),
            "tok-123",
            Utc::now() + chrono::Duration::hours(1),
        )
        .unwrap();

        let profiles = client.profiles().list().await.unwrap();
        assert_eq!(profiles[0].name, "TLS Server");
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_refresh() {
        let server = MockServer::start().await;
        // Only the refreshed token is accepted; a stale token would fall
        // through to wiremock's 404 and fail the call.
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .and(header("authorization", "Bearer fresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(8)
            .mount(&server)
            .await;

        init_logging();
        let refresh_calls = Arc::new(AtomicUsize::new(0));
        let counter = refresh_calls.clone();
        let client = CertforgeClient::with_refreshing_token(
            base_config(&server),
            "stale-token",
            Utc::now() - chrono::Duration::minutes(5),
            move || {
                let counter = counter.clone();
                Box::pin(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(IssuedToken::new(
                        "fresh-token",
                        Utc::now() + chrono::Duration::hours(1),
                    ))
                })
            },
        )
        .unwrap();

        let calls = (0..8).map(|_| {
            let client = client.clone();
            async move { client.profiles().list().await }
        });
        let results = join_all(calls).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_propagates_without_dispatch() {
        let server = MockServer::start().await;

        init_logging();
        let client = CertforgeClient::with_refreshing_token(
            base_config(&server),
            "stale-token",
            Utc::now() - chrono::Duration::minutes(5),
            || {
                Box::pin(async {
                    Err(Error::InvalidInput("grant exchange rejected".to_string()))
                })
            },
        )
        .unwrap();

        let err = client.profiles().list().await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

// ============================================================================
// RETRY
// ============================================================================

/// Fails the first `failures` calls with 503, then succeeds.
struct FlakyResponder {
    calls: AtomicUsize,
    failures: usize,
    success_body: serde_json::Value,
}

impl Respond for FlakyResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            ResponseTemplate::new(503).set_body_string("server busy")
        } else {
            ResponseTemplate::new(200).set_body_json(&self.success_body)
        }
    }
}

/// Rate-limits the first call with a Retry-After, then succeeds.
struct RateLimitedOnce {
    calls: AtomicUsize,
}

impl Respond for RateLimitedOnce {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            ResponseTemplate::new(429).insert_header("retry-after", "1")
        } else {
            ResponseTemplate::new(200).set_body_json(json!([]))
        }
    }
}

mod retry_tests {
    use super::*;

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .respond_with(FlakyResponder {
                calls: AtomicUsize::new(0),
                failures: 2,
                success_body: json!([profile_json()]),
            })
            .expect(3)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let profiles = client.profiles().list().await.unwrap();
        assert_eq!(profiles.len(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&server)
            .await;

        init_logging();
        let config = base_config(&server).with_retry(
            RetryConfig::default()
                .with_max_attempts(3)
                .with_initial_delay(Duration::from_millis(10)),
        );
        let client = CertforgeClient::login(config, "api-user", "api-password").unwrap();

        let err = client.profiles().list().await.unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.api_error_code(), Some(429));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let err = client.profiles().list().await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_not_implemented_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .respond_with(ResponseTemplate::new(501))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let err = client.profiles().list().await.unwrap_err();
        assert_eq!(err.status(), Some(501));
    }

    #[tokio::test]
    async fn test_respects_retry_after_seconds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .respond_with(RateLimitedOnce {
                calls: AtomicUsize::new(0),
            })
            .expect(2)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let started = Instant::now();
        client.profiles().list().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
    }
}

// ============================================================================
// THROTTLE & CLOSE
// ============================================================================

mod throttle_tests {
    use super::*;

    #[tokio::test]
    async fn test_concurrency_limit_bounds_in_flight_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(4)
            .mount(&server)
            .await;

        init_logging();
        let config = base_config(&server).with_concurrency_limit(2);
        let client = CertforgeClient::login(config, "api-user", "api-password").unwrap();

        let started = Instant::now();
        let calls = (0..4).map(|_| {
            let client = client.clone();
            async move { client.profiles().list().await }
        });
        let results = join_all(calls).await;

        assert!(results.iter().all(|r| r.is_ok()));
        // Two waves of two requests, each held 200ms by the server
        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_closed_client_fails_fast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        client.profiles().list().await.unwrap();

        client.close();
        let err = client.profiles().list().await.unwrap_err();
        assert!(matches!(err, Error::ClientClosed));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}

// ============================================================================
// VALIDATOR CACHE
// ============================================================================

/// Serves a body with an ETag, answering 304 to matching revalidations.
struct RevalidatingResponder {
    etag: &'static str,
    body: serde_json::Value,
}

impl Respond for RevalidatingResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let revalidating = request
            .headers
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            == Some(self.etag);
        if revalidating {
            ResponseTemplate::new(304)
        } else {
            ResponseTemplate::new(200)
                .insert_header("etag", self.etag)
                .set_body_json(&self.body)
        }
    }
}

mod etag_tests {
    use super::*;

    fn caching_client(server: &MockServer) -> CertforgeClient {
        init_logging();
        let config = base_config(server).with_validator_cache(true);
        CertforgeClient::login(config, "api-user", "api-password").unwrap()
    }

    #[tokio::test]
    async fn test_conditional_round_trip_yields_not_modified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1/12"))
            .respond_with(RevalidatingResponder {
                etag: "\"v1\"",
                body: profile_json(),
            })
            .expect(2)
            .mount(&server)
            .await;

        let client = caching_client(&server);

        let first = client.profiles().get_conditional(ProfileId::new(12)).await.unwrap();
        match first {
            Conditional::Fresh(profile) => assert_eq!(profile.name, "TLS Server"),
            Conditional::NotModified => panic!("first fetch must be fresh"),
        }

        let second = client.profiles().get_conditional(ProfileId::new(12)).await.unwrap();
        assert!(second.is_not_modified());
    }

    #[tokio::test]
    async fn test_plain_get_stores_but_never_sends_validators() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1/12"))
            .respond_with(RevalidatingResponder {
                etag: "\"v1\"",
                body: profile_json(),
            })
            .expect(3)
            .mount(&server)
            .await;

        let client = caching_client(&server);

        // Two plain fetches both come back full: no If-None-Match sent
        client.profiles().get(ProfileId::new(12)).await.unwrap();
        client.profiles().get(ProfileId::new(12)).await.unwrap();

        // But the validator was stored, so a conditional fetch revalidates
        let conditional = client.profiles().get_conditional(ProfileId::new(12)).await.unwrap();
        assert!(conditional.is_not_modified());
    }

    #[tokio::test]
    async fn test_cache_disabled_means_always_fresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1/12"))
            .respond_with(RevalidatingResponder {
                etag: "\"v1\"",
                body: profile_json(),
            })
            .expect(2)
            .mount(&server)
            .await;

        // base_config leaves the validator cache off
        let client = login_client(&server);

        let first = client.profiles().get_conditional(ProfileId::new(12)).await.unwrap();
        let second = client.profiles().get_conditional(ProfileId::new(12)).await.unwrap();
        assert!(!first.is_not_modified());
        assert!(!second.is_not_modified());
    }
}

// ============================================================================
// ERROR CLASSIFICATION
// ============================================================================

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_unauthorized_classifies_as_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"description": "Unknown user"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let err = client.profiles().list().await.unwrap_err();

        assert!(err.is_auth_error());
        assert_eq!(err.api_error_code(), Some(401));
        let message = err.to_string();
        assert!(message.contains("StatusCode: 401 (Unauthorized)"));
        assert!(message.contains("Unknown user"));
    }

    #[tokio::test]
    async fn test_bad_request_carries_server_error_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ssl/v1/enroll"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"code": -990, "description": "Invalid CSR"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let request = EnrollmentRequest::new("bogus", ProfileId::new(12), OrganizationId::new(3));
        let err = client.certificates().enroll(&request).await.unwrap_err();

        assert!(err.is_validation_error());
        assert_eq!(err.api_error_code(), Some(-990));
        assert!(err.to_string().contains("Invalid CSR"));
    }

    #[tokio::test]
    async fn test_unparseable_body_preserved_as_snippet() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/profile/v1"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("<html>Internal Server Error</html>"),
            )
            .mount(&server)
            .await;

        init_logging();
        let config = base_config(&server).with_retry(RetryConfig::no_retry());
        let client = CertforgeClient::login(config, "api-user", "api-password").unwrap();

        let err = client.profiles().list().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        let message = err.to_string();
        assert!(message.contains("Body: <html>Internal Server Error</html>"));
        assert!(message.contains("unparseable error body"));
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

mod pagination_tests {
    use super::*;

    #[tokio::test]
    async fn test_position_stream_walks_all_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ssl/v1"))
            .and(query_param("size", "2"))
            .and(query_param("position", "0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([certificate_json(1), certificate_json(2)])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ssl/v1"))
            .and(query_param("size", "2"))
            .and(query_param("position", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([certificate_json(3), certificate_json(4)])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ssl/v1"))
            .and(query_param("size", "2"))
            .and(query_param("position", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([certificate_json(5)])))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let filter = CertificatesQueryStream {
            size: Some(2),
            ..Default::default()
        };
        let certificates: Vec<Certificate> = client
            .certificates()
            .list_stream(Some(filter))
            .try_collect()
            .await
            .unwrap();

        let ids: Vec<i64> = certificates.iter().map(|c| c.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_page_number_stream_starts_at_one() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/order/v1"))
            .and(query_param("size", "2"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([order_json(1), order_json(2)])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/order/v1"))
            .and(query_param("size", "2"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([order_json(3)])))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let filter = OrdersQueryStream {
            size: Some(2),
            ..Default::default()
        };
        let orders: Vec<Order> = client
            .orders()
            .list_stream(Some(filter))
            .try_collect()
            .await
            .unwrap();

        let numbers: Vec<i64> = orders.iter().map(|o| o.order_number.value()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}

// ============================================================================
// RESOURCE SERVICES
// ============================================================================

mod resource_tests {
    use super::*;

    #[tokio::test]
    async fn test_enroll_posts_camel_case_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ssl/v1/enroll"))
            .and(body_partial_json(json!({
                "csr": "-----BEGIN CERTIFICATE REQUEST-----",
                "profileId": 12,
                "organizationId": 3,
                "termMonths": 12
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "certificateId": 555,
                "orderNumber": 777,
                "status": "REQUESTED"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let request = EnrollmentRequest::new(
            "-----BEGIN CERTIFICATE REQUEST-----",
            ProfileId::new(12),
            OrganizationId::new(3),
        )
        .with_term_months(12);

        let enrollment = client.certificates().enroll(&request).await.unwrap();
        assert_eq!(enrollment.certificate_id, CertificateId::new(555));
        assert_eq!(enrollment.order_number, Some(OrderNumber::new(777)));
        assert_eq!(enrollment.status, Some(CertificateStatus::Requested));
    }

    #[tokio::test]
    async fn test_renew_posts_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ssl/v1/renew/555"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"certificateId": 556})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let renewal = client.certificates().renew(CertificateId::new(555)).await.unwrap();
        assert_eq!(renewal.certificate_id, CertificateId::new(556));
    }

    #[tokio::test]
    async fn test_revoke_sends_reason_and_comment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ssl/v1/revoke/555"))
            .and(body_partial_json(json!({
                "reason": "keyCompromise",
                "comment": "lost laptop"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        client
            .certificates()
            .revoke(
                CertificateId::new(555),
                RevocationReason::KeyCompromise,
                Some("lost laptop"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_organization_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/organization/v1/3"))
            .and(body_partial_json(json!({"city": "Rotterdam"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "name": "Example Corp",
                "city": "Rotterdam"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let changes = OrganizationUpdate::new().with_city("Rotterdam");
        let organization = client
            .organizations()
            .update(OrganizationId::new(3), &changes)
            .await
            .unwrap();

        assert_eq!(organization.city.as_deref(), Some("Rotterdam"));
        assert_eq!(organization.name, "Example Corp");
    }

    #[tokio::test]
    async fn test_deactivate_acme_account() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/acme/v1/account/77"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 77,
                "status": "valid",
                "contacts": ["mailto:pki@example.com"]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/acme/v1/account/77"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = login_client(&server);
        let account = client.acme().get_account(AcmeAccountId::new(77)).await.unwrap();
        assert_eq!(account.status, AcmeAccountStatus::Valid);

        client.acme().deactivate_account(AcmeAccountId::new(77)).await.unwrap();
    }
}
