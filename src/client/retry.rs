//! Retry loop for transient HTTP failures.
//!
//! The executor drives one attempt at a time and inspects status codes,
//! never errors, to decide whether to go again. The terminal response,
//! success or failure, is handed back untouched; translating failures
//! into typed errors happens afterwards, exactly once per logical call.

use std::future::Future;
use std::time::{Duration, SystemTime};

use reqwest::header::{HeaderValue, RETRY_AFTER};
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::config::RetryConfig;
use crate::Result;

/// Whether a response status is worth retrying.
///
/// Rate limiting (429) and server-side failures qualify, except 501,
/// which reports a permanent limitation of the server.
pub(crate) fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

/// Run `attempt` until it produces a non-transient response or the
/// attempt budget is exhausted.
///
/// Transport errors from an attempt propagate immediately; they are not
/// treated as transient. Between attempts the failed response is dropped
/// first, then the loop sleeps for the server-suggested `Retry-After`
/// (on 429) or the exponential backoff delay.
pub(crate) async fn execute<F, Fut>(
    policy: &RetryConfig,
    mut attempt: F,
) -> Result<reqwest::Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt_index: u32 = 0;

    loop {
        let response = attempt().await?;
        let status = response.status();

        if !is_transient(status) || attempt_index + 1 >= max_attempts {
            if attempt_index > 0 {
                debug!(
                    attempts = attempt_index + 1,
                    status = status.as_u16(),
                    "retry loop settled"
                );
            }
            return Ok(response);
        }

        let wait = wait_before_retry(policy, attempt_index, &response);
        drop(response);
        debug!(
            status = status.as_u16(),
            wait_ms = wait.as_millis() as u64,
            next_attempt = attempt_index + 2,
            "transient response, backing off"
        );
        tokio::time::sleep(wait).await;
        attempt_index += 1;
    }
}

/// Pick the delay before the next attempt.
///
/// A 429 carrying a parseable `Retry-After` wins over the exponential
/// schedule; anything else falls back to it.
fn wait_before_retry(
    policy: &RetryConfig,
    attempt_index: u32,
    response: &reqwest::Response,
) -> Duration {
    let exponential = policy.backoff_for_attempt(attempt_index);
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return exponential;
    }
    match response.headers().get(RETRY_AFTER) {
        None => exponential,
        Some(value) => parse_retry_after(value, SystemTime::now()).unwrap_or_else(|| {
            warn!("unparseable Retry-After header, using exponential backoff");
            exponential
        }),
    }
}

/// Parse a `Retry-After` header as delay seconds or as an HTTP date.
///
/// Dates in the past yield a zero delay. Returns `None` when the value is
/// neither form.
pub(crate) fn parse_retry_after(value: &HeaderValue, now: SystemTime) -> Option<Duration> {
    let value = value.to_str().ok()?.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let date = httpdate::parse_http_date(value).ok()?;
    Some(date.duration_since(now).unwrap_or(Duration::ZERO))
}
