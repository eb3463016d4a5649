//! Error types for the CertForge API client.
//!
//! Every failure mode of the crate is represented by a single [`Error`]
//! enum. Remote failures are classified into authentication, validation,
//! and generic API errors, each carrying the numeric error code reported
//! by (or synthesized for) the server so callers can match on it.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// A specialized `Result` type for CertForge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Maximum number of body characters preserved in an error message.
const MAX_BODY_SNIPPET: usize = 200;

/// The main error type for all CertForge API operations.
///
/// Remote errors come in three classified flavors sharing the same
/// payload: [`Error::Authentication`] for rejected credentials (401/403),
/// [`Error::Validation`] for malformed caller input (400), and
/// [`Error::Api`] for everything else the server refused. All three
/// expose their numeric code through [`Error::api_error_code`].
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (connect, TLS, timeout, cancelled transfer).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed locally.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The server rejected the request's credentials (401 or 403).
    #[error("{message}")]
    Authentication {
        /// HTTP status code (401 or 403).
        status: u16,
        /// Numeric error code from the response body, or the HTTP status
        /// when the body carried none.
        code: i32,
        /// Composite diagnostic message.
        message: String,
    },

    /// The server rejected the request as malformed (400).
    #[error("{message}")]
    Validation {
        /// Numeric error code from the response body, or 400.
        code: i32,
        /// Composite diagnostic message.
        message: String,
    },

    /// Any other non-success response, including unparseable error bodies.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Numeric error code from the response body, or the HTTP status
        /// when the body carried none.
        code: i32,
        /// Composite diagnostic message.
        message: String,
    },

    /// Operation attempted after [`close`](crate::CertforgeClient::close).
    ///
    /// Raised locally, before any network activity.
    #[error("client has been closed")]
    ClientClosed,

    /// Invalid input provided to a function.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Client configuration is unusable.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns `true` if this is an authentication error (401 or 403).
    ///
    /// # Example
    ///
    /// ```
    /// use certforge_rs::Error;
    ///
    /// fn handle_error(err: Error) {
    ///     if err.is_auth_error() {
    ///         eprintln!("check your credentials: {err}");
    ///     }
    /// }
    /// ```
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// Returns `true` if the server rejected the request as malformed (400).
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// The HTTP status of a classified remote error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::Validation { .. } => Some(400),
            _ => None,
        }
    }

    /// The numeric error code of a classified remote error, if any.
    ///
    /// This is the `code` field of the server's error envelope when the
    /// body parsed, or the HTTP status code when it did not.
    pub fn api_error_code(&self) -> Option<i32> {
        match self {
            Error::Authentication { code, .. }
            | Error::Validation { code, .. }
            | Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Error envelope returned by the API.
///
/// Both fields are optional on the wire; anything else in the body is
/// ignored.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i32>,
    description: Option<String>,
}

/// Turn a terminal response into a typed error, or pass a success through.
///
/// Runs exactly once per logical call, after the retry loop has settled on
/// a final response. Reads the body of failed responses to recover the
/// server's error envelope.
pub(crate) async fn classify(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_failure(status, &body))
}

/// Build the typed error for a failed response body.
///
/// Bodies that do not parse as the error envelope are preserved as a
/// truncated snippet together with the parse failure, so diagnostics are
/// never dropped.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> Error {
    let (code, description) = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(envelope) => (
            envelope.code.unwrap_or_else(|| i32::from(status.as_u16())),
            envelope.description,
        ),
        Err(parse_err) => (
            i32::from(status.as_u16()),
            Some(format!("unparseable error body: {parse_err}")),
        ),
    };

    let mut message = format!(
        "StatusCode: {} ({})",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );
    let snippet = truncate_snippet(body);
    if !snippet.is_empty() {
        message.push_str(", Body: ");
        message.push_str(&snippet);
    }
    if let Some(description) = description.as_deref().filter(|d| !d.is_empty()) {
        message.push_str(", Error: ");
        message.push_str(description);
    }

    match status.as_u16() {
        401 | 403 => Error::Authentication {
            status: status.as_u16(),
            code,
            message,
        },
        400 => Error::Validation { code, message },
        _ => Error::Api {
            status: status.as_u16(),
            code,
            message,
        },
    }
}

/// Cap a body at [`MAX_BODY_SNIPPET`] characters, marking the cut.
fn truncate_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= MAX_BODY_SNIPPET {
        return trimmed.to_string();
    }
    let mut end = MAX_BODY_SNIPPET;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_envelope_drives_code_and_message() {
        let err = classify_failure(
            StatusCode::BAD_REQUEST,
            r#"{"code":-990,"description":"Invalid CSR"}"#,
        );
        match err {
            Error::Validation { code, ref message } => {
                assert_eq!(code, -990);
                assert!(message.starts_with("StatusCode: 400 (Bad Request)"));
                assert!(message.contains("Error: Invalid CSR"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn auth_statuses_classify_as_authentication() {
        let unauthorized =
            classify_failure(StatusCode::UNAUTHORIZED, r#"{"description":"Unknown user"}"#);
        assert!(unauthorized.is_auth_error());
        assert_eq!(unauthorized.api_error_code(), Some(401));
        assert!(unauthorized.to_string().contains("Unknown user"));

        let forbidden = classify_failure(StatusCode::FORBIDDEN, "");
        assert!(forbidden.is_auth_error());
        assert_eq!(forbidden.status(), Some(403));
    }

    #[test]
    fn unparseable_body_keeps_snippet_and_parse_note() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>");
        match err {
            Error::Api { status, code, ref message } => {
                assert_eq!(status, 500);
                assert_eq!(code, 500);
                assert!(message.contains("Body: <html>boom</html>"));
                assert!(message.contains("unparseable error body"));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn long_bodies_are_truncated_with_ellipsis() {
        let body = "x".repeat(500);
        let err = classify_failure(StatusCode::BAD_GATEWAY, &body);
        let message = err.to_string();
        assert!(message.contains(&format!("{}...", "x".repeat(200))));
        assert!(!message.contains(&"x".repeat(201)));
    }

    #[test]
    fn status_and_code_accessors() {
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.api_error_code(), Some(429));
        assert!(!err.is_auth_error());
        assert!(Error::ClientClosed.status().is_none());
        assert!(Error::ClientClosed.api_error_code().is_none());
    }
}
