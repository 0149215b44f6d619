//! REST clients for the two downstream services.
//!
//! Both services speak JSON over HTTP and report failures as a non-2xx
//! status with an `{"error": "..."}` body. Requests are fire-once; there is
//! no retry layer.

pub mod nutrition;
pub mod workout;

use serde::{Deserialize, Serialize};

/// Errors surfaced by the downstream REST services.
#[derive(Debug)]
pub enum ApiError {
    /// Transport failure: connect, send, or body read
    Http(reqwest::Error),
    /// Non-2xx response carrying the service's error message
    Status { status: u16, message: String },
    /// 2xx response whose body did not match the documented shape
    Decode(String),
}

impl ApiError {
    /// True when the service rejected the presented auth token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http(err) => write!(f, "HTTP error: {err}"),
            ApiError::Status { status, message } => {
                write!(f, "Service returned {status}: {message}")
            }
            ApiError::Decode(msg) => write!(f, "Unexpected response body: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

/// Username/password pair sent to both services.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful register/login response from either service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

const ERROR_MESSAGE_MAX_LEN: usize = 200;

/// Decode a service response, mapping non-2xx statuses to [`ApiError::Status`].
pub(crate) async fn decode_response<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or_else(|_| truncate_message(&body));
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Join a base URL and an absolute path, tolerating a trailing slash on the base.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

fn truncate_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= ERROR_MESSAGE_MAX_LEN {
        trimmed.to_string()
    } else {
        let mut end = ERROR_MESSAGE_MAX_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &trimmed[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_tolerates_trailing_slash() {
        assert_eq!(
            join_url("http://localhost:8000/", "/api/v1/meals"),
            "http://localhost:8000/api/v1/meals"
        );
        assert_eq!(
            join_url("http://localhost:8000", "/api/v1/meals"),
            "http://localhost:8000/api/v1/meals"
        );
    }

    #[test]
    fn test_unauthorized_detection() {
        let unauthorized = ApiError::Status {
            status: 401,
            message: "token expired".to_string(),
        };
        let not_found = ApiError::Status {
            status: 404,
            message: "no such user".to_string(),
        };
        assert!(unauthorized.is_unauthorized());
        assert!(!not_found.is_unauthorized());
    }

    #[test]
    fn test_error_message_truncation() {
        assert_eq!(truncate_message("  boom  "), "boom");
        let long = "x".repeat(500);
        let truncated = truncate_message(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= ERROR_MESSAGE_MAX_LEN + 3);
    }
}
