//! REST client error types.

use serde_json::Value;
use thiserror::Error;

/// Errors raised while talking to the backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The base URL or a derived resource URL could not be built.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// The request never produced a response (connection, timeout, TLS).
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("Request to {url} failed with status {status}")]
    Http {
        status: u16,
        /// Parsed JSON error body, when the server sent one.
        body: Option<Value>,
        url: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message the server put in its error body, checking `message` then `data.message`.
    pub fn server_message(&self) -> Option<String> {
        let ApiError::Http {
            body: Some(body), ..
        } = self
        else {
            return None;
        };

        message_at(body.get("message"))
            .or_else(|| message_at(body.get("data").and_then(|d| d.get("message"))))
    }

    /// Best-effort text for the user.
    ///
    /// A non-2xx answer shows the server's message, or `fallback` when the body
    /// carried none. Failures without a response show their own text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Http { .. } => self.server_message().unwrap_or_else(|| fallback.to_string()),
            other => other.to_string(),
        }
    }
}

/// Reads a message that may be a string or a list of strings.
fn message_at(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn http(body: Option<Value>) -> ApiError {
        ApiError::Http {
            status: 400,
            body,
            url: "http://plant.local/machine".to_string(),
        }
    }

    #[test]
    fn test_server_message_from_body() {
        let err = http(Some(json!({ "statusCode": 400, "message": "Serial number taken" })));
        assert_eq!(err.user_message("fallback"), "Serial number taken");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_server_message_list_is_joined() {
        let err = http(Some(json!({
            "message": ["name should not be empty", "capacity must be a number"]
        })));
        assert_eq!(
            err.server_message().unwrap(),
            "name should not be empty, capacity must be a number"
        );
    }

    #[test]
    fn test_server_message_from_nested_data() {
        let err = http(Some(json!({ "data": { "message": "Silo is full" } })));
        assert_eq!(err.user_message("fallback"), "Silo is full");
    }

    #[test]
    fn test_user_message_without_server_message_uses_fallback() {
        let err = http(None);
        assert_eq!(
            err.user_message("Failed to fetch machines"),
            "Failed to fetch machines"
        );

        let err = http(Some(json!({ "message": "" })));
        assert_eq!(err.user_message("Failed to delete silos"), "Failed to delete silos");
    }

    #[test]
    fn test_user_message_for_non_http_errors_uses_own_text() {
        let err = ApiError::Decode {
            url: "http://plant.local/machine".to_string(),
            message: "expected a sequence".to_string(),
        };
        assert!(err.user_message("Failed to fetch machines").contains("expected a sequence"));
    }
}
