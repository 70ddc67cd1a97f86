use serde::{Deserialize, Serialize};

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Error body produced by the backend's exception handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ErrorResponse {
    pub timestamp: Option<String>,
    pub status: Option<u16>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub path: Option<String>,
    pub details: Vec<String>,
}

/// Failure talking to the backend, reduced to something a form can display
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Your session has expired. Please log in again.")]
    Unauthorized,
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Failed to prepare request: {0}")]
    Request(String),
}

impl ApiError {
    /// Turn a non-2xx response into an error, preferring the backend's own message.
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }
        ApiError::Server {
            status,
            message: message_from_body(body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

/// Pick the most useful text out of an error body: `message`, then the
/// validation `details`, then `error`, then the raw text, then a generic line.
fn message_from_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return GENERIC_FAILURE.to_string();
    }

    match serde_json::from_str::<ErrorResponse>(trimmed) {
        Ok(parsed) => parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| (!parsed.details.is_empty()).then(|| parsed.details.join("; ")))
            .or(parsed.error)
            .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        // Plain text bodies, e.g. "Email already in use"
        Err(_) if !trimmed.starts_with('{') && !trimmed.starts_with('<') => trimmed.to_string(),
        Err(_) => GENERIC_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_taken_from_error_body() {
        let body = r#"{"timestamp":"2025-01-01T10:00:00","status":400,"error":"Bad Request",
                       "message":"Sum of amounts paid (20.00) does not match total expense amount (25.00).",
                       "path":"/api/expenses"}"#;
        let error = ApiError::from_response(400, body);
        assert_eq!(
            error.to_string(),
            "Sum of amounts paid (20.00) does not match total expense amount (25.00)."
        );
        assert_eq!(error.status(), Some(400));
    }

    #[test]
    fn test_details_then_error_fallbacks() {
        let details = r#"{"status":400,"error":"Bad Request","details":["amount: must be positive","description: required"]}"#;
        assert_eq!(
            ApiError::from_response(400, details).to_string(),
            "amount: must be positive; description: required"
        );

        let only_error = r#"{"status":404,"error":"Not Found"}"#;
        assert_eq!(ApiError::from_response(404, only_error).to_string(), "Not Found");
    }

    #[test]
    fn test_plain_text_and_empty_bodies() {
        assert_eq!(ApiError::from_response(409, "Email already in use").to_string(), "Email already in use");
        assert_eq!(ApiError::from_response(500, "").to_string(), GENERIC_FAILURE);
        assert_eq!(ApiError::from_response(502, "<html>Bad gateway</html>").to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_unauthorized_is_distinct() {
        assert_eq!(ApiError::from_response(401, "{}"), ApiError::Unauthorized);
    }
}
