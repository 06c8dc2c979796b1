//! Error types for the FreshRSS MCP server
//!
//! Every variant carries a complete, self-contained message. `Display`
//! prints the message verbatim, so the tool layer's `Error: {e}` contract
//! reproduces the underlying failure text exactly.

use thiserror::Error;

/// Application error taxonomy
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed tool arguments or rejected parameter values
    #[error("{0}")]
    InvalidInput(String),

    /// Credential exchange failed, or a call was made without a token
    #[error("{0}")]
    Authentication(String),

    /// Non-2xx HTTP response outside authentication, or network failure
    #[error("{0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("{0}")]
    Parse(String),

    /// Requested entity absent upstream (e.g. unknown feed id)
    #[error("{0}")]
    NotFound(String),

    /// Request exceeded the transport timeout
    #[error("{0}")]
    Timeout(String),
}

impl AppError {
    /// Error code used in MCP JSON-RPC error responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Authentication(_) => "authentication_failed",
            AppError::Network(_) => "network_error",
            AppError::Parse(_) => "parse_error",
            AppError::NotFound(_) => "not_found",
            AppError::Timeout(_) => "timeout",
        }
    }
}

/// Classify reqwest failures: timeouts are surfaced distinctly, everything
/// else at the socket level is a network error
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_verbatim_message() {
        let err = AppError::Network("connection lost".to_string());
        assert_eq!(err.to_string(), "connection lost");
        assert_eq!(format!("Error: {}", err), "Error: connection lost");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Authentication("x".into()).error_code(),
            "authentication_failed"
        );
        assert_eq!(AppError::NotFound("x".into()).error_code(), "not_found");
        assert_eq!(AppError::Timeout("x".into()).error_code(), "timeout");
    }
}
