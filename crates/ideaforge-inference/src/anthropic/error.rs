//! Anthropic-specific error handling.

use ideaforge_core::Error;

/// Anthropic API error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnthropicErrorCode {
    /// Invalid or missing API key.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Malformed request or prompt too long.
    InvalidRequest,
    /// API temporarily overloaded.
    Overloaded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl AnthropicErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) | (_, "authentication_error") => Self::AuthenticationError,
            (429, _) | (_, "rate_limit_error") => Self::RateLimitExceeded,
            (529, _) | (_, "overloaded_error") => Self::Overloaded,
            (404, _) | (_, "not_found_error") => Self::ModelNotFound,
            (400, _) | (_, "invalid_request_error") => Self::InvalidRequest,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded | Self::Overloaded | Self::ServerError
        )
    }
}

/// Convert an Anthropic error to an idea-forge Error.
pub fn to_ideaforge_error(code: AnthropicErrorCode, message: &str) -> Error {
    match code {
        AnthropicErrorCode::AuthenticationError => {
            Error::Inference(format!("Authentication failed: {}", message))
        }
        AnthropicErrorCode::RateLimitExceeded => {
            Error::Inference(format!("Rate limit exceeded: {}", message))
        }
        AnthropicErrorCode::ModelNotFound => {
            Error::Inference(format!("Model not found: {}", message))
        }
        AnthropicErrorCode::InvalidRequest => {
            Error::Inference(format!("Invalid request: {}", message))
        }
        AnthropicErrorCode::Overloaded => Error::Inference(format!("API overloaded: {}", message)),
        AnthropicErrorCode::ServerError => Error::Inference(format!("Server error: {}", message)),
        AnthropicErrorCode::Unknown => Error::Inference(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_status() {
        assert_eq!(
            AnthropicErrorCode::from_response(401, ""),
            AnthropicErrorCode::AuthenticationError
        );
        assert_eq!(
            AnthropicErrorCode::from_response(429, ""),
            AnthropicErrorCode::RateLimitExceeded
        );
        assert_eq!(
            AnthropicErrorCode::from_response(529, ""),
            AnthropicErrorCode::Overloaded
        );
        assert_eq!(
            AnthropicErrorCode::from_response(502, "api_error"),
            AnthropicErrorCode::ServerError
        );
        assert_eq!(
            AnthropicErrorCode::from_response(418, "teapot"),
            AnthropicErrorCode::Unknown
        );
    }

    #[test]
    fn test_error_code_from_type() {
        assert_eq!(
            AnthropicErrorCode::from_response(500, "overloaded_error"),
            AnthropicErrorCode::Overloaded
        );
        assert_eq!(
            AnthropicErrorCode::from_response(400, "invalid_request_error"),
            AnthropicErrorCode::InvalidRequest
        );
    }

    #[test]
    fn test_retryable() {
        assert!(AnthropicErrorCode::Overloaded.is_retryable());
        assert!(AnthropicErrorCode::RateLimitExceeded.is_retryable());
        assert!(!AnthropicErrorCode::AuthenticationError.is_retryable());
        assert!(!AnthropicErrorCode::InvalidRequest.is_retryable());
    }

    #[test]
    fn test_to_ideaforge_error() {
        let err = to_ideaforge_error(AnthropicErrorCode::AuthenticationError, "bad key");
        assert!(matches!(err, Error::Inference(_)));
        assert!(err.to_string().contains("Authentication failed: bad key"));
    }
}
