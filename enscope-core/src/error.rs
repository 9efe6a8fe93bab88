//! Error types for ENScope.
//!
//! Only [`ProfileError::InvalidFormat`] and [`ProfileError::NotFound`] ever
//! escape a resolution. The remaining variants are produced by the HTTP clients
//! and absorbed by the resolver as degraded lookup steps.

use thiserror::Error;

/// Result type alias using `ProfileError`.
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Main error type for all ENScope operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    // ═══════════════════════════════════════════════════════════════════════════
    // RESOLUTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The input is not a syntactically valid ENS name.
    #[error("Invalid ENS name format: {0}")]
    InvalidFormat(String),

    /// The name has no resolvable address.
    #[error("ENS name not found: {0}")]
    NotFound(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Service answered with a non-success status.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Input validation failed (anything other than a single name's format).
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ProfileError {
    /// Returns true for the two errors that abort a resolution.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProfileError::InvalidFormat(_) | ProfileError::NotFound(_))
    }

    /// Returns true if this error is transient (a later attempt may succeed).
    pub fn is_recoverable(&self) -> bool {
        match self {
            ProfileError::HttpError(_) => true,
            ProfileError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if no readable body came back: the request never
    /// completed, or the body was not JSON.
    ///
    /// A JSON body with an error status is readable.
    pub fn is_unreadable(&self) -> bool {
        matches!(self, ProfileError::HttpError(_) | ProfileError::JsonError(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ProfileError::InvalidFormat(_) | ProfileError::ValidationError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProfileError::UnexpectedStatus {
            status: 404,
            url: "https://example.com/resolve-name/a.eth".into(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("resolve-name"));

        let err = ProfileError::NotFound("ghost.eth".into());
        assert_eq!(err.to_string(), "ENS name not found: ghost.eth");
    }

    #[test]
    fn test_error_classification() {
        assert!(ProfileError::InvalidFormat("x".into()).is_fatal());
        assert!(ProfileError::NotFound("x.eth".into()).is_fatal());
        assert!(!ProfileError::HttpError("boom".into()).is_fatal());

        assert!(ProfileError::HttpError("boom".into()).is_recoverable());
        assert!(ProfileError::UnexpectedStatus { status: 503, url: String::new() }.is_recoverable());
        assert!(ProfileError::UnexpectedStatus { status: 429, url: String::new() }.is_recoverable());
        assert!(!ProfileError::UnexpectedStatus { status: 404, url: String::new() }.is_recoverable());

        assert!(ProfileError::HttpError("refused".into()).is_unreadable());
        assert!(!ProfileError::UnexpectedStatus { status: 429, url: String::new() }.is_unreadable());
        assert!(!ProfileError::MalformedResponse("array".into()).is_unreadable());

        assert!(ProfileError::InvalidFormat("x".into()).is_validation_error());
        assert!(!ProfileError::NotFound("x.eth".into()).is_validation_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(ProfileError::from);
        assert!(matches!(result, Err(ProfileError::JsonError(_))));
    }

    #[test]
    fn test_url_error_conversion() {
        let err = ProfileError::from(url::Url::parse("not a url").unwrap_err());
        assert!(matches!(err, ProfileError::InvalidUrl(_)));
    }
}
