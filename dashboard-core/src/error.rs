use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    Config(String),

    /// DOM, storage or Blob API call rejected by the browser
    #[error("Browser error: {0}")]
    Browser(String),
}

impl DashboardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Transient failures get a retry control; the rest do not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Timeout(_) | Self::Network(_) | Self::Decode(_)
        )
    }

    /// Text shown in toasts and inline error rows.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Timeout(_) => "Request timed out. Please try again.".to_string(),
            Self::Http { status, message } => format!("Server error: HTTP {}: {}", status, message),
            Self::Network(_) => "Network error. Please check your connection.".to_string(),
            Self::Decode(msg) => format!("Unexpected response from server: {}", msg),
            Self::NotFound(path) => format!("Page not found: {}", path),
            Self::Config(msg) => format!("Configuration problem: {}", msg),
            Self::Browser(msg) => format!("Browser error: {}", msg),
        }
    }

    /// Same as `user_message`, prefixed with what was being attempted.
    pub fn user_message_in(&self, context: &str) -> String {
        format!("{}: {}", context, self.user_message())
    }
}

impl From<DashboardError> for String {
    fn from(err: DashboardError) -> Self {
        err.to_string()
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for DashboardError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = DashboardError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Request timed out after 30s");
        assert_eq!(err.user_message(), "Request timed out. Please try again.");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_http_message_with_context() {
        let err = DashboardError::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.user_message_in("Failed to load data"),
            "Failed to load data: Server error: HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn test_validation_and_not_found_are_not_retryable() {
        assert!(!DashboardError::validation("bad range").is_retryable());
        assert!(!DashboardError::NotFound("/nope".into()).is_retryable());
    }
}
