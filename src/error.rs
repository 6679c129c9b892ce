//! Error types and handling.

use reqwest::StatusCode;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Login rejected by the backend
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Session cookie missing or expired
    #[error("Not logged in or session expired")]
    Unauthorized,

    /// Logged in, but the role lacks the required permission
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Backend answered with a non-success status
    #[error("Server error {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Data parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excel export error
    #[error("Export error: {0}")]
    Export(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a parse error with message
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True when the session has to be re-established by logging in again.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Message suitable for an inline form label.
    pub fn user_message(&self) -> String {
        match self {
            Self::LoginFailed(msg) | Self::Validation(msg) | Self::Forbidden(msg) => msg.clone(),
            Self::Unauthorized => "Sitzung abgelaufen, bitte erneut anmelden".to_string(),
            Self::Http(e) if e.is_connect() || e.is_timeout() => "Server nicht erreichbar".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = AppError::Api {
            status: StatusCode::BAD_REQUEST,
            message: "User with this employee ID already exists".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Server error 400 Bad Request: User with this employee ID already exists"
        );
    }

    #[test]
    fn test_is_auth_error() {
        assert!(AppError::Unauthorized.is_auth_error());
        assert!(!AppError::Forbidden("role".into()).is_auth_error());
        assert!(!AppError::validation("x").is_auth_error());
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            AppError::LoginFailed("Falsche Anmeldedaten".into()).user_message(),
            "Falsche Anmeldedaten"
        );
        assert_eq!(AppError::validation("Nur Zahlen erlaubt!").user_message(), "Nur Zahlen erlaubt!");
        assert_eq!(AppError::parse("bad").user_message(), "Parse error: bad");
    }
}
