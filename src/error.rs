//! Error types for Persona Advisor
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-facing messages for the form and the CLI
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for advisor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Prefix shown in front of boundary and internal failures on the page
pub const FAILURE_PREFIX: &str = "エラーが発生しました：";

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Submission errors (3xx)
    MissingCredential = 300,
    EmptyInput = 301,

    // Completion boundary errors (4xx)
    BoundaryRequest = 400,
    BoundaryStatus = 401,
    BoundaryMalformed = 402,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            400..=499 => 40,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the advisor
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Submission Errors
    // ─────────────────────────────────────────────────────────────

    /// No API key could be resolved from env, `.env` or the secrets file
    #[error("OpenAI APIキーが見つかりません。.env または Streamlit Secrets に OPENAI_API_KEY を設定してください。")]
    MissingCredential,

    /// Submitted text was blank after trimming
    #[error("入力テキストを入れてください。")]
    EmptyInput,

    // ─────────────────────────────────────────────────────────────
    // Completion Boundary Errors
    // ─────────────────────────────────────────────────────────────

    /// The request never produced an HTTP response (DNS, connect, TLS, timeout)
    #[error("{message}")]
    BoundaryRequest { message: String },

    /// The endpoint answered with a non-success status (auth, quota, rate limit)
    #[error("API error {status}: {message}")]
    BoundaryStatus { status: u16, message: String },

    /// The endpoint answered 2xx but the body was not a usable completion
    #[error("Malformed completion response: {message}")]
    BoundaryMalformed { message: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::MissingCredential => ErrorCode::MissingCredential,
            Error::EmptyInput => ErrorCode::EmptyInput,

            Error::BoundaryRequest { .. } => ErrorCode::BoundaryRequest,
            Error::BoundaryStatus { .. } => ErrorCode::BoundaryStatus,
            Error::BoundaryMalformed { .. } => ErrorCode::BoundaryMalformed,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether this error came from the completion endpoint
    pub fn is_boundary_failure(&self) -> bool {
        matches!(
            self,
            Error::BoundaryRequest { .. }
                | Error::BoundaryStatus { .. }
                | Error::BoundaryMalformed { .. }
        )
    }

    /// Whether this error was raised before any outbound call was attempted
    pub fn is_rejected_submission(&self) -> bool {
        matches!(self, Error::MissingCredential | Error::EmptyInput)
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// Message shown to the person who submitted the form.
    ///
    /// Validation errors are shown as-is; anything else is prefixed so the
    /// underlying message reaches the user verbatim after the prefix.
    pub fn user_message(&self) -> String {
        if self.is_rejected_submission() {
            self.to_string()
        } else {
            format!("{}{}", FAILURE_PREFIX, self)
        }
    }

    /// Get a suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'persona-advisor config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'persona-advisor config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::MissingCredential => Some(
                "Set OPENAI_API_KEY in the environment, in .env, or in .streamlit/secrets.toml."
            ),
            Error::BoundaryRequest { .. } => Some(
                "Check your network connection and the [openai] base_url setting."
            ),
            Error::BoundaryStatus { status: 401, .. } => Some(
                "The API key was rejected. Check that OPENAI_API_KEY is valid."
            ),
            Error::BoundaryStatus { status: 429, .. } => Some(
                "The API quota or rate limit was hit. Wait and resubmit."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            self.code().as_str(),
            self
        );

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    pub fn config_parse(message: impl Into<String>, source: toml::de::Error) -> Self {
        Error::ConfigParse {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn boundary_request(message: impl Into<String>) -> Self {
        Error::BoundaryRequest {
            message: message.into(),
        }
    }

    pub fn boundary_malformed(message: impl Into<String>) -> Self {
        Error::BoundaryMalformed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::ConfigNotFound.as_str(), "E100");
        assert_eq!(ErrorCode::MissingCredential.as_str(), "E300");
        assert_eq!(ErrorCode::BoundaryStatus.as_str(), "E401");
        assert_eq!(ErrorCode::InternalError.as_str(), "E900");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(ErrorCode::ConfigValidation.exit_code(), 10);
        assert_eq!(ErrorCode::IoRead.exit_code(), 20);
        assert_eq!(ErrorCode::EmptyInput.exit_code(), 30);
        assert_eq!(ErrorCode::BoundaryMalformed.exit_code(), 40);
        assert_eq!(ErrorCode::InternalError.exit_code(), 90);
    }

    #[test]
    fn test_submission_messages_are_shown_as_is() {
        assert_eq!(
            Error::EmptyInput.user_message(),
            "入力テキストを入れてください。"
        );
        assert!(Error::MissingCredential
            .user_message()
            .starts_with("OpenAI APIキーが見つかりません。"));
        assert!(Error::MissingCredential.is_rejected_submission());
    }

    #[test]
    fn test_boundary_message_is_verbatim_after_prefix() {
        let err = Error::boundary_request("connection reset by peer");
        assert!(err.is_boundary_failure());
        assert_eq!(
            err.user_message(),
            "エラーが発生しました：connection reset by peer"
        );

        let err = Error::BoundaryStatus {
            status: 429,
            message: "Rate limit reached".into(),
        };
        assert!(err.user_message().contains("API error 429: Rate limit reached"));
        assert!(err.suggestion().unwrap().contains("rate limit"));
    }

    #[test]
    fn test_format_for_terminal() {
        let formatted = Error::config_not_found("/test/config.toml").format_for_terminal();
        assert!(formatted.contains("E100"));
        assert!(formatted.contains("\x1b[31m"));
        assert!(formatted.contains("Hint"));
    }

    #[test]
    fn test_format_for_log() {
        let formatted = Error::EmptyInput.format_for_log();
        assert!(formatted.starts_with("[E301]"));
        assert!(!formatted.contains("\x1b["));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert_eq!(err.code(), ErrorCode::IoNotFound);
        assert!(!err.is_boundary_failure());
    }
}
