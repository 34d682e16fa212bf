//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use frontdesk_config::ConfigError;
use frontdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the content API at {url}")]
    #[diagnostic(
        code(frontdesk::connection_failed),
        help(
            "Check that the CMS is running and reachable.\n\
             Reason: {reason}\n\
             Try: frontdesk --api-url http://localhost:1337 rooms list"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(frontdesk::timeout),
        help("Increase the timeout with --timeout or check the CMS.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Sign-in failed for '{username}'")]
    #[diagnostic(
        code(frontdesk::auth_failed),
        help("Check the username and password, then run: frontdesk login")
    )]
    AuthFailed { username: String },

    #[error("The content API rejected the request: {message}")]
    #[diagnostic(
        code(frontdesk::unauthorized),
        help(
            "Sign in with: frontdesk login\n\
             Or configure a service token (api_token / FRONTDESK_API_TOKEN)."
        )
    )]
    Unauthorized { message: String },

    #[error("Session error: {message}")]
    #[diagnostic(
        code(frontdesk::session),
        help("Sign in again with: frontdesk login")
    )]
    Session { message: String },

    #[error("Keyring unavailable: {message}")]
    #[diagnostic(
        code(frontdesk::keyring),
        help(
            "The system keyring could not be used.\n\
             Pass the session with FRONTDESK_SESSION_TOKEN instead."
        )
    )]
    Keyring { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(frontdesk::not_found),
        help("Run: frontdesk {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(frontdesk::api_error))]
    ApiError { message: String, status: Option<u16> },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(frontdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(frontdesk::config),
        help(
            "Create a config with: frontdesk config init\n\
             Or inspect the current one with: frontdesk config show"
        )
    )]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(frontdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(frontdesk::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::Unauthorized { .. } | Self::Session { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::AuthenticationFailed { message } => CliError::Unauthorized { message },

            CoreError::GuestNotFound { id } => CliError::NotFound {
                resource_type: "guest".into(),
                identifier: id.to_string(),
                list_command: "guests list".into(),
            },

            CoreError::RoomNotFound { room_no } => CliError::NotFound {
                resource_type: "room".into(),
                identifier: room_no.to_string(),
                list_command: "rooms list".into(),
            },

            CoreError::Api {
                message,
                status: Some(401 | 403),
            } => CliError::Unauthorized { message },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::UnexpectedResponse { message } => CliError::ApiError {
                message,
                status: None,
            },

            CoreError::Session { message } => CliError::Session { message },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use frontdesk_core::RecordId;

    use super::*;

    #[test]
    fn not_found_errors_exit_with_4() {
        let err = CliError::from(CoreError::GuestNotFound { id: RecordId::new(9) });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "guest '9' not found");

        let err = CliError::from(CoreError::RoomNotFound { room_no: 2 });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn rejected_token_is_an_auth_error() {
        let err = CliError::from(CoreError::Api {
            message: "Forbidden".into(),
            status: Some(403),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn api_error_shows_status() {
        let err = CliError::from(CoreError::Api {
            message: "Invalid key guest".into(),
            status: Some(400),
        });
        assert_eq!(err.to_string(), "API error (400): Invalid key guest");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn config_validation_is_usage_error() {
        let err = CliError::from(ConfigError::Validation {
            field: "api_url".into(),
            reason: "invalid URL: nope".into(),
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
