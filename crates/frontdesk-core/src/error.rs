// ── Core error types ──
//
// User-facing errors from frontdesk-core. Consumers never see reqwest
// errors or JSON parse failures directly; the `From<frontdesk_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::model::RecordId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the content API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Content API timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Guest not found: {id}")]
    GuestNotFound { id: RecordId },

    #[error("No room found with number {room_no}")]
    RoomNotFound { room_no: i64 },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if the server answered).
        status: Option<u16>,
    },

    #[error("Unexpected response from the content API: {message}")]
    UnexpectedResponse { message: String },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Session error: {message}")]
    Session { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status carried by an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<frontdesk_api::Error> for CoreError {
    fn from(err: frontdesk_api::Error) -> Self {
        match err {
            frontdesk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            frontdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            frontdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            frontdesk_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            frontdesk_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            frontdesk_api::Error::Api {
                status, message, ..
            } => CoreError::Api {
                message,
                status: Some(status),
            },
            frontdesk_api::Error::MissingData => CoreError::UnexpectedResponse {
                message: "response envelope has no `data`".into(),
            },
            frontdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::UnexpectedResponse { message }
            }
        }
    }
}
