// ── Core error types ──
//
// Errors raised by validation and by a reconnect pass. The
// `From<nudge_api::Error>` impl translates transport-layer failures into
// the variants the retry loop classifies with `is_transient()`.

use std::fmt;

use thiserror::Error;

/// A setting that must be present once all sources are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    BaseUri,
    Username,
    Password,
}

impl RequiredField {
    /// The flag-style name of the field (`base-uri`, `username`, `password`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BaseUri => "base-uri",
            Self::Username => "username",
            Self::Password => "password",
        }
    }

    /// Human-readable name used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::BaseUri => "Base URI",
            Self::Username => "User name",
            Self::Password => "Password",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("{} is required ({field})", .field.label())]
    MissingRequiredField { field: RequiredField },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Controller errors ────────────────────────────────────────────
    /// The controller answered the login but refused the credentials.
    #[error("Unable to authenticate: the controller rejected the credentials")]
    AuthenticationRejected,

    /// The session was refused on a later request (expired cookie, etc.)
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Controller request timed out ({url})")]
    Timeout { url: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Malformed controller response: {message}")]
    Deserialization { message: String },

    // ── Orchestration errors ─────────────────────────────────────────
    #[error("Reconnect pass failed after {attempts} attempts")]
    RetryExhausted {
        attempts: u32,
        /// One entry per failed attempt, in order.
        errors: Vec<CoreError>,
    },

    #[error("Reconnect pass cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the failure should restart the pass from
    /// authentication rather than abort it.
    ///
    /// A rejected login counts as transient, same as a network failure.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationRejected
                | Self::AuthenticationFailed { .. }
                | Self::ConnectionFailed { .. }
                | Self::Timeout { .. }
                | Self::Api { .. }
                | Self::Deserialization { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<nudge_api::Error> for CoreError {
    fn from(err: nudge_api::Error) -> Self {
        match err {
            nudge_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            nudge_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                }
            }
            nudge_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            nudge_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS setup failed: {msg}"),
            },
            nudge_api::Error::LegacyApi { message, status } => CoreError::Api { message, status },
            nudge_api::Error::Deserialization { message, body: _ } => {
                CoreError::Deserialization { message }
            }
        }
    }
}
