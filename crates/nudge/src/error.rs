//! CLI error types with miette diagnostics.
//!
//! Maps `ConfigError` and `CoreError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use nudge_config::ConfigError;
use nudge_core::{CoreError, RequiredField};

/// Process exit codes. Clap exits with 2 on its own for bad usage.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("{} is required ({})", .field.label(), .field.as_str())]
    #[diagnostic(
        code(nudge::missing_field),
        help("Pass --{flag}, set {env} or add \"{key}\" to the options file.")
    )]
    MissingField {
        field: RequiredField,
        flag: &'static str,
        env: &'static str,
        key: &'static str,
    },

    #[error("Invalid base URI '{value}'")]
    #[diagnostic(
        code(nudge::invalid_base_uri),
        help("Use an absolute URL such as https://192.168.1.1 or https://unifi.local:8443")
    )]
    InvalidBaseUri {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Could not parse options file {path}")]
    #[diagnostic(
        code(nudge::options_file),
        help("The options file must be a JSON object, e.g. {{\"baseUri\": \"https://192.168.1.1\"}}")
    )]
    OptionsFile {
        path: String,
        #[source]
        source: Box<figment::Error>,
    },

    #[error(transparent)]
    #[diagnostic(code(nudge::io))]
    Io(#[from] std::io::Error),

    // ── Controller ───────────────────────────────────────────────────

    #[error("Gave up after {attempts} failed attempts")]
    #[diagnostic(
        code(nudge::retry_exhausted),
        help(
            "Check that the controller is reachable and the credentials are correct.\n\
             Use --insecure-tls (-i) if the controller uses a self-signed certificate."
        )
    )]
    RetryExhausted {
        attempts: u32,
        #[related]
        failures: Vec<AttemptFailure>,
    },

    #[error("Interrupted")]
    #[diagnostic(code(nudge::cancelled))]
    Cancelled,

    #[error("{message}")]
    #[diagnostic(code(nudge::controller))]
    Controller { message: String },
}

/// One failed attempt, listed under [`CliError::RetryExhausted`].
#[derive(Debug, Error, Diagnostic)]
#[error("attempt {attempt}: {message}")]
#[diagnostic(severity(Warning))]
pub struct AttemptFailure {
    attempt: usize,
    message: String,
}

fn env_var(field: RequiredField) -> &'static str {
    match field {
        RequiredField::BaseUri => "NUDGE_BASE_URI",
        RequiredField::Username => "NUDGE_USERNAME",
        RequiredField::Password => "NUDGE_PASSWORD",
    }
}

fn file_key(field: RequiredField) -> &'static str {
    match field {
        RequiredField::BaseUri => "baseUri",
        RequiredField::Username => "username",
        RequiredField::Password => "password",
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingRequiredField { field } => Self::MissingField {
                field,
                flag: field.as_str(),
                env: env_var(field),
                key: file_key(field),
            },
            CoreError::RetryExhausted { attempts, errors } => Self::RetryExhausted {
                attempts,
                failures: errors
                    .into_iter()
                    .enumerate()
                    .map(|(i, e)| AttemptFailure {
                        attempt: i + 1,
                        message: e.to_string(),
                    })
                    .collect(),
            },
            CoreError::Cancelled => Self::Cancelled,
            other => Self::Controller {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Parse { path, source } => Self::OptionsFile {
                path: path.display().to_string(),
                source,
            },
            ConfigError::Io(e) => Self::Io(e),
            ConfigError::Invalid(e) => e.into(),
        }
    }
}
