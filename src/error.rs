//! Error types for bedrock-console
//!
//! Two layers of errors exist:
//! - [`AppError`] covers startup and console failures and is returned from `main`.
//! - [`InvokeError`] is the closed set of per-turn failures raised by a
//!   [`ModelInvoker`](crate::converse::ModelInvoker). The inference adapter renders
//!   every variant as text; none of them ever terminates the session.

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error source carried by failures that wrap a lower-level error
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

/// Failure of a single inference call
///
/// Variants are ordered by how specifically they describe the failure.
/// Anything that is not a service rejection, an unresolvable endpoint or a
/// missing credential lands in [`InvokeError::Unclassified`].
#[derive(Error, Debug)]
pub enum InvokeError {
    /// The endpoint answered but rejected the call
    #[error("{message}")]
    Service {
        code: Option<String>,
        message: String,
    },

    /// The configured region or model id does not lead to a reachable endpoint
    #[error("{message}")]
    EndpointResolution {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// No credential is available to authenticate the call
    #[error("{message}")]
    Credentials { message: String },

    /// Any other failure (timeouts, undecodable bodies, transport errors)
    #[error("{message}")]
    Unclassified {
        category: &'static str,
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl InvokeError {
    /// Short name of the failure kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Service { .. } => "service",
            Self::EndpointResolution { .. } => "endpoint_resolution",
            Self::Credentials { .. } => "credentials",
            Self::Unclassified { .. } => "unclassified",
        }
    }

    /// Machine-readable error code, if the endpoint supplied one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Innermost error in the source chain, rendered as text
    ///
    /// Falls back to the error's own message when there is no source.
    pub fn origin(&self) -> String {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current.to_string()
    }
}
