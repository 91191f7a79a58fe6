//! Error types for the realex-rs library.
//!
//! Every failure a call can produce ends up as one [`RealexError`]. None of them are
//! retried inside the crate; the caller decides what to do next.

use thiserror::Error;

/// Main error type for gateway operations.
#[derive(Error, Debug)]
pub enum RealexError {
    /// Required fields are missing for the resolved operation.
    ///
    /// Raised before anything is signed, so no partially built document ever leaves the
    /// crate.
    #[error("Missing required field(s) for {operation}: {}", fields.join(", "))]
    Validation {
        /// Operation (or payment method) being built
        operation: String,
        /// Every field found missing, in declaration order
        fields: Vec<String>,
    },

    /// No operation exists for the requested combination.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The gateway answered with a code outside the accepted set.
    #[error("Unexpected Gateway Response: {code} - {message}")]
    Gateway {
        /// Raw result code
        code: String,
        /// Raw result message
        message: String,
    },

    /// The transport collaborator failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A request document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The gateway response could not be parsed.
    #[error("Response parse error: {0}")]
    ResponseParse(String),

    /// Error during JSON serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error parsing URL
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
}

impl RealexError {
    /// Builds a [`RealexError::Validation`] from a list of missing field names.
    pub fn missing(operation: impl Into<String>, fields: Vec<&str>) -> Self {
        RealexError::Validation {
            operation: operation.into(),
            fields: fields.into_iter().map(str::to_string).collect(),
        }
    }

    /// Returns the gateway result code if this is a [`RealexError::Gateway`].
    pub fn gateway_code(&self) -> Option<&str> {
        match self {
            RealexError::Gateway { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, RealexError>;

impl From<reqwest::Error> for RealexError {
    fn from(err: reqwest::Error) -> Self {
        RealexError::Transport(err.to_string())
    }
}

impl From<quick_xml::DeError> for RealexError {
    fn from(err: quick_xml::DeError) -> Self {
        RealexError::ResponseParse(err.to_string())
    }
}
