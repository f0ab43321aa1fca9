//! Error types
//!
//! Every failure surfaced by the client is a [`PaystackError`]. Callers can
//! match on the variant instead of inspecting message text.

use crate::paystack::auth::KeyType;

/// Errors returned by the Paystack client
#[derive(Debug, thiserror::Error)]
pub enum PaystackError {
    /// Missing or empty secret key, or no configuration source defined one
    #[error("configuration error: {0}")]
    Config(String),

    /// The API answered with a status code of 400 or above
    #[error("request failed with status {status}: {status_text}{}", format_api_message(.message))]
    Http {
        status: u16,
        status_text: String,
        /// `message` field of the Paystack error body, when present
        message: Option<String>,
    },

    /// A successful status code arrived with no body
    #[error("received empty response body")]
    EmptyResponse,

    /// The body was not valid JSON, or did not match the requested type
    #[error("failed to parse JSON response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// Connection, TLS or timeout failure below the HTTP layer
    #[error("network or request error: {0}")]
    Network(#[source] reqwest::Error),

    /// The call could not be turned into a request (unknown operation,
    /// missing path argument, body on a bodiless method)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

fn format_api_message(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(" ({})", m),
        None => String::new(),
    }
}

impl PaystackError {
    /// No secret key could be found for `key_type`
    pub(crate) fn no_key_found(key_type: KeyType) -> Self {
        Self::Config(format!(
            "no Paystack {} API key found in any configuration source",
            key_type
        ))
    }

    /// HTTP status code, for [`PaystackError::Http`] errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PaystackError>;
