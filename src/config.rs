//! Client Configuration
//!
//! Settings for the HTTP side of the client. The secret key is not part of
//! this; it is passed explicitly or resolved by [`crate::paystack::auth`].

use serde::{Deserialize, Serialize};

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";

pub const DEFAULT_USER_AGENT: &str = concat!("paystack-rs/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding the API root
const BASE_URL_ENV: &str = "PAYSTACK_BASE_URL";

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// API root every resource path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Defaults, with `PAYSTACK_BASE_URL` applied when set in the process
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults, with `PAYSTACK_BASE_URL` taken from `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Using Paystack base URL from {}", BASE_URL_ENV);
                config.base_url = url;
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL without a trailing slash
    pub(crate) fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
