//! Paystack Client
//!
//! Entry point of the crate. A client owns its secret key and HTTP client;
//! each accessor hands out a [`Resource`] handle for one API area.

use super::auth::{resolve_secret_key, ConfigEnvironment, KeyType};
use super::http::RequestExecutor;
use crate::config::ClientConfig;
use crate::error::{PaystackError, Result};
use crate::resource::Resource;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// State shared by a client and every handle it creates
#[derive(Debug)]
pub(crate) struct ClientContext {
    pub(crate) executor: RequestExecutor,
    pub(crate) config: ClientConfig,
}

/// Main Paystack client
///
/// Cloning is cheap; clones share the same secret key and connection pool.
#[derive(Debug, Clone)]
pub struct PaystackClient {
    context: Arc<ClientContext>,
}

impl PaystackClient {
    /// Create a client with an explicit secret key
    pub fn new(secret_key: impl Into<String>) -> Result<Self> {
        Self::builder().secret_key(secret_key).build()
    }

    /// Create a client, resolving the secret key from the process environment
    /// and configuration files
    pub fn from_key_type(key_type: KeyType) -> Result<Self> {
        Self::from_key_type_in(key_type, &ConfigEnvironment::from_process())
    }

    /// Create a client, resolving the secret key and any `PAYSTACK_BASE_URL`
    /// override from `env`
    pub fn from_key_type_in(key_type: KeyType, env: &ConfigEnvironment) -> Result<Self> {
        let secret_key = resolve_secret_key(key_type, env)?;
        Self::builder()
            .secret(secret_key)
            .config(ClientConfig::from_lookup(|name| env.var(name).map(str::to_string)))
            .build()
    }

    pub fn builder() -> PaystackClientBuilder {
        PaystackClientBuilder::default()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.context.config
    }

    fn resource(&self, key: &'static str) -> Resource {
        Resource::new(Arc::clone(&self.context), key)
    }
}

/// Defines one accessor per resource group
macro_rules! resource_accessors {
    ($($(#[$doc:meta])* $name:ident => $key:literal;)*) => {
        impl PaystackClient {
            $(
                $(#[$doc])*
                pub fn $name(&self) -> Resource {
                    self.resource($key)
                }
            )*
        }

        /// Registry keys behind the client accessors
        #[cfg(test)]
        pub(crate) const ACCESSOR_KEYS: &[&str] = &[$($key),*];
    };
}

resource_accessors! {
    /// Apple Pay domain registration
    apple_pay => "apple_pay";
    bulk_charges => "bulk_charges";
    /// Direct charges and their authorization steps (PIN, OTP, ...)
    charge => "charge";
    customers => "customers";
    dedicated_virtual_accounts => "dedicated_virtual_accounts";
    disputes => "disputes";
    /// Integration-wide settings such as the payment session timeout
    integration => "integration";
    /// Banks, countries and states
    miscellaneous => "miscellaneous";
    payment_pages => "payment_pages";
    payment_requests => "payment_requests";
    plans => "plans";
    products => "products";
    refunds => "refunds";
    settlements => "settlements";
    subaccounts => "subaccounts";
    subscriptions => "subscriptions";
    transactions => "transactions";
    transfers => "transfers";
    /// Balance checks and transfer OTP settings
    transfers_control => "transfers_control";
    /// Paystack Terminal devices
    terminal => "terminal";
    transaction_split => "transaction_split";
    transfer_recipients => "transfer_recipients";
    /// Account number and card BIN resolution
    verification => "verification";
}

/// Builder for [`PaystackClient`]
#[derive(Default)]
pub struct PaystackClientBuilder {
    secret_key: Option<SecretString>,
    config: Option<ClientConfig>,
}

impl PaystackClientBuilder {
    pub fn secret_key(self, secret_key: impl Into<String>) -> Self {
        self.secret(SecretString::from(secret_key.into()))
    }

    pub fn secret(mut self, secret_key: SecretString) -> Self {
        self.secret_key = Some(secret_key);
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shorthand for overriding only the API root
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let config = self.config.take().unwrap_or_default();
        self.config = Some(config.with_base_url(base_url));
        self
    }

    /// Build the client; fails if no non-empty secret key was given
    pub fn build(self) -> Result<PaystackClient> {
        let secret_key = self
            .secret_key
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                PaystackError::Config("API secret key cannot be null or empty".to_string())
            })?;

        let config = self.config.unwrap_or_default();
        let executor = RequestExecutor::with_user_agent(secret_key, &config.user_agent)?;

        Ok(PaystackClient {
            context: Arc::new(ClientContext { executor, config }),
        })
    }
}

impl std::fmt::Debug for PaystackClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaystackClientBuilder")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("config", &self.config)
            .finish()
    }
}
