//! Async client for the Paystack payments API
//!
//! One client per secret key; one [`Resource`] handle per API area
//! (customers, transactions, transfers, ...). Each call builds a request,
//! sends it with bearer authentication and returns the parsed JSON body.
//!
//! ```no_run
//! use paystack::{Call, PaystackClient};
//! use serde_json::json;
//!
//! async fn example() -> paystack::Result<()> {
//!     let client = PaystackClient::new("sk_test_xxx")?;
//!
//!     let customer = client
//!         .customers()
//!         .call("create", Call::new().json(json!({ "email": "ada@example.com" })))
//!         .await?;
//!
//!     let banks = client
//!         .miscellaneous()
//!         .call("list_banks", Call::new().param("country", "nigeria"))
//!         .await?;
//!
//!     println!("{} {}", customer["data"]["customer_code"], banks["data"][0]["name"]);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod paystack;
pub mod resource;

pub use config::ClientConfig;
pub use error::{PaystackError, Result};
pub use models::ApiResponse;
pub use paystack::auth::{resolve_secret_key, ConfigEnvironment, KeyType};
pub use paystack::client::{PaystackClient, PaystackClientBuilder};
pub use paystack::http::{format_paystack_error, RequestExecutor};
pub use paystack::request::{BuiltRequest, RequestBody, RequestBuilder};
pub use resource::{Call, Resource};
pub use secrecy::SecretString;
