//! Paystack API interaction module
//!
//! This module provides the core functionality for talking to the Paystack
//! REST API: secret key resolution, request building, request execution and
//! the client facade.
//!
//! # Module Structure
//!
//! - [`auth`] - Secret key resolution from environment, properties and files
//! - [`client`] - Main client exposing one accessor per resource group
//! - [`http`] - Executes built requests with bearer authentication
//! - [`request`] - Builds requests from accumulated parameters
//!
//! # Example
//!
//! ```no_run
//! use paystack::{Call, KeyType, PaystackClient};
//!
//! async fn example() -> paystack::Result<()> {
//!     let client = PaystackClient::from_key_type(KeyType::Test)?;
//!     let verified = client
//!         .transactions()
//!         .call("verify", Call::new().arg("reference", "T123"))
//!         .await?;
//!     println!("{}", verified["data"]["status"]);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod request;
