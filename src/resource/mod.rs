//! Resource abstraction layer
//!
//! Paystack's resource groups are data, not code. Definitions are loaded from
//! JSON files at compile time, so an endpoint is added by editing a table.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`dispatch`] - Turns an operation name and [`Call`] into a request
//!
//! # Resource Definitions
//!
//! Resources are defined in JSON files under `src/resources/`:
//! - `payments.json` - Transactions, charges, refunds, disputes, pages, terminals
//! - `customers.json` - Customers, plans, products, subscriptions, subaccounts
//! - `transfers.json` - Transfers, recipients, balance and OTP control
//! - `platform.json` - Integration settings, verification, miscellaneous lookups

pub mod dispatch;
mod registry;

pub use dispatch::{Call, Resource};
pub use registry::*;
