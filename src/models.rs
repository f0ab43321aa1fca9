//! Response envelope shared by all Paystack endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ "status": true, "message": "...", "data": ..., "meta": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    /// Page information on list endpoints
    pub meta: Option<Value>,
}
