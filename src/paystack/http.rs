//! HTTP execution for Paystack REST API calls

use super::request::{BuiltRequest, RequestBody};
use crate::error::{PaystackError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Sends built requests with the client's secret key attached
///
/// The key is fixed at construction; every executor carries its own.
pub struct RequestExecutor {
    client: Client,
    secret_key: SecretString,
}

impl RequestExecutor {
    /// Create an executor with a default HTTP client
    pub fn new(secret_key: SecretString) -> Result<Self> {
        Self::with_user_agent(secret_key, crate::config::DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(secret_key: SecretString, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(PaystackError::Network)?;

        Ok(Self { client, secret_key })
    }

    /// Send `request` and return the parsed JSON body
    pub async fn execute(&self, request: BuiltRequest) -> Result<Value> {
        let secret = self.secret_key.expose_secret();
        if secret.trim().is_empty() {
            return Err(PaystackError::Config(
                "API secret key cannot be null or empty".to_string(),
            ));
        }

        tracing::debug!("{} {}", request.method, request.url);

        let BuiltRequest {
            method,
            url,
            headers,
            query,
            body,
        } = request;

        let mut builder = self
            .client
            .request(method, &url)
            .headers(headers)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", secret));

        if !query.is_empty() {
            builder = builder.query(&query);
        }

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Json(json) => builder.body(json.to_string()),
        };

        let response = builder.send().await.map_err(PaystackError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(PaystackError::Network)?;

        if status.as_u16() >= 400 {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(PaystackError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                message: api_message(&body),
            });
        }

        if body.trim().is_empty() {
            return Err(PaystackError::EmptyResponse);
        }

        serde_json::from_str(&body).map_err(PaystackError::MalformedResponse)
    }

    /// Send `request` and deserialize the JSON body into `T`
    pub async fn execute_as<T: DeserializeOwned>(&self, request: BuiltRequest) -> Result<T> {
        let value = self.execute(request).await?;
        serde_json::from_value(value).map_err(PaystackError::MalformedResponse)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Paystack error bodies look like `{"status": false, "message": "..."}`
fn api_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

/// Format a Paystack API error for display
pub fn format_paystack_error(error: &PaystackError) -> String {
    match error {
        PaystackError::Http { status: 401, .. } => {
            "Authentication failed. Check your Paystack secret key.".to_string()
        },
        PaystackError::Http { status: 404, .. } => "Resource not found.".to_string(),
        PaystackError::Http { status: 429, .. } => {
            "Rate limit exceeded. Please try again later.".to_string()
        },
        PaystackError::Http { status, .. } if *status >= 500 => {
            "Paystack service temporarily unavailable. Please try again.".to_string()
        },
        PaystackError::Http {
            message: Some(message),
            ..
        } => message.clone(),
        PaystackError::Network(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        },
        other => other.to_string(),
    }
}
