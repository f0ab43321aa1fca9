//! Resource Dispatch
//!
//! Turns an operation name plus call arguments into a built request using the
//! registry, then runs it through the client's executor.

use super::registry::{get_resource, OperationDef, OperationMethod, ResourceDef};
use crate::error::{PaystackError, Result};
use crate::paystack::client::ClientContext;
use crate::paystack::request::{BuiltRequest, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Arguments for one operation call
///
/// Path arguments fill `{placeholders}` in the operation path. Parameters go
/// into the query string (GET, DELETE, and calls with a JSON body) or the form
/// body. Setting a JSON body selects the JSON variant of the request.
#[derive(Debug, Clone, Default)]
pub struct Call {
    path_args: HashMap<String, String>,
    params: BTreeMap<String, Value>,
    body: Option<Value>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the `{name}` placeholder of the operation path
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_args.insert(name.into(), value.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn params<K, V, I>(mut self, params: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in params {
            self.params.insert(key.into(), value.into());
        }
        self
    }

    /// Send `body` as JSON
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Handle on one resource group
///
/// Holds only a reference to the client context; cheap to create and drop.
/// Creating a handle performs no I/O.
#[derive(Clone)]
pub struct Resource {
    context: Arc<ClientContext>,
    key: &'static str,
}

impl Resource {
    pub(crate) fn new(context: Arc<ClientContext>, key: &'static str) -> Self {
        Self { context, key }
    }

    /// Registry key, e.g. `customers`
    pub fn key(&self) -> &'static str {
        self.key
    }

    fn definition(&self) -> Result<&'static ResourceDef> {
        get_resource(self.key)
            .ok_or_else(|| PaystackError::InvalidRequest(format!("Unknown resource: {}", self.key)))
    }

    /// Names of the operations this resource supports
    pub fn operations(&self) -> Vec<&'static str> {
        get_resource(self.key)
            .map(|def| def.operations.iter().map(|op| op.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Build the request for `operation` without sending it
    pub fn build(&self, operation: &str, call: &Call) -> Result<BuiltRequest> {
        let def = self.definition()?;
        let Some(op) = def.operation(operation) else {
            return Err(PaystackError::InvalidRequest(format!(
                "Unknown operation {} on {}",
                operation, self.key
            )));
        };

        let base = format!("{}{}", self.context.config.api_root(), def.base_path);
        build_request(&base, op, call)
    }

    /// Call `operation` and return the parsed JSON response
    pub async fn call(&self, operation: &str, call: Call) -> Result<Value> {
        tracing::debug!("call: resource={}, operation={}", self.key, operation);
        let request = self.build(operation, &call)?;
        self.context.executor.execute(request).await
    }

    /// Call `operation` and deserialize the response into `T`
    pub async fn call_as<T: DeserializeOwned>(&self, operation: &str, call: Call) -> Result<T> {
        let request = self.build(operation, &call)?;
        self.context.executor.execute_as(request).await
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource").field("key", &self.key).finish()
    }
}

/// Fill `{placeholders}` from `args`, percent-encoding each value.
/// `.` and `..` are rejected since URL normalisation would drop them.
fn render_path(op: &OperationDef, args: &HashMap<String, String>) -> Result<String> {
    let mut segments = Vec::new();

    for segment in op.path.split('/').filter(|s| !s.is_empty()) {
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                let value = args.get(name).filter(|v| !v.is_empty()).ok_or_else(|| {
                    PaystackError::InvalidRequest(format!(
                        "Missing required path argument: {}",
                        name
                    ))
                })?;
                if value == "." || value == ".." {
                    return Err(PaystackError::InvalidRequest(format!(
                        "Path argument {} cannot be a dot segment",
                        name
                    )));
                }
                segments.push(urlencoding::encode(value).into_owned());
            },
            None => segments.push(segment.to_string()),
        }
    }

    Ok(segments.join("/"))
}

fn build_request(base: &str, op: &OperationDef, call: &Call) -> Result<BuiltRequest> {
    let path = render_path(op, &call.path_args)?;

    let mut builder = RequestBuilder::new(base);
    builder.add_parameters(call.params.clone());

    let body = call.body.clone();

    let request = match (op.method, body) {
        (OperationMethod::Get, None) if path.is_empty() => builder.build_get(),
        (OperationMethod::Get, None) => builder.build_get_by_id(&path),
        (OperationMethod::Delete, None) => builder.build_delete(&path),
        (OperationMethod::Get | OperationMethod::Delete, Some(_)) => {
            return Err(PaystackError::InvalidRequest(format!(
                "{} does not take a JSON body",
                op.name
            )));
        },
        (OperationMethod::Post, body) => {
            if !path.is_empty() {
                builder.set_base_url(format!("{}/{}", base.trim_end_matches('/'), path));
            }
            match body {
                Some(json) => builder.build_post_json(json),
                None => builder.build_post(),
            }
        },
        (OperationMethod::Put, Some(json)) => builder.build_put_json(&path, json),
        (OperationMethod::Put, None) => builder.build_put(&path),
        (OperationMethod::Patch, Some(json)) => builder.build_patch_json(&path, json),
        (OperationMethod::Patch, None) => builder.build_patch(&path),
    };

    Ok(request)
}
