//! Request building
//!
//! [`RequestBuilder`] accumulates parameters and turns them into a
//! [`BuiltRequest`]. Nothing here touches the network.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;

/// Body of a built request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
    Json(Value),
}

/// A fully specified, not yet sent HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    pub method: Method,
    /// Target URL without the query string
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl BuiltRequest {
    fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    fn with_json(mut self, body: Value) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = RequestBody::Json(body);
        self
    }

    /// The target URL with the query string appended
    pub fn to_url(&self) -> Result<url::Url, url::ParseError> {
        let mut url = url::Url::parse(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.body, RequestBody::Json(_))
    }
}

/// Accumulates parameters against a base URL and builds requests from them
///
/// Parameters are kept sorted by key, so building twice from the same state
/// yields identical requests. The builder stays usable after a build; call
/// [`clear_parameters`](Self::clear_parameters) to start over.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    base_url: String,
    params: BTreeMap<String, Value>,
}

impl RequestBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter, replacing any earlier value for the same key
    pub fn add_parameter(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn add_parameters<K, V, I>(&mut self, parameters: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in parameters {
            self.params.insert(key.into(), value.into());
        }
        self
    }

    pub fn clear_parameters(&mut self) -> &mut Self {
        self.params.clear();
        self
    }

    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.params
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET the base URL, parameters as query string
    pub fn build_get(&self) -> BuiltRequest {
        self.with_query(BuiltRequest::new(Method::GET, self.base_url.clone()))
    }

    /// GET `base/id`, parameters as query string
    pub fn build_get_by_id(&self, id: &str) -> BuiltRequest {
        self.with_query(BuiltRequest::new(Method::GET, self.url_for(id)))
    }

    /// POST the base URL, parameters as form fields
    pub fn build_post(&self) -> BuiltRequest {
        self.with_form(BuiltRequest::new(Method::POST, self.base_url.clone()))
    }

    /// POST a JSON body to the base URL, parameters as query string
    pub fn build_post_json(&self, body: Value) -> BuiltRequest {
        self.with_query(BuiltRequest::new(Method::POST, self.base_url.clone()))
            .with_json(body)
    }

    pub fn build_put(&self, id: &str) -> BuiltRequest {
        self.with_form(BuiltRequest::new(Method::PUT, self.url_for(id)))
    }

    pub fn build_put_json(&self, id: &str, body: Value) -> BuiltRequest {
        self.with_query(BuiltRequest::new(Method::PUT, self.url_for(id)))
            .with_json(body)
    }

    pub fn build_patch(&self, id: &str) -> BuiltRequest {
        self.with_form(BuiltRequest::new(Method::PATCH, self.url_for(id)))
    }

    pub fn build_patch_json(&self, id: &str, body: Value) -> BuiltRequest {
        self.with_query(BuiltRequest::new(Method::PATCH, self.url_for(id)))
            .with_json(body)
    }

    /// DELETE `base/id`, parameters as query string
    pub fn build_delete(&self, id: &str) -> BuiltRequest {
        self.with_query(BuiltRequest::new(Method::DELETE, self.url_for(id)))
    }

    /// `id` is appended verbatim; callers percent-encode path values
    fn url_for(&self, id: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            id.trim_start_matches('/')
        )
    }

    fn with_query(&self, mut request: BuiltRequest) -> BuiltRequest {
        request.query = self.pairs();
        request
    }

    fn with_form(&self, mut request: BuiltRequest) -> BuiltRequest {
        request.body = RequestBody::Form(self.pairs());
        request
    }

    fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.params.len());
        for (key, value) in &self.params {
            match value {
                Value::Array(items) => {
                    for item in items {
                        pairs.push((key.clone(), value_to_text(item)));
                    }
                },
                other => pairs.push((key.clone(), value_to_text(other))),
            }
        }
        pairs
    }
}

/// Text form of a parameter value
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
