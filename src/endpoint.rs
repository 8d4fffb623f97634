//! Endpoint definitions loaded from the YAML endpoint list

use crate::errors::{MonitorError, Result};
use reqwest::Method;
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// A single HTTP endpoint to poll
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Endpoint {
    pub name: String,
    pub url: Url,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<RequestBody>,
}

/// Request body as written in the endpoint file.
///
/// Bodies are usually JSON text in a YAML string, but a YAML mapping is
/// accepted as the JSON document itself.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RequestBody {
    Text(String),
    Document(Value),
}

fn default_method() -> String {
    "GET".to_string()
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
            method: default_method(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Authority of the endpoint URL (`host` or `host:port`), used as the
    /// availability key. Default ports for the scheme are omitted.
    pub fn domain(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Parse the configured method, case-insensitively
    pub fn http_method(&self) -> Result<Method> {
        match self.method.trim().to_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "PATCH" => Ok(Method::PATCH),
            "OPTIONS" => Ok(Method::OPTIONS),
            "TRACE" => Ok(Method::TRACE),
            "CONNECT" => Ok(Method::CONNECT),
            other => Err(MonitorError::Config(format!(
                "endpoint '{}' has unsupported method '{}'",
                self.name, other
            ))),
        }
    }

    /// Structured request body, if one is configured
    pub fn json_body(&self) -> Result<Option<Value>> {
        match &self.body {
            None => Ok(None),
            Some(RequestBody::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(RequestBody::Text(text)) => Ok(Some(serde_json::from_str(text)?)),
            Some(RequestBody::Document(doc)) => Ok(Some(doc.clone())),
        }
    }

    /// Validate the endpoint definition
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MonitorError::Config("endpoint name cannot be empty".to_string()));
        }

        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(MonitorError::Config(format!(
                "endpoint '{}' must use http or https, got '{}'",
                self.name,
                self.url.scheme()
            )));
        }

        if self.url.host_str().is_none_or(str::is_empty) {
            return Err(MonitorError::Config(format!(
                "endpoint '{}' has no host in its URL",
                self.name
            )));
        }

        self.http_method()?;

        for (key, value) in &self.headers {
            if HeaderName::from_bytes(key.as_bytes()).is_err() {
                return Err(MonitorError::Config(format!(
                    "endpoint '{}' has an invalid header name '{}'",
                    self.name, key
                )));
            }

            if HeaderValue::from_str(value).is_err() {
                return Err(MonitorError::Config(format!(
                    "endpoint '{}' has an invalid value for header '{}'",
                    self.name, key
                )));
            }
        }

        self.json_body().map_err(|e| {
            MonitorError::Config(format!("endpoint '{}' has an invalid body: {}", self.name, e))
        })?;

        Ok(())
    }
}
