//! HTTP transport seam for the GitHub client.
//!
//! The client only builds [`HttpRequest`] values and interprets
//! [`HttpResponse`] values; a [`Transport`] moves them over the wire.

use crate::ExportError;
use crate::Result;
use serde_json::Value;
use std::fmt;

/// HTTP methods used by the contents and git data APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
}

impl HttpMethod {
    /// Method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs, in insertion order.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of the first header named `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; `Value::Null` if the body was empty or not JSON.
    pub body: Value,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends requests and returns responses.
///
/// Any response, whatever its status, is `Ok`. Only a request that never
/// produced a response is an error.
pub trait Transport {
    /// Sends `request` and waits for the response.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Transport` if no response was received.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

/// Blocking [`reqwest`] transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport with reqwest's default client settings.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Transport` if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| ExportError::Transport {
                operation: "build HTTP client".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let transport_err = |e: reqwest::Error| ExportError::Transport {
            operation: format!("{} {}", request.method, request.url),
            reason: e.to_string(),
        };

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(transport_err)?;
        let status = response.status().as_u16();
        let text = response.text().map_err(transport_err)?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        tracing::trace!(method = %request.method, url = %request.url, status, "HTTP exchange");
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let req = HttpRequest::new(HttpMethod::Put, "https://example.com/x")
            .with_header("Accept", "application/json")
            .with_body(json!({"a": 1}));

        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("Authorization"), None);
        assert_eq!(req.body, Some(json!({"a": 1})));
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(200, Value::Null).is_success());
        assert!(HttpResponse::new(201, Value::Null).is_success());
        assert!(!HttpResponse::new(199, Value::Null).is_success());
        assert!(!HttpResponse::new(304, Value::Null).is_success());
        assert!(!HttpResponse::new(404, Value::Null).is_success());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
    }
}
