//! HTTP request/response types shared by the signer, the transport and the
//! response interpreter.
//!
//! # Design
//! Requests and responses are plain data. The client assembles an
//! `HttpRequest`, hands it to a `RequestSigner`, and the resulting value is
//! passed by value to a `Transport`; nothing mutates it afterwards. Response
//! bodies are raw bytes because document images are not text.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

pub const ACCEPT: &str = "Accept";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body handed to the request builder.
///
/// `Text` is sent verbatim, which lets callers pre-serialize a payload.
/// `Json` is serialized when the request is assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Json(Value),
}

impl RequestBody {
    /// Converts any serializable value into a JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(RequestBody::Json)
            .map_err(ApiError::Serialization)
    }

    /// Serialized form of the body, or `None` when there is nothing to send.
    pub(crate) fn into_text(self) -> Result<Option<String>, ApiError> {
        let text = match self {
            RequestBody::Text(text) => text,
            RequestBody::Json(Value::Null) => return Ok(None),
            RequestBody::Json(value) => {
                serde_json::to_string(&value).map_err(ApiError::Serialization)?
            }
        };
        Ok(if text.is_empty() { None } else { Some(text) })
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries its query string.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Assembles an unsigned request with the standard headers.
    ///
    /// `Accept: application/json` is always set. `Content-Type` is set only
    /// when a non-empty body is present.
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        body: Option<RequestBody>,
    ) -> Result<Self, ApiError> {
        let body = match body {
            Some(body) => body.into_text()?,
            None => None,
        };
        let mut headers = vec![(ACCEPT.to_string(), APPLICATION_JSON.to_string())];
        if body.is_some() {
            headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        }
        Ok(Self {
            method,
            url: url.into(),
            headers,
            body,
        })
    }

    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// An HTTP response described as plain data, produced by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    /// Body as text for diagnostics; invalid UTF-8 is replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_without_body_only_accepts_json() {
        let req = HttpRequest::new(HttpMethod::Get, "https://api.sumsub.com/x", None).unwrap();
        assert_eq!(
            req.headers,
            vec![("Accept".to_string(), "application/json".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn json_body_sets_content_type() {
        let body = RequestBody::Json(json!({"externalUserId": "u-1"}));
        let req = HttpRequest::new(HttpMethod::Post, "https://h/x", Some(body)).unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"externalUserId":"u-1"}"#));
    }

    #[test]
    fn text_body_is_passed_through_verbatim() {
        let body = RequestBody::Text("{ \"raw\" : true }".to_string());
        let req = HttpRequest::new(HttpMethod::Patch, "https://h/x", Some(body)).unwrap();
        assert_eq!(req.body.as_deref(), Some("{ \"raw\" : true }"));
    }

    #[test]
    fn empty_and_null_bodies_are_dropped() {
        for body in [RequestBody::Text(String::new()), RequestBody::Json(Value::Null)] {
            let req = HttpRequest::new(HttpMethod::Post, "https://h/x", Some(body)).unwrap();
            assert!(req.body.is_none());
            assert!(req.header(CONTENT_TYPE).is_none());
        }
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let resp = HttpResponse::new(200, "x").with_header("content-type", "image/jpeg");
        assert_eq!(resp.content_type(), Some("image/jpeg"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("image/jpeg"));
        assert_eq!(resp.header("x-missing"), None);
    }
}
