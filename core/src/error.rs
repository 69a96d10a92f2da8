//! Error types for the SumSub API client.
//!
//! # Design
//! Every facade operation fails with exactly one `ApiError`: either the send
//! stage failed (`Transport`) or a response arrived but broke the operation's
//! success contract (`BadResponse`, or `Conflict` for a duplicate applicant).
//! The raw response travels with the error so callers can log it.

use thiserror::Error;

use crate::http::HttpResponse;

/// Errors returned by `SumSubClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response arrived with an unexpected status or an unusable body.
    #[error("bad response from API: HTTP {}", .response.status)]
    BadResponse {
        response: Box<HttpResponse>,
        #[source]
        source: Option<DecodeError>,
    },

    /// Create-applicant answered 409: an applicant with this external user id exists.
    #[error("applicant already exists: HTTP {}", .response.status)]
    Conflict { response: Box<HttpResponse> },

    /// A structured request body could not be serialized to JSON.
    #[error("request body serialization failed")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    pub(crate) fn bad_response(response: HttpResponse, source: Option<DecodeError>) -> Self {
        ApiError::BadResponse {
            response: Box::new(response),
            source,
        }
    }

    /// The raw response behind a `BadResponse` or `Conflict`.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::BadResponse { response, .. } | ApiError::Conflict { response } => {
                Some(response)
            }
            ApiError::Transport(_) | ApiError::Serialization(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.status)
    }
}

/// The transport failed before any response was obtained (DNS, connect, TLS,
/// timeout). Wraps whatever error the HTTP library produced.
#[derive(Debug, Error)]
#[error("transport failed: {source}")]
pub struct TransportError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Why a response body could not be turned into the expected JSON mapping.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is empty")]
    Empty,

    #[error("response body is not valid JSON")]
    Json(#[source] serde_json::Error),

    #[error("response body decoded to JSON null")]
    Null,

    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("response body is missing expected fields")]
    Schema(#[source] serde_json::Error),
}

/// Rejected operation request arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("either an applicant id or an external user id is required")]
    MissingApplicantReference,
}

/// Invalid client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url {url:?}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base url {0:?} cannot carry resource paths")]
    CannotBeABase(String),
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn bad_response_exposes_status_and_source() {
        let err = ApiError::bad_response(HttpResponse::new(502, "gateway"), Some(DecodeError::Null));
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "bad response from API: HTTP 502");
        assert!(err.source().is_some());
    }

    #[test]
    fn transport_error_has_no_response() {
        let err = ApiError::from(TransportError::new("connection refused"));
        assert!(err.response().is_none());
        assert_eq!(err.to_string(), "transport failed: connection refused");
    }

    #[test]
    fn conflict_keeps_raw_response() {
        let err = ApiError::Conflict {
            response: Box::new(HttpResponse::new(409, r#"{"description":"exists"}"#)),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.response().unwrap().body_text(), r#"{"description":"exists"}"#);
    }
}
