//! Response interpretation: status checks and JSON decoding.
//!
//! Every JSON-decoding operation goes through `decode_json`, so malformed
//! payloads always surface as `ApiError::BadResponse` carrying the raw
//! response and the decode fault.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ApiError, DecodeError};
use crate::http::HttpResponse;

/// Passes the response through when its status equals `expected`.
pub fn expect_status(response: HttpResponse, expected: u16) -> Result<HttpResponse, ApiError> {
    if response.status == expected {
        return Ok(response);
    }
    debug!(status = response.status, expected, "unexpected response status");
    Err(ApiError::bad_response(response, None))
}

/// Decodes the body into a JSON object.
///
/// Empty bodies, invalid JSON, the literal `null` and non-object values are
/// all rejected.
pub fn decode_json(response: HttpResponse) -> Result<Map<String, Value>, ApiError> {
    match decode_object(&response.body) {
        Ok(map) => Ok(map),
        Err(err) => {
            debug!(status = response.status, error = %err, "undecodable response body");
            Err(ApiError::bad_response(response, Some(err)))
        }
    }
}

/// Decodes the body into `T`, going through the same checks as `decode_json`.
pub fn decode_as<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let result = decode_object(&response.body)
        .and_then(|map| serde_json::from_value(Value::Object(map)).map_err(DecodeError::Schema));
    result.map_err(|err| {
        debug!(status = response.status, error = %err, "response does not match schema");
        ApiError::bad_response(response, Some(err))
    })
}

fn decode_object(body: &[u8]) -> Result<Map<String, Value>, DecodeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::Empty);
    }
    match serde_json::from_slice(body).map_err(DecodeError::Json)? {
        Value::Object(map) => Ok(map),
        Value::Null => Err(DecodeError::Null),
        _ => Err(DecodeError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(200, body)
    }

    #[test]
    fn expect_status_matches_exactly() {
        assert!(expect_status(ok("{}"), 200).is_ok());
        let err = expect_status(ok("{}"), 201).unwrap_err();
        assert!(matches!(err, ApiError::BadResponse { source: None, .. }));
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn decode_json_returns_object() {
        let map = decode_json(ok(r#"{"id":"abc","review":{"reviewStatus":"init"}}"#)).unwrap();
        assert_eq!(map["id"], "abc");
        assert_eq!(map["review"]["reviewStatus"], "init");
    }

    #[test]
    fn decode_json_rejects_unusable_bodies() {
        let cases = [
            ("", "empty"),
            ("   \n", "empty"),
            ("null", "null"),
            ("not json", "json"),
            ("[1,2]", "not-object"),
            ("42", "not-object"),
        ];
        for (body, kind) in cases {
            let err = decode_json(ok(body)).unwrap_err();
            let ApiError::BadResponse { response, source } = err else {
                panic!("{body:?}: expected BadResponse");
            };
            assert_eq!(response.body_text(), body);
            let matched = match (kind, source) {
                ("empty", Some(DecodeError::Empty)) => true,
                ("null", Some(DecodeError::Null)) => true,
                ("json", Some(DecodeError::Json(_))) => true,
                ("not-object", Some(DecodeError::NotAnObject)) => true,
                _ => false,
            };
            assert!(matched, "{body:?}: wrong decode error");
        }
    }

    #[test]
    fn decode_as_reports_missing_fields_as_schema_errors() {
        #[derive(Debug, Deserialize)]
        struct Token {
            #[allow(dead_code)]
            token: String,
        }
        let err = decode_as::<Token>(ok(r#"{"userId":"u"}"#)).unwrap_err();
        assert!(matches!(
            err,
            ApiError::BadResponse {
                source: Some(DecodeError::Schema(_)),
                ..
            }
        ));
    }
}
