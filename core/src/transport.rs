//! Transport capability: sends a signed `HttpRequest` and returns the raw
//! `HttpResponse`.
//!
//! Non-2xx statuses are data, not transport failures; only network-level
//! problems become `TransportError`. Timeouts belong to the transport.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round trip.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync,
{
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use std::time::Duration;

    use ureq::{Agent, RequestBuilder};

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a `ureq` agent.
    ///
    /// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
    /// responses come back as data for the client to interpret.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self::build(None)
        }

        /// Transport whose every call is bounded by `timeout`.
        pub fn with_timeout(timeout: Duration) -> Self {
            Self::build(Some(timeout))
        }

        fn build(timeout: Option<Duration>) -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(timeout)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    fn with_headers<B>(
        mut builder: RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = request;

            let result = match (method, body) {
                (HttpMethod::Get, _) => with_headers(self.agent.get(&url), &headers).call(),
                (HttpMethod::Post, Some(body)) => {
                    with_headers(self.agent.post(&url), &headers).send(body.as_bytes())
                }
                (HttpMethod::Post, None) => with_headers(self.agent.post(&url), &headers).send_empty(),
                (HttpMethod::Patch, Some(body)) => {
                    with_headers(self.agent.patch(&url), &headers).send(body.as_bytes())
                }
                (HttpMethod::Patch, None) => {
                    with_headers(self.agent.patch(&url), &headers).send_empty()
                }
            };
            let mut response = result.map_err(TransportError::new)?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            // A received response is never a transport failure, so lift
            // ureq's default 10 MiB read cap.
            let body = response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .read_to_vec()
                .map_err(TransportError::new)?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn closures_are_transports() {
        let transport = |request: HttpRequest| -> Result<HttpResponse, TransportError> {
            assert_eq!(request.method, HttpMethod::Get);
            Ok(HttpResponse::new(200, request.url.into_bytes()))
        };
        let request = HttpRequest::new(HttpMethod::Get, "https://h/echo", None).unwrap();
        let response = transport.send(request).unwrap();
        assert_eq!(response.body_text(), "https://h/echo");
    }

    #[test]
    fn closure_errors_pass_through() {
        let transport =
            |_: HttpRequest| -> Result<HttpResponse, TransportError> { Err(TransportError::new("dns")) };
        let request = HttpRequest::new(HttpMethod::Post, "https://h/x", None).unwrap();
        let err = transport.send(request).unwrap_err();
        assert_eq!(err.to_string(), "transport failed: dns");
    }
}
