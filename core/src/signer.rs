//! Request signing.
//!
//! The client never authenticates requests itself; it hands every assembled
//! request to a `RequestSigner`. `HmacSigner` implements the service's
//! App-Token scheme:
//! 1. Takes the current unix time in seconds
//! 2. Computes HMAC-SHA256 over `ts + METHOD + path?query + body`
//! 3. Attaches token, timestamp and hex signature as headers

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::{Position, Url};

use crate::config::Credentials;
use crate::http::HttpRequest;

type HmacSha256 = Hmac<Sha256>;

pub const APP_TOKEN_HEADER: &str = "X-App-Token";
pub const ACCESS_TS_HEADER: &str = "X-App-Access-Ts";
pub const ACCESS_SIG_HEADER: &str = "X-App-Access-Sig";

/// Attaches authentication to an outgoing request.
///
/// Implementations return a new request carrying extra headers and must not
/// change the method, url or body.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: HttpRequest) -> HttpRequest;
}

impl<S: RequestSigner + ?Sized> RequestSigner for Box<S> {
    fn sign(&self, request: HttpRequest) -> HttpRequest {
        (**self).sign(request)
    }
}

impl<S: RequestSigner + ?Sized> RequestSigner for std::sync::Arc<S> {
    fn sign(&self, request: HttpRequest) -> HttpRequest {
        (**self).sign(request)
    }
}

/// HMAC-SHA256 App-Token signer.
#[derive(Clone)]
pub struct HmacSigner {
    app_token: String,
    secret_key: String,
}

impl HmacSigner {
    pub fn new(app_token: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            app_token: app_token.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Signs with an explicit timestamp (unix seconds).
    pub fn sign_at(&self, request: HttpRequest, timestamp: u64) -> HttpRequest {
        let ts = timestamp.to_string();
        let mut payload = String::with_capacity(request.url.len() + 32);
        payload.push_str(&ts);
        payload.push_str(request.method.as_str());
        payload.push_str(&path_and_query(&request.url));
        if let Some(body) = &request.body {
            payload.push_str(body);
        }
        let signature = self.compute_signature(&payload);

        request
            .with_header(APP_TOKEN_HEADER, self.app_token.as_str())
            .with_header(ACCESS_TS_HEADER, ts)
            .with_header(ACCESS_SIG_HEADER, signature)
    }

    fn compute_signature(&self, data: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(self.secret_key.as_bytes()).expect("HMAC can take any size");
        mac.update(data.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl From<Credentials> for HmacSigner {
    fn from(credentials: Credentials) -> Self {
        Self::new(credentials.app_token, credentials.secret_key)
    }
}

impl RequestSigner for HmacSigner {
    fn sign(&self, request: HttpRequest) -> HttpRequest {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.sign_at(request, now)
    }
}

/// `/path?query` part of an absolute url; the url itself if it does not parse.
fn path_and_query(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed[Position::BeforePath..Position::AfterQuery].to_string(),
        Err(_) => url.to_string(),
    }
}
