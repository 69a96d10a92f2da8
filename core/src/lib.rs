//! Synchronous client core for the SumSub identity-verification API.
//!
//! # Overview
//! Turns typed operation requests into signed HTTP requests, sends them
//! through a pluggable transport, and maps each response to a typed result
//! or a well-defined `ApiError`.
//!
//! # Design
//! - `SumSubClient` is stateless across calls: base url, signer and
//!   transport are fixed at construction.
//! - Signing (`RequestSigner`) and I/O (`Transport`) are capabilities
//!   injected by the caller, so tests can stub both.
//! - Each operation is also available as a `build_*` / `parse_*` pair for
//!   hosts that execute HTTP themselves.
//! - No retries, caching, pagination or rate limiting.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod interpret;
pub mod signer;
pub mod transport;
pub mod types;

pub use client::SumSubClient;
pub use config::{Credentials, Endpoint};
pub use error::{ApiError, ConfigError, DecodeError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use signer::{HmacSigner, RequestSigner};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use transport::Transport;
pub use types::{
    AccessTokenRequest, AccessTokenResponse, ApplicantDataRequest, ApplicantDataResponse,
    ApplicantReference, ApplicantStatusRequest, ApplicantStatusResponse, ChangeProvidedInfoRequest,
    ChangeTopLevelInfoRequest, CreateApplicantRequest, DocumentImageRequest,
    DocumentImageResponse, InspectionChecksRequest, InspectionChecksResponse, JsonMap,
    RequestApplicantChecksRequest, ResetApplicantRequest,
};
