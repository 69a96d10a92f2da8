//! Signed request builder and operations facade for the SumSub API.
//!
//! # Design
//! `SumSubClient` holds only immutable configuration: the base url, a
//! `RequestSigner` and a `Transport`. Each remote operation is split into a
//! `build_*` method that produces a signed `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`; the one-call method in between
//! sends the request through the transport exactly once. Hosts that want to
//! run the HTTP round trip themselves can call `build_*`/`parse_*` directly.

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::Endpoint;
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::interpret::{decode_as, decode_json, expect_status};
use crate::signer::RequestSigner;
use crate::transport::Transport;
use crate::types::{
    AccessTokenRequest, AccessTokenResponse, ApplicantDataRequest, ApplicantDataResponse,
    ApplicantReference, ApplicantStatusRequest, ApplicantStatusResponse, ChangeProvidedInfoRequest,
    ChangeTopLevelInfoRequest, CreateApplicantRequest, DocumentImageRequest,
    DocumentImageResponse, InspectionChecksRequest, InspectionChecksResponse,
    RequestApplicantChecksRequest, ResetApplicantRequest,
};

/// Synchronous client for the SumSub REST API.
///
/// Safe to share between threads when the signer and transport are.
#[derive(Debug, Clone)]
pub struct SumSubClient<S, T> {
    base_url: Url,
    signer: S,
    transport: T,
}

#[cfg(feature = "ureq")]
impl SumSubClient<crate::signer::HmacSigner, crate::transport::UreqTransport> {
    /// Client signing with App-Token credentials over a default ureq transport.
    pub fn with_credentials(
        endpoint: &Endpoint,
        credentials: crate::config::Credentials,
    ) -> Result<Self, ConfigError> {
        Self::new(
            endpoint,
            credentials.into(),
            crate::transport::UreqTransport::new(),
        )
    }
}

impl<S: RequestSigner, T> SumSubClient<S, T> {
    pub fn new(endpoint: &Endpoint, signer: S, transport: T) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: endpoint.base_url()?,
            signer,
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/resources/{segments...}`, each segment percent-encoded.
    fn resource_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Endpoint::base_url rejects cannot-be-a-base urls.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push("resources")
                .extend(segments.iter().copied());
        }
        url
    }

    fn signed_request(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<RequestBody>,
    ) -> Result<HttpRequest, ApiError> {
        let request = HttpRequest::new(method, url, body)?;
        Ok(self.signer.sign(request))
    }

    // --- access tokens ---

    pub fn build_access_token(&self, request: &AccessTokenRequest) -> Result<HttpRequest, ApiError> {
        let mut url = self.resource_url(&["accessTokens"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("userId", request.user_id())
                .append_pair("levelName", request.level_name());
            if let Some(ttl) = request.ttl_in_secs() {
                query.append_pair("ttlInSecs", &ttl.to_string());
            }
        }
        self.signed_request(HttpMethod::Post, url, None)
    }

    pub fn parse_access_token(&self, response: HttpResponse) -> Result<AccessTokenResponse, ApiError> {
        decode_as(expect_status(response, 200)?)
    }

    // --- applicants ---

    pub fn build_create_applicant(
        &self,
        request: &CreateApplicantRequest,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = self.resource_url(&["applicants"]);
        url.query_pairs_mut()
            .append_pair("levelName", request.level_name());
        self.signed_request(HttpMethod::Post, url, Some(RequestBody::json(request)?))
    }

    pub fn parse_create_applicant(
        &self,
        response: HttpResponse,
    ) -> Result<ApplicantDataResponse, ApiError> {
        if response.status == 409 {
            debug!("applicant already exists");
            return Err(ApiError::Conflict {
                response: Box::new(response),
            });
        }
        let data = decode_json(expect_status(response, 201)?)?;
        Ok(ApplicantDataResponse::new(data))
    }

    pub fn build_change_applicant_info(
        &self,
        request: &ChangeProvidedInfoRequest,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url(&["applicants", request.applicant_id(), "fixedInfo"]);
        let body = RequestBody::Json(Value::Object(request.fixed_info().clone()));
        self.signed_request(HttpMethod::Patch, url, Some(body))
    }

    pub fn parse_change_applicant_info(
        &self,
        response: HttpResponse,
    ) -> Result<ApplicantDataResponse, ApiError> {
        self.parse_applicant_data(response)
    }

    pub fn build_change_applicant_top_level_info(
        &self,
        request: &ChangeTopLevelInfoRequest,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url(&["applicants"]);
        self.signed_request(HttpMethod::Patch, url, Some(RequestBody::json(request)?))
    }

    pub fn parse_change_applicant_top_level_info(
        &self,
        response: HttpResponse,
    ) -> Result<ApplicantDataResponse, ApiError> {
        self.parse_applicant_data(response)
    }

    pub fn build_request_applicant_check(
        &self,
        request: &RequestApplicantChecksRequest,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url(&["applicants", request.applicant_id(), "status", "pending"]);
        self.signed_request(HttpMethod::Post, url, None)
    }

    pub fn parse_request_applicant_check(
        &self,
        response: HttpResponse,
    ) -> Result<ApplicantDataResponse, ApiError> {
        self.parse_applicant_data(response)
    }

    /// Looks up by applicant id when one is set, otherwise by external user id.
    pub fn build_applicant_data(&self, request: &ApplicantDataRequest) -> Result<HttpRequest, ApiError> {
        let url = match request.reference() {
            ApplicantReference::ApplicantId(id) => self.resource_url(&["applicants", id.as_str(), "one"]),
            ApplicantReference::ExternalUserId(external_id) => {
                let selector = format!("-;externalUserId={external_id}");
                self.resource_url(&["applicants", selector.as_str(), "one"])
            }
        };
        self.signed_request(HttpMethod::Get, url, None)
    }

    pub fn parse_applicant_data(&self, response: HttpResponse) -> Result<ApplicantDataResponse, ApiError> {
        let data = decode_json(expect_status(response, 200)?)?;
        Ok(ApplicantDataResponse::new(data))
    }

    pub fn build_reset_applicant(&self, request: &ResetApplicantRequest) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url(&["applicants", request.applicant_id(), "reset"]);
        self.signed_request(HttpMethod::Post, url, None)
    }

    /// Succeeds only on HTTP 200 with `{"ok": 1}`.
    pub fn parse_reset_applicant(&self, response: HttpResponse) -> Result<(), ApiError> {
        let response = expect_status(response, 200)?;
        let ack = decode_json(response.clone())?;
        if ack.get("ok").and_then(Value::as_i64) != Some(1) {
            debug!("reset was not acknowledged");
            return Err(ApiError::bad_response(response, None));
        }
        Ok(())
    }

    pub fn build_applicant_status(
        &self,
        request: &ApplicantStatusRequest,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url(&["applicants", request.applicant_id(), "requiredIdDocsStatus"]);
        self.signed_request(HttpMethod::Get, url, None)
    }

    pub fn parse_applicant_status(
        &self,
        response: HttpResponse,
    ) -> Result<ApplicantStatusResponse, ApiError> {
        let data = decode_json(expect_status(response, 200)?)?;
        Ok(ApplicantStatusResponse::new(data))
    }

    // --- inspections ---

    pub fn build_document_image(&self, request: &DocumentImageRequest) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url(&[
            "inspections",
            request.inspection_id(),
            "resources",
            request.image_id(),
        ]);
        self.signed_request(HttpMethod::Get, url, None)
    }

    /// Returns the body untouched along with its content type.
    pub fn parse_document_image(&self, response: HttpResponse) -> Result<DocumentImageResponse, ApiError> {
        let response = expect_status(response, 200)?;
        let content_type = response.content_type().map(str::to_string);
        Ok(DocumentImageResponse::new(content_type, response.body))
    }

    pub fn build_inspection_checks(
        &self,
        request: &InspectionChecksRequest,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.resource_url(&["inspections", request.inspection_id(), "checks"]);
        self.signed_request(HttpMethod::Get, url, None)
    }

    pub fn parse_inspection_checks(
        &self,
        response: HttpResponse,
    ) -> Result<InspectionChecksResponse, ApiError> {
        let data = decode_json(expect_status(response, 200)?)?;
        Ok(InspectionChecksResponse::new(data))
    }
}

impl<S: RequestSigner, T: Transport> SumSubClient<S, T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request).map_err(|err| {
            debug!(error = %err, "transport failed");
            ApiError::Transport(err)
        })?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    pub fn get_access_token(&self, request: &AccessTokenRequest) -> Result<AccessTokenResponse, ApiError> {
        let response = self.send(self.build_access_token(request)?)?;
        self.parse_access_token(response)
    }

    /// Fails with `ApiError::Conflict` when the external user id is taken.
    pub fn create_applicant(
        &self,
        request: &CreateApplicantRequest,
    ) -> Result<ApplicantDataResponse, ApiError> {
        let response = self.send(self.build_create_applicant(request)?)?;
        self.parse_create_applicant(response)
    }

    pub fn change_applicant_info(
        &self,
        request: &ChangeProvidedInfoRequest,
    ) -> Result<ApplicantDataResponse, ApiError> {
        let response = self.send(self.build_change_applicant_info(request)?)?;
        self.parse_change_applicant_info(response)
    }

    pub fn change_applicant_top_level_info(
        &self,
        request: &ChangeTopLevelInfoRequest,
    ) -> Result<ApplicantDataResponse, ApiError> {
        let response = self.send(self.build_change_applicant_top_level_info(request)?)?;
        self.parse_change_applicant_top_level_info(response)
    }

    pub fn request_applicant_check(
        &self,
        request: &RequestApplicantChecksRequest,
    ) -> Result<ApplicantDataResponse, ApiError> {
        let response = self.send(self.build_request_applicant_check(request)?)?;
        self.parse_request_applicant_check(response)
    }

    pub fn get_applicant_data(
        &self,
        request: &ApplicantDataRequest,
    ) -> Result<ApplicantDataResponse, ApiError> {
        let response = self.send(self.build_applicant_data(request)?)?;
        self.parse_applicant_data(response)
    }

    pub fn reset_applicant(&self, request: &ResetApplicantRequest) -> Result<(), ApiError> {
        let response = self.send(self.build_reset_applicant(request)?)?;
        self.parse_reset_applicant(response)
    }

    pub fn get_applicant_status(
        &self,
        request: &ApplicantStatusRequest,
    ) -> Result<ApplicantStatusResponse, ApiError> {
        let response = self.send(self.build_applicant_status(request)?)?;
        self.parse_applicant_status(response)
    }

    pub fn get_document_image(
        &self,
        request: &DocumentImageRequest,
    ) -> Result<DocumentImageResponse, ApiError> {
        let response = self.send(self.build_document_image(request)?)?;
        self.parse_document_image(response)
    }

    pub fn get_inspection_checks(
        &self,
        request: &InspectionChecksRequest,
    ) -> Result<InspectionChecksResponse, ApiError> {
        let response = self.send(self.build_inspection_checks(request)?)?;
        self.parse_inspection_checks(response)
    }
}
