//! Operation request and response value objects.
//!
//! # Design
//! One request type per remote operation, holding only the fields that
//! operation needs. Required identifiers are validated as non-empty at
//! construction; optional fields stay `None` until set with a `with_*`
//! method and are then sent exactly as supplied. Request types that double
//! as JSON bodies derive `Serialize` and skip unset fields, so the service
//! never sees `null` placeholders.
//!
//! Responses are built by the client from an already validated HTTP response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Generic decoded JSON object.
pub type JsonMap = Map<String, Value>;

fn required(field: &'static str, value: impl Into<String>) -> Result<String, ValidationError> {
    let value = value.into();
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Access token for a client-side integration, scoped to a user and level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenRequest {
    user_id: String,
    level_name: String,
    ttl_in_secs: Option<u64>,
}

impl AccessTokenRequest {
    pub fn new(
        user_id: impl Into<String>,
        level_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            user_id: required("userId", user_id)?,
            level_name: required("levelName", level_name)?,
            ttl_in_secs: None,
        })
    }

    pub fn with_ttl_in_secs(mut self, ttl_in_secs: u64) -> Self {
        self.ttl_in_secs = Some(ttl_in_secs);
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn ttl_in_secs(&self) -> Option<u64> {
        self.ttl_in_secs
    }
}

/// New applicant at a verification level. The level travels in the query
/// string, everything else in the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicantRequest {
    #[serde(skip)]
    level_name: String,
    external_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_info: Option<JsonMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<JsonMap>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    applicant_type: Option<String>,
}

impl CreateApplicantRequest {
    pub fn new(
        level_name: impl Into<String>,
        external_user_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            level_name: required("levelName", level_name)?,
            external_user_id: required("externalUserId", external_user_id)?,
            source_key: None,
            email: None,
            phone: None,
            lang: None,
            metadata: None,
            fixed_info: None,
            info: None,
            applicant_type: None,
        })
    }

    pub fn with_fixed_info(mut self, fixed_info: JsonMap) -> Self {
        self.fixed_info = Some(fixed_info);
        self
    }

    pub fn with_source_key(mut self, source_key: impl Into<String>) -> Self {
        self.source_key = Some(source_key.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Free-form metadata, usually a list of `{"key", "value"}` objects.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_info(mut self, info: JsonMap) -> Self {
        self.info = Some(info);
        self
    }

    /// `individual` or `company`.
    pub fn with_applicant_type(mut self, applicant_type: impl Into<String>) -> Self {
        self.applicant_type = Some(applicant_type.into());
        self
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn external_user_id(&self) -> &str {
        &self.external_user_id
    }

    pub fn source_key(&self) -> Option<&str> {
        self.source_key.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn fixed_info(&self) -> Option<&JsonMap> {
        self.fixed_info.as_ref()
    }

    pub fn info(&self) -> Option<&JsonMap> {
        self.info.as_ref()
    }

    pub fn applicant_type(&self) -> Option<&str> {
        self.applicant_type.as_deref()
    }
}

/// Replacement fixed info (name, date of birth, addresses...) for an applicant.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeProvidedInfoRequest {
    applicant_id: String,
    fixed_info: JsonMap,
}

impl ChangeProvidedInfoRequest {
    pub fn new(applicant_id: impl Into<String>, fixed_info: JsonMap) -> Result<Self, ValidationError> {
        Ok(Self {
            applicant_id: required("applicantId", applicant_id)?,
            fixed_info,
        })
    }

    pub fn applicant_id(&self) -> &str {
        &self.applicant_id
    }

    pub fn fixed_info(&self) -> &JsonMap {
        &self.fixed_info
    }
}

/// Top-level applicant fields. Sent as the body as-is; only fields that were
/// set are serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTopLevelInfoRequest {
    #[serde(rename = "id")]
    applicant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<bool>,
}

impl ChangeTopLevelInfoRequest {
    pub fn new(applicant_id: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            applicant_id: required("applicantId", applicant_id)?,
            email: None,
            external_user_id: None,
            phone: None,
            deleted: None,
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_external_user_id(mut self, external_user_id: impl Into<String>) -> Self {
        self.external_user_id = Some(external_user_id.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_deleted(mut self, deleted: bool) -> Self {
        self.deleted = Some(deleted);
        self
    }

    pub fn applicant_id(&self) -> &str {
        &self.applicant_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn external_user_id(&self) -> Option<&str> {
        self.external_user_id.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn deleted(&self) -> Option<bool> {
        self.deleted
    }
}

/// Which key identifies an applicant in a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicantReference {
    ApplicantId(String),
    ExternalUserId(String),
}

/// Lookup of one applicant, by id or by external user id.
///
/// When both are present the applicant id wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantDataRequest {
    reference: ApplicantReference,
}

impl ApplicantDataRequest {
    pub fn new(
        applicant_id: Option<String>,
        external_user_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        let applicant_id = applicant_id.map(|id| required("applicantId", id)).transpose()?;
        let external_user_id = external_user_id
            .map(|id| required("externalUserId", id))
            .transpose()?;
        let reference = match (applicant_id, external_user_id) {
            (Some(id), _) => ApplicantReference::ApplicantId(id),
            (None, Some(external_id)) => ApplicantReference::ExternalUserId(external_id),
            (None, None) => return Err(ValidationError::MissingApplicantReference),
        };
        Ok(Self { reference })
    }

    pub fn by_applicant_id(applicant_id: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Some(applicant_id.into()), None)
    }

    pub fn by_external_user_id(external_user_id: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(None, Some(external_user_id.into()))
    }

    pub fn reference(&self) -> &ApplicantReference {
        &self.reference
    }

    pub fn applicant_id(&self) -> Option<&str> {
        match &self.reference {
            ApplicantReference::ApplicantId(id) => Some(id),
            ApplicantReference::ExternalUserId(_) => None,
        }
    }

    pub fn external_user_id(&self) -> Option<&str> {
        match &self.reference {
            ApplicantReference::ExternalUserId(id) => Some(id),
            ApplicantReference::ApplicantId(_) => None,
        }
    }
}

macro_rules! applicant_request {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            applicant_id: String,
        }

        impl $name {
            pub fn new(applicant_id: impl Into<String>) -> Result<Self, ValidationError> {
                Ok(Self {
                    applicant_id: required("applicantId", applicant_id)?,
                })
            }

            pub fn applicant_id(&self) -> &str {
                &self.applicant_id
            }
        }
    };
}

applicant_request!(
    /// Moves an applicant to pending so the service starts checking it.
    RequestApplicantChecksRequest
);
applicant_request!(
    /// Wipes an applicant's documents and review state.
    ResetApplicantRequest
);
applicant_request!(
    /// Per-document-type status of an applicant's required documents.
    ApplicantStatusRequest
);

/// One image stored under an inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentImageRequest {
    inspection_id: String,
    image_id: String,
}

impl DocumentImageRequest {
    pub fn new(
        inspection_id: impl Into<String>,
        image_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            inspection_id: required("inspectionId", inspection_id)?,
            image_id: required("imageId", image_id)?,
        })
    }

    pub fn inspection_id(&self) -> &str {
        &self.inspection_id
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionChecksRequest {
    inspection_id: String,
}

impl InspectionChecksRequest {
    pub fn new(inspection_id: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            inspection_id: required("inspectionId", inspection_id)?,
        })
    }

    pub fn inspection_id(&self) -> &str {
        &self.inspection_id
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Access token issued for a user. Fields beyond `token` and `userId` are
/// kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    token: String,
    user_id: String,
    #[serde(flatten)]
    extra: JsonMap,
}

impl AccessTokenResponse {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn extra(&self) -> &JsonMap {
        &self.extra
    }
}

macro_rules! json_response {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(JsonMap);

        impl $name {
            pub(crate) fn new(data: JsonMap) -> Self {
                Self(data)
            }

            pub fn data(&self) -> &JsonMap {
                &self.0
            }

            pub fn get(&self, key: &str) -> Option<&Value> {
                self.0.get(key)
            }

            pub fn into_inner(self) -> JsonMap {
                self.0
            }
        }
    };
}

json_response!(
    /// Applicant record as returned by create, change, check and lookup calls.
    ApplicantDataResponse
);
json_response!(ApplicantStatusResponse);
json_response!(InspectionChecksResponse);

impl ApplicantDataResponse {
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    pub fn inspection_id(&self) -> Option<&str> {
        self.get("inspectionId").and_then(Value::as_str)
    }

    pub fn external_user_id(&self) -> Option<&str> {
        self.get("externalUserId").and_then(Value::as_str)
    }
}

/// Raw document image. The body is not JSON-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentImageResponse {
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl DocumentImageResponse {
    pub(crate) fn new(content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            content_type,
            bytes,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
