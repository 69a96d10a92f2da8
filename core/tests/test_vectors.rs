//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector describes an operation's input, the expected outgoing request,
//! a simulated response and either the expected result or the expected error
//! kind. Results are compared as parsed JSON so field order does not matter.

use serde_json::{json, Value};
use sumsub_core::{
    AccessTokenRequest, ApiError, ApplicantDataRequest, ApplicantStatusRequest,
    ChangeProvidedInfoRequest, ChangeTopLevelInfoRequest, CreateApplicantRequest,
    DocumentImageRequest, Endpoint, HttpMethod, HttpRequest, HttpResponse,
    InspectionChecksRequest, JsonMap, RequestApplicantChecksRequest, RequestSigner,
    ResetApplicantRequest, SumSubClient,
};

const BASE_URL: &str = "https://api.sumsub.com";

struct PassThrough;

impl RequestSigner for PassThrough {
    fn sign(&self, request: HttpRequest) -> HttpRequest {
        request
    }
}

type Client = SumSubClient<PassThrough, ()>;

fn client() -> Client {
    SumSubClient::new(&Endpoint::Production, PassThrough, ()).unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        other => panic!("unknown method: {other}"),
    }
}

fn text(input: &Value, key: &str) -> String {
    input[key].as_str().unwrap().to_string()
}

fn opt_text(input: &Value, key: &str) -> Option<String> {
    input.get(key).and_then(Value::as_str).map(str::to_string)
}

fn object(input: &Value, key: &str) -> Option<JsonMap> {
    input.get(key).and_then(Value::as_object).cloned()
}

fn simulated_response(sim: &Value) -> HttpResponse {
    let mut response = HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    );
    if let Some(content_type) = sim.get("content_type").and_then(Value::as_str) {
        response = response.with_header("Content-Type", content_type);
    }
    response
}

/// Builds the request for `operation` and parses `response` with the
/// matching `parse_*` method, flattening the result to JSON.
fn execute(
    c: &Client,
    operation: &str,
    input: &Value,
    response: HttpResponse,
) -> (HttpRequest, Result<Value, ApiError>) {
    let applicant_id = || text(input, "applicantId");
    match operation {
        "access_token" => {
            let mut req = AccessTokenRequest::new(text(input, "userId"), text(input, "levelName")).unwrap();
            if let Some(ttl) = input.get("ttlInSecs").and_then(Value::as_u64) {
                req = req.with_ttl_in_secs(ttl);
            }
            let result = c
                .parse_access_token(response)
                .map(|t| json!({ "token": t.token(), "userId": t.user_id() }));
            (c.build_access_token(&req).unwrap(), result)
        }
        "create_applicant" => {
            let mut req =
                CreateApplicantRequest::new(text(input, "levelName"), text(input, "externalUserId"))
                    .unwrap();
            if let Some(fixed_info) = object(input, "fixedInfo") {
                req = req.with_fixed_info(fixed_info);
            }
            let result = c
                .parse_create_applicant(response)
                .map(|a| Value::Object(a.into_inner()));
            (c.build_create_applicant(&req).unwrap(), result)
        }
        "change_applicant_info" => {
            let req =
                ChangeProvidedInfoRequest::new(applicant_id(), object(input, "fixedInfo").unwrap())
                    .unwrap();
            let result = c
                .parse_change_applicant_info(response)
                .map(|a| Value::Object(a.into_inner()));
            (c.build_change_applicant_info(&req).unwrap(), result)
        }
        "change_applicant_top_level_info" => {
            let mut req = ChangeTopLevelInfoRequest::new(applicant_id()).unwrap();
            if let Some(email) = opt_text(input, "email") {
                req = req.with_email(email);
            }
            if let Some(external_user_id) = opt_text(input, "externalUserId") {
                req = req.with_external_user_id(external_user_id);
            }
            if let Some(phone) = opt_text(input, "phone") {
                req = req.with_phone(phone);
            }
            if let Some(deleted) = input.get("deleted").and_then(Value::as_bool) {
                req = req.with_deleted(deleted);
            }
            let result = c
                .parse_change_applicant_top_level_info(response)
                .map(|a| Value::Object(a.into_inner()));
            (c.build_change_applicant_top_level_info(&req).unwrap(), result)
        }
        "request_applicant_check" => {
            let req = RequestApplicantChecksRequest::new(applicant_id()).unwrap();
            let result = c
                .parse_request_applicant_check(response)
                .map(|a| Value::Object(a.into_inner()));
            (c.build_request_applicant_check(&req).unwrap(), result)
        }
        "applicant_data" => {
            let req = ApplicantDataRequest::new(
                opt_text(input, "applicantId"),
                opt_text(input, "externalUserId"),
            )
            .unwrap();
            let result = c
                .parse_applicant_data(response)
                .map(|a| Value::Object(a.into_inner()));
            (c.build_applicant_data(&req).unwrap(), result)
        }
        "reset_applicant" => {
            let req = ResetApplicantRequest::new(applicant_id()).unwrap();
            let result = c.parse_reset_applicant(response).map(|()| Value::Null);
            (c.build_reset_applicant(&req).unwrap(), result)
        }
        "applicant_status" => {
            let req = ApplicantStatusRequest::new(applicant_id()).unwrap();
            let result = c
                .parse_applicant_status(response)
                .map(|s| Value::Object(s.into_inner()));
            (c.build_applicant_status(&req).unwrap(), result)
        }
        "document_image" => {
            let req = DocumentImageRequest::new(text(input, "inspectionId"), text(input, "imageId"))
                .unwrap();
            let result = c.parse_document_image(response).map(|image| {
                json!({
                    "contentType": image.content_type(),
                    "body": String::from_utf8_lossy(image.bytes()),
                })
            });
            (c.build_document_image(&req).unwrap(), result)
        }
        "inspection_checks" => {
            let req = InspectionChecksRequest::new(text(input, "inspectionId")).unwrap();
            let result = c
                .parse_inspection_checks(response)
                .map(|checks| Value::Object(checks.into_inner()));
            (c.build_inspection_checks(&req).unwrap(), result)
        }
        other => panic!("unknown operation: {other}"),
    }
}

fn run_vectors(raw: &str) {
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();
        let expected_req = &case["expected_request"];
        let response = simulated_response(&case["simulated_response"]);

        let (req, result) = execute(&c, operation, &case["input"], response);

        // Verify build
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.header("Accept"), Some("application/json"), "{name}: accept");
        match expected_req.get("body") {
            Some(expected_body) => {
                let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected_body, "{name}: body");
                assert_eq!(req.header("Content-Type"), Some("application/json"), "{name}: content type");
            }
            None => {
                assert!(req.body.is_none(), "{name}: body should be None");
                assert!(req.header("Content-Type").is_none(), "{name}: content type should be unset");
            }
        }

        // Verify parse
        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "BadResponse" => assert!(matches!(err, ApiError::BadResponse { .. }), "{name}: expected BadResponse, got {err:?}"),
                "Conflict" => assert!(matches!(err, ApiError::Conflict { .. }), "{name}: expected Conflict, got {err:?}"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            let status = case["simulated_response"]["status"].as_u64().unwrap() as u16;
            assert_eq!(err.status(), Some(status), "{name}: status preserved");
        } else {
            let value = result.unwrap_or_else(|err| panic!("{name}: unexpected error {err:?}"));
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
        }
    }
}

#[test]
fn access_token_test_vectors() {
    run_vectors(include_str!("../../test-vectors/access_tokens.json"));
}

#[test]
fn applicant_test_vectors() {
    run_vectors(include_str!("../../test-vectors/applicants.json"));
}

#[test]
fn reset_test_vectors() {
    run_vectors(include_str!("../../test-vectors/reset.json"));
}

#[test]
fn inspection_test_vectors() {
    run_vectors(include_str!("../../test-vectors/inspections.json"));
}
