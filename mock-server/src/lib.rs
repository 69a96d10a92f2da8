use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_PORT: u16 = 3000;
pub const IMAGE_ID: &str = "1001";
/// JPEG magic followed by a few filler bytes.
pub const IMAGE_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

const EXTERNAL_ID_SELECTOR: &str = "-;externalUserId=";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: String,
    pub inspection_id: String,
    pub external_user_id: String,
    pub level_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub fixed_info: Map<String, Value>,
    pub review: Review,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenQuery {
    pub user_id: String,
    pub level_name: String,
    pub ttl_in_secs: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelQuery {
    pub level_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicant {
    pub external_user_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub fixed_info: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicant {
    pub id: String,
    pub email: Option<String>,
    pub external_user_id: Option<String>,
    pub phone: Option<String>,
    pub deleted: Option<bool>,
}

pub type Db = Arc<RwLock<HashMap<String, Applicant>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/resources/accessTokens", post(create_access_token))
        .route(
            "/resources/applicants",
            post(create_applicant).patch(update_applicant),
        )
        .route("/resources/applicants/{id}/one", get(get_applicant))
        .route("/resources/applicants/{id}/fixedInfo", patch(update_fixed_info))
        .route("/resources/applicants/{id}/status/pending", post(request_check))
        .route("/resources/applicants/{id}/reset", post(reset_applicant))
        .route(
            "/resources/applicants/{id}/requiredIdDocsStatus",
            get(required_docs_status),
        )
        .route(
            "/resources/inspections/{inspection_id}/resources/{image_id}",
            get(document_image),
        )
        .route("/resources/inspections/{inspection_id}/checks", get(inspection_checks))
        .layer(middleware::from_fn(require_app_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Rejects requests that carry no App-Token authentication headers.
async fn require_app_token(request: Request, next: Next) -> Result<Response, StatusCode> {
    let headers = request.headers();
    let signed = ["x-app-token", "x-app-access-ts", "x-app-access-sig"]
        .iter()
        .all(|name| headers.contains_key(*name));
    if !signed {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

async fn create_access_token(Query(query): Query<AccessTokenQuery>) -> Json<Value> {
    let mut body = json!({
        "token": format!("_act-{}", Uuid::new_v4().simple()),
        "userId": query.user_id,
        "levelName": query.level_name,
    });
    if let Some(ttl) = query.ttl_in_secs {
        body["ttlInSecs"] = json!(ttl);
    }
    Json(body)
}

async fn create_applicant(
    State(db): State<Db>,
    Query(query): Query<LevelQuery>,
    Json(input): Json<CreateApplicant>,
) -> Result<(StatusCode, Json<Applicant>), (StatusCode, Json<Value>)> {
    let mut applicants = db.write().await;
    if applicants
        .values()
        .any(|a| a.external_user_id == input.external_user_id)
    {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({
                "description": format!("Applicant with external user id '{}' already exists", input.external_user_id),
                "code": 409,
            })),
        ));
    }
    let applicant = Applicant {
        id: Uuid::new_v4().simple().to_string(),
        inspection_id: Uuid::new_v4().simple().to_string(),
        external_user_id: input.external_user_id,
        level_name: query.level_name,
        email: input.email,
        phone: input.phone,
        fixed_info: input.fixed_info,
        review: Review {
            review_status: "init".to_string(),
        },
        deleted: false,
    };
    applicants.insert(applicant.id.clone(), applicant.clone());
    Ok((StatusCode::CREATED, Json(applicant)))
}

/// `{id}` is either an applicant id or `-;externalUserId=...`.
async fn get_applicant(
    State(db): State<Db>,
    Path(reference): Path<String>,
) -> Result<Json<Applicant>, StatusCode> {
    let applicants = db.read().await;
    let found = match reference.strip_prefix(EXTERNAL_ID_SELECTOR) {
        Some(external_id) => applicants
            .values()
            .find(|a| a.external_user_id == external_id),
        None => applicants.get(&reference),
    };
    found.cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_applicant(
    State(db): State<Db>,
    Json(input): Json<UpdateApplicant>,
) -> Result<Json<Applicant>, StatusCode> {
    let mut applicants = db.write().await;
    let applicant = applicants.get_mut(&input.id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(email) = input.email {
        applicant.email = Some(email);
    }
    if let Some(external_user_id) = input.external_user_id {
        applicant.external_user_id = external_user_id;
    }
    if let Some(phone) = input.phone {
        applicant.phone = Some(phone);
    }
    if let Some(deleted) = input.deleted {
        applicant.deleted = deleted;
    }
    Ok(Json(applicant.clone()))
}

async fn update_fixed_info(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(fixed_info): Json<Map<String, Value>>,
) -> Result<Json<Applicant>, StatusCode> {
    let mut applicants = db.write().await;
    let applicant = applicants.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    applicant.fixed_info.extend(fixed_info);
    Ok(Json(applicant.clone()))
}

async fn request_check(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Applicant>, StatusCode> {
    let mut applicants = db.write().await;
    let applicant = applicants.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    applicant.review.review_status = "pending".to_string();
    Ok(Json(applicant.clone()))
}

async fn reset_applicant(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut applicants = db.write().await;
    let applicant = applicants.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    applicant.fixed_info.clear();
    applicant.review.review_status = "init".to_string();
    Ok(Json(json!({ "ok": 1 })))
}

async fn required_docs_status(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let applicants = db.read().await;
    let applicant = applicants.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let identity = match applicant.review.review_status.as_str() {
        "init" => Value::Null,
        _ => json!({ "imageIds": [IMAGE_ID] }),
    };
    Ok(Json(json!({ "IDENTITY": identity, "SELFIE": Value::Null })))
}

async fn document_image(
    State(db): State<Db>,
    Path((inspection_id, image_id)): Path<(String, String)>,
) -> Result<Response, StatusCode> {
    if image_id != IMAGE_ID || !inspection_exists(&db, &inspection_id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], IMAGE_BYTES).into_response())
}

async fn inspection_checks(
    State(db): State<Db>,
    Path(inspection_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !inspection_exists(&db, &inspection_id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "checks": [{ "checkType": "SIMILAR_SEARCH", "answer": "GREEN" }]
    })))
}

async fn inspection_exists(db: &Db, inspection_id: &str) -> bool {
    db.read()
        .await
        .values()
        .any(|a| a.inspection_id == inspection_id)
}
