pub mod access;
pub mod announcements;
pub mod days;
pub mod health;
pub mod notices;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

use crate::store::StoreError;

pub type ApiError = (StatusCode, Json<Value>);

pub fn store_status(e: &StoreError) -> StatusCode {
    match e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Integrity(_) | StoreError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn store_error(e: StoreError) -> ApiError {
    let status = store_status(&e);
    if status.is_server_error() {
        tracing::error!("Store error: {}", e);
    }
    (status, Json(json!({ "error": e.to_string() })))
}

pub fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}
