use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::AppState;

pub const ACCESS_CODE_HEADER: &str = "X-Access-Code";

/// Compare a submitted passphrase against the configured access code.
pub fn access_code_matches(state: &AppState, submitted: &str) -> bool {
    submitted == state.config.access_code
}

/// Extractor that validates the `X-Access-Code` header against `config.access_code`.
pub struct AccessGranted;

impl FromRequestParts<AppState> for AccessGranted {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let code = parts
            .headers
            .get(ACCESS_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Missing X-Access-Code header" })),
            ))?;

        if !access_code_matches(state, code) {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid access code" })),
            ));
        }

        Ok(AccessGranted)
    }
}
