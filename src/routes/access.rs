use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{middleware::access::access_code_matches, models::notice::UnlockRequest, AppState};

/// POST /access/unlock: checks the passphrase so the form can unlock its session.
pub async fn unlock(
    State(state): State<AppState>,
    Json(body): Json<UnlockRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !access_code_matches(&state, &body.access_code) {
        tracing::warn!("Rejected notice board access attempt");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid access code" })),
        ));
    }
    Ok(Json(json!({ "authorized": true })))
}
