use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde_json::json;

use crate::{
    middleware::access::AccessGranted,
    models::notice::{EditableNotice, NoticeDefaults, SaveNoticeRequest, SavedNotice},
    routes::{bad_request, store_error, store_status, ApiError},
    services::notice::NoticeService,
    AppState,
};

/// GET /notices/defaults: today's date and weekday plus the suggested day count
pub async fn get_defaults(
    State(state): State<AppState>,
    _access: AccessGranted,
) -> Result<Json<NoticeDefaults>, ApiError> {
    let now = Utc::now().with_timezone(&state.config.utc_offset);
    NoticeService::draft_defaults(state.store.as_ref(), now)
        .await
        .map(Json)
        .map_err(store_error)
}

/// PUT /notices: create or update the day for `date` and write its announcements
pub async fn save_notice(
    State(state): State<AppState>,
    _access: AccessGranted,
    Json(body): Json<SaveNoticeRequest>,
) -> Result<Json<SavedNotice>, ApiError> {
    if body.day_count < 1 {
        return Err(bad_request("day_count must be at least 1"));
    }

    NoticeService::save_notice(state.store.as_ref(), body, state.config.blanked_policy)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Notice board save failed: {}", e);
            (
                store_status(e.store_error()),
                Json(json!({
                    "error": "Notice board could not be saved",
                    "stage": e.stage(),
                    "detail": e.to_string(),
                })),
            )
        })
}

/// GET /notices/{date}: stored notice with its announcements as editable drafts
pub async fn get_notice(
    State(state): State<AppState>,
    _access: AccessGranted,
    Path(date): Path<NaiveDate>,
) -> Result<Json<EditableNotice>, ApiError> {
    NoticeService::load_for_edit(state.store.as_ref(), date)
        .await
        .map(Json)
        .map_err(store_error)
}
