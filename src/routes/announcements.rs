use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    middleware::access::AccessGranted,
    models::{announcement::AnnouncementWithDate, day::DayFilter},
    routes::{store_error, ApiError},
    services::admin::AdminService,
    AppState,
};

/// GET /announcements?date=YYYY-MM-DD
pub async fn list_announcements(
    State(state): State<AppState>,
    _access: AccessGranted,
    Query(params): Query<DayFilter>,
) -> Result<Json<Vec<AnnouncementWithDate>>, ApiError> {
    AdminService::list_announcements(state.store.as_ref(), params.date)
        .await
        .map(Json)
        .map_err(store_error)
}

/// DELETE /announcements/{id}
pub async fn delete_announcement(
    State(state): State<AppState>,
    _access: AccessGranted,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    AdminService::delete_announcement(state.store.as_ref(), id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(store_error)
}
