use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    middleware::access::AccessGranted,
    models::day::{Day, DayFilter},
    routes::{store_error, ApiError},
    services::admin::AdminService,
    AppState,
};

/// GET /days?date=YYYY-MM-DD
pub async fn list_days(
    State(state): State<AppState>,
    _access: AccessGranted,
    Query(params): Query<DayFilter>,
) -> Result<Json<Vec<Day>>, ApiError> {
    AdminService::list_days(state.store.as_ref(), params.date)
        .await
        .map(Json)
        .map_err(store_error)
}

/// DELETE /days/{id}: removes the day's announcements first
pub async fn delete_day(
    State(state): State<AppState>,
    _access: AccessGranted,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    AdminService::delete_day(state.store.as_ref(), id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(store_error)
}
