//! Router tests for the notice board API.
//!
//! Each test builds the full router over an in-memory store and sends
//! requests through it with `oneshot`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use notice_board_api::{
    build_router,
    config::Config,
    store::{MemoryStore, StoreError},
    AppState,
};

const CODE: &str = "open-sesame";

fn app_with(vars: &[(&str, &str)]) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let config = Config::from_lookup(|key| {
        if key == "ACCESS_CODE" {
            return Some(CODE.to_string());
        }
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .unwrap();
    let router = build_router(AppState::new(store.clone(), config));
    (router, store)
}

fn app() -> (Router, Arc<MemoryStore>) {
    app_with(&[])
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    code: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(code) = code {
        builder = builder.header("x-access-code", code);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn friday(count: i32, announcements: Value) -> Value {
    json!({
        "date": "2024-03-01",
        "day_name": "Friday",
        "day_order": "I",
        "day_count": count,
        "announcements": announcements,
    })
}

// ── Access ───────────────────────────────────────────────────────────

#[tokio::test]
async fn health_needs_no_access_code() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn unlock_checks_the_shared_code() {
    let (app, _) = app();

    let (status, _) = send(
        &app,
        "POST",
        "/access/unlock",
        Some(json!({ "access_code": "wrong" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/access/unlock",
        Some(json!({ "access_code": CODE })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorized"], true);
}

#[tokio::test]
async fn notice_routes_reject_missing_or_wrong_code() {
    let (app, store) = app();

    let (status, _) = send(&app, "PUT", "/notices", Some(friday(12, json!([]))), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/days", None, Some("nope")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(store.days().is_empty());
}

// ── Saving ───────────────────────────────────────────────────────────

#[tokio::test]
async fn save_then_resave_keeps_day_id() {
    let (app, store) = app();

    let (status, first) = send(
        &app,
        "PUT",
        "/notices",
        Some(friday(
            12,
            json!([
                { "title": "Exam", "message": "Midterm on Monday" },
                { "title": "", "message": "" }
            ]),
        )),
        Some(CODE),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["created"], true);
    assert_eq!(first["dropped"], 1);
    assert_eq!(first["announcements"].as_array().unwrap().len(), 1);

    let (status, second) = send(&app, "PUT", "/notices", Some(friday(13, json!([]))), Some(CODE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);
    assert_eq!(second["day"]["id"], first["day"]["id"]);
    assert_eq!(second["day"]["day_count"], 13);

    assert_eq!(store.days().len(), 1);
    assert_eq!(store.announcements().len(), 1);
}

#[tokio::test]
async fn day_count_below_one_is_rejected() {
    let (app, store) = app();
    let (status, body) = send(&app, "PUT", "/notices", Some(friday(0, json!([]))), Some(CODE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("day_count"));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn store_outage_reports_failing_stage() {
    let (app, store) = app();
    store.fail_on("insert_day", StoreError::Unavailable("connection refused".into()));

    let (status, body) = send(
        &app,
        "PUT",
        "/notices",
        Some(friday(1, json!([{ "title": "Exam", "message": "Monday" }]))),
        Some(CODE),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["stage"], "day");
    assert_eq!(body["error"], "Notice board could not be saved");
    assert!(store.announcements().is_empty());
}

#[tokio::test]
async fn edit_flow_round_trip_with_delete_policy() {
    let (app, store) = app_with(&[("BLANKED_ANNOUNCEMENT_POLICY", "delete")]);

    send(
        &app,
        "PUT",
        "/notices",
        Some(friday(
            5,
            json!([
                { "title": "Exam", "message": "Midterm on Monday" },
                { "title": "Trip", "message": "Bring consent forms" }
            ]),
        )),
        Some(CODE),
    )
    .await;

    let (status, editable) = send(&app, "GET", "/notices/2024-03-01", None, Some(CODE)).await;
    assert_eq!(status, StatusCode::OK);
    let drafts = editable["announcements"].as_array().unwrap().clone();
    assert_eq!(drafts.len(), 2);
    let kept_id = drafts[0]["id"].clone();

    let resubmitted = json!([
        { "id": drafts[0]["id"], "title": "Exam", "message": "Moved to Tuesday" },
        { "id": drafts[1]["id"], "title": "Trip", "message": "" }
    ]);
    let (status, saved) = send(&app, "PUT", "/notices", Some(friday(5, resubmitted)), Some(CODE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["pruned"], 1);
    assert_eq!(saved["announcements"][0]["id"], kept_id);

    let rows = store.announcements();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].message, "Moved to Tuesday");
}

#[tokio::test]
async fn unknown_date_is_not_found() {
    let (app, _) = app();
    let (status, _) = send(&app, "GET", "/notices/2024-05-05", None, Some(CODE)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn defaults_suggest_next_day_count() {
    let (app, _) = app();
    let (status, defaults) = send(&app, "GET", "/notices/defaults", None, Some(CODE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(defaults["day_count"], 1);
    assert_eq!(defaults["day_orders"].as_array().unwrap().len(), 6);

    send(&app, "PUT", "/notices", Some(friday(41, json!([]))), Some(CODE)).await;
    let (_, defaults) = send(&app, "GET", "/notices/defaults", None, Some(CODE)).await;
    assert_eq!(defaults["day_count"], 42);
}

// ── Admin ────────────────────────────────────────────────────────────

#[tokio::test]
async fn browse_and_delete() {
    let (app, store) = app();
    let (_, saved) = send(
        &app,
        "PUT",
        "/notices",
        Some(friday(
            12,
            json!([
                { "title": "Exam", "message": "Midterm on Monday" },
                { "title": "Trip", "message": "Bring consent forms" }
            ]),
        )),
        Some(CODE),
    )
    .await;
    let day_id = saved["day"]["id"].as_str().unwrap().to_string();

    let (status, days) = send(&app, "GET", "/days?date=2024-03-01", None, Some(CODE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(days.as_array().unwrap().len(), 1);

    let (_, days) = send(&app, "GET", "/days?date=2024-03-02", None, Some(CODE)).await;
    assert!(days.as_array().unwrap().is_empty());

    let (_, rows) = send(&app, "GET", "/announcements?date=2024-03-01", None, Some(CODE)).await;
    let rows = rows.as_array().unwrap().clone();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["notice_date"], "2024-03-01");

    let first = rows[0]["id"].as_str().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/announcements/{first}"), None, Some(CODE)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(store.announcements().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/days/{day_id}"), None, Some(CODE)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.days().is_empty());
    assert!(store.announcements().is_empty());

    let (status, _) = send(&app, "DELETE", &format!("/days/{day_id}"), None, Some(CODE)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
