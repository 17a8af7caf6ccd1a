pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use store::NoticeStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NoticeStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn NoticeStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let base = state.config.app_base_url.clone();
    // Localhost is always allowed for development.
    let cors_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let Ok(o) = origin.to_str() else {
            return false;
        };
        o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") || o == base
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-access-code"),
        ]))
        .allow_origin(cors_origin);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/access/unlock", post(routes::access::unlock))
        // Entry form
        .route("/notices", put(routes::notices::save_notice))
        .route("/notices/defaults", get(routes::notices::get_defaults))
        .route("/notices/{date}", get(routes::notices::get_notice))
        // Admin
        .route("/days", get(routes::days::list_days))
        .route("/days/{id}", delete(routes::days::delete_day))
        .route("/announcements", get(routes::announcements::list_announcements))
        .route(
            "/announcements/{id}",
            delete(routes::announcements::delete_announcement),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
