use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notice_board_api::{
    build_router,
    config::Config,
    db,
    store::{MemoryStore, NoticeStore, PgNoticeStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn NoticeStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            db::run_migrations(&pool).await?;
            info!("Database connected and migrations applied");
            Arc::new(PgNoticeStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set, notices are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    info!(
        "Blanked announcement policy: {:?}, local offset {}",
        config.blanked_policy, config.utc_offset
    );

    let addr = format!("{}:{}", config.host, config.port);
    let app = build_router(AppState::new(store, config));

    info!("Notice board API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
