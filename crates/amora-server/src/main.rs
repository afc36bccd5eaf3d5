use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use amora_api::AppStateInner;
use amora_api::state::DEFAULT_FEED_LIMIT;
use amora_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amora=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("AMORA_DB_PATH").unwrap_or_else(|_| "amora.db".into());
    let host = std::env::var("AMORA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("AMORA_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let feed_limit: usize = match std::env::var("AMORA_FEED_LIMIT") {
        Ok(v) => v.parse()?,
        Err(_) => DEFAULT_FEED_LIMIT,
    };

    // One database serves as both the backend and the theme settings store.
    let db = Arc::new(Database::open(&PathBuf::from(&db_path))?);
    let state = Arc::new(AppStateInner {
        backend: db.clone(),
        settings: db,
        feed_limit,
    });

    let app = amora_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Amora server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
