use std::sync::Arc;

use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use reel_shelf::{
    config::Config,
    create_router,
    db::{create_pool, create_redis_client, Cache, CatalogStore, MemoryStore, PostgresStore},
    services::{MediaProvider, TmdbProvider, VideoInfoProvider, YouTubeProvider},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reel_shelf=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn CatalogStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url).await?;
            Arc::new(PostgresStore::new(pool).await?)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let (cache, cache_handle) = match config.redis_url.as_deref() {
        Some(url) => Cache::new(create_redis_client(url)?).await,
        None => {
            info!("REDIS_URL not set, metadata caching disabled");
            Cache::disabled()
        }
    };

    let video_provider: Arc<dyn VideoInfoProvider> = Arc::new(YouTubeProvider::new(
        cache.clone(),
        config.youtube_api_key.clone(),
        config.youtube_api_url.clone(),
    ));
    let media_provider: Arc<dyn MediaProvider> = Arc::new(TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
        config.tmdb_image_base_url.clone(),
    ));

    info!(
        video_provider = video_provider.name(),
        media_provider = media_provider.name(),
        admin_configured = config.admin_email.is_some(),
        "Providers configured"
    );

    let state = Arc::new(AppState {
        store,
        video_provider,
        media_provider,
        admin_email: config.admin_email.clone(),
    });

    let app = create_router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_handle.shutdown().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
