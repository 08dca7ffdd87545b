mod api;
mod middleware;

use std::sync::Arc;

use axum::http::HeaderValue;
use tracing_subscriber::EnvFilter;
use zipeats_db::{MemorySnapshotStore, PgSnapshotStore, SnapshotStore};
use zipeats_pipeline::Pipeline;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = zipeats_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store: Arc<dyn SnapshotStore> = if config.database_url.is_some() {
        let pool = zipeats_db::connect_pool_from_config(&config).await?;
        let applied = zipeats_db::run_migrations(&pool).await?;
        tracing::info!(applied, "database migrations complete");
        Arc::new(PgSnapshotStore::new(pool))
    } else {
        tracing::warn!(
            env = %config.env,
            "DATABASE_URL not set; using in-memory snapshot store (not persisted across restarts)"
        );
        Arc::new(MemorySnapshotStore::new())
    };

    let pipeline = Pipeline::from_config(&config, store)?;
    let cors_origin = HeaderValue::from_str(&config.frontend_url)?;
    let rate_limit = RateLimitState::from_app_config(&config);
    let app = build_app(
        AppState {
            pipeline: Arc::new(pipeline),
        },
        cors_origin,
        rate_limit,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "zipeats-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
