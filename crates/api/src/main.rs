use std::sync::Arc;

use anyhow::Context;

use shopfront_api::{AppContext, build_app};
use shopfront_infra::{AppConfig, PostgresProductRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shopfront_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let context = match config.database_url.as_deref() {
        Some(database_url) => {
            let repo = PostgresProductRepository::connect(database_url, config.database_max_connections)
                .await
                .context("failed to connect to Postgres")?;
            repo.ensure_schema()
                .await
                .context("failed to prepare the products table")?;
            tracing::info!(max_connections = config.database_max_connections, "using Postgres product storage");
            AppContext::new(Arc::new(repo))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory product storage (lost on restart)");
            AppContext::in_memory()
        }
    };

    let app = build_app(context, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
