//! Taskboard HTTP server.
//!
//! Reads configuration from the environment (and an optional `.env` file),
//! selects the `PostgreSQL` store when `DATABASE_URL` is set, and serves the
//! task pages until interrupted.

use anyhow::Context;
use mockable::DefaultClock;
use std::sync::Arc;
use taskboard::config::AppConfig;
use taskboard::task::adapters::memory::InMemoryTaskRepository;
use taskboard::task::adapters::postgres::{PostgresTaskRepository, apply_migrations, connect};
use taskboard::task::ports::{TaskRepository, TaskRepositoryError};
use taskboard::task::services::TaskService;
use taskboard::web::{self, WebConfig, views::Views};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env().context("load configuration")?;
    let views = Views::new().context("compile page templates")?;

    match config.database_url.clone() {
        Some(url) => {
            let pool_size = config.db_pool_size;
            let pool = tokio::task::spawn_blocking(move || {
                let pool = connect(&url, pool_size)?;
                apply_migrations(&pool)?;
                Ok::<_, TaskRepositoryError>(pool)
            })
            .await
            .context("database setup task panicked")?
            .context("connect to PostgreSQL")?;
            info!(pool_size, "using PostgreSQL task store");
            serve(&config, PostgresTaskRepository::new(pool), views).await
        }
        None => {
            warn!("DATABASE_URL is not set; tasks are kept in memory and lost on exit");
            serve(&config, InMemoryTaskRepository::new(), views).await
        }
    }
}

async fn serve<R>(config: &AppConfig, repository: R, views: Views) -> anyhow::Result<()>
where
    R: TaskRepository + 'static,
{
    let service = TaskService::new(Arc::new(repository), Arc::new(DefaultClock));
    let app = web::router(service, views, config.web);
    log_web_config(config.web);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP")
}

fn log_web_config(config: WebConfig) {
    if !config.csrf_protection {
        warn!("CSRF protection is disabled");
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
